//! Seeding metrics and structured logging setup.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

/// Counters shared by every factory that records into it.
#[derive(Debug)]
pub struct Metrics {
    cells_created: AtomicU64,
    cells_failed: AtomicU64,
    grids_seeded: AtomicU64,
    counters: Mutex<HashMap<String, AtomicU64>>,
    start_time: Instant,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    #[must_use]
    pub fn new() -> Self {
        Self {
            cells_created: AtomicU64::new(0),
            cells_failed: AtomicU64::new(0),
            grids_seeded: AtomicU64::new(0),
            counters: Mutex::new(HashMap::new()),
            start_time: Instant::now(),
        }
    }

    pub fn record_cell_created(&self) {
        let total = self.cells_created.fetch_add(1, Ordering::Relaxed) + 1;
        // Progress line every 10k cells
        if total.is_multiple_of(10_000) {
            tracing::info!(
                cells = total,
                elapsed_ms = self.elapsed().as_millis() as u64,
                "Cell assembly progress"
            );
        }
    }

    pub fn record_cell_failed(&self) {
        self.cells_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_grid_seeded(&self) {
        self.grids_seeded.fetch_add(1, Ordering::Relaxed);
    }

    /// Increments a named counter, creating it on first use.
    pub fn increment_counter(&self, name: &str) {
        let mut counters = self.counters.lock().unwrap_or_else(|e| e.into_inner());
        counters
            .entry(name.to_string())
            .or_insert_with(|| AtomicU64::new(0))
            .fetch_add(1, Ordering::Relaxed);
    }

    #[must_use]
    pub fn counter(&self, name: &str) -> u64 {
        let counters = self.counters.lock().unwrap_or_else(|e| e.into_inner());
        counters
            .get(name)
            .map_or(0, |c| c.load(Ordering::Relaxed))
    }

    #[must_use]
    pub fn cells_created(&self) -> u64 {
        self.cells_created.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn cells_failed(&self) -> u64 {
        self.cells_failed.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn grids_seeded(&self) -> u64 {
        self.grids_seeded.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Logs a one-line summary of everything recorded so far.
    pub fn log_summary(&self) {
        tracing::info!(
            cells_created = self.cells_created(),
            cells_failed = self.cells_failed(),
            grids_seeded = self.grids_seeded(),
            node_rollbacks = self.counter(crate::factory::NODE_ROLLBACK),
            elapsed_ms = self.elapsed().as_millis() as u64,
            "Seeding summary"
        );
    }
}

/// Initialize tracing subscriber for logging.
///
/// Honours `RUST_LOG`, defaulting to `info`. Logs go to stderr so stdout
/// stays free for command output.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .finish(),
    )
    .ok();
}

//! Configuration management for cell seeding.
//!
//! Strongly-typed configuration structures that map to a `config.toml` file.
//!
//! ## Configuration Hierarchy
//!
//! 1. Default values (hardcoded in `Default` impls)
//! 2. `config.toml` file (overrides defaults)
//! 3. CLI flags (`--seed`, `--layout`)
//!
//! ## Example `config.toml`
//!
//! ```toml
//! [world]
//! seed = 42
//! deterministic = true
//! bounds_min = [-500.0, -500.0, -500.0]
//! bounds_max = [500.0, 500.0, 500.0]
//! cell_size = 25.0
//!
//! [cell]
//! diameter = 20.0
//! default_type = "excitatory"
//!
//! [palette.overrides]
//! excitatory = { r = 255, g = 0, b = 0 }
//!
//! [layout]
//! kind = "grid2d"
//! x = { min = 0.0, max = 100.0 }
//! y = { min = 0.0, max = 100.0 }
//! z = 0.0
//! nx = 5
//! ny = 5
//! noise_std = 1.5
//! ```

use crate::lattice::{Grid2d, Grid3d};
use cytoseed_data::{CellType, Color, Position};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Simulation space and randomness.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct WorldConfig {
    pub seed: Option<u64>,
    pub deterministic: bool,
    pub bounds_min: [f64; 3],
    pub bounds_max: [f64; 3],
    pub cell_size: f64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: None,
            deterministic: false,
            bounds_min: [-1000.0; 3],
            bounds_max: [1000.0; 3],
            cell_size: 20.0,
        }
    }
}

impl WorldConfig {
    /// Seed actually used for the noise source; deterministic runs without a seed fall back to 0.
    #[must_use]
    pub fn effective_seed(&self) -> Option<u64> {
        match (self.seed, self.deterministic) {
            (Some(seed), _) => Some(seed),
            (None, true) => Some(0),
            (None, false) => None,
        }
    }
}

/// Properties given to freshly assembled cells.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct CellConfig {
    pub diameter: f64,
    pub default_type: CellType,
}

impl Default for CellConfig {
    fn default() -> Self {
        Self {
            diameter: 20.0,
            default_type: CellType::Unspecified,
        }
    }
}

/// Per-type color overrides keyed by [`CellType::name`].
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct PaletteConfig {
    pub overrides: BTreeMap<String, Color>,
}

/// What the CLI seeds.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LayoutConfig {
    Single { position: Position },
    Grid2d(Grid2d),
    Grid3d(Grid3d),
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig::Grid2d(Grid2d::default())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub world: WorldConfig,
    pub cell: CellConfig,
    pub palette: PaletteConfig,
    pub layout: LayoutConfig,
}

impl AppConfig {
    /// Validates all configuration parameters.
    ///
    /// Returns `Ok(())` if all parameters are valid, or `Err` with a description
    /// of the first validation failure.
    ///
    /// # Validation Rules
    /// - World bounds must be finite with `max > min` on every axis
    /// - Spatial index cell size and cell diameter must be positive
    /// - Layout spans and noise are checked again by the seeder itself
    pub fn validate(&self) -> anyhow::Result<()> {
        // World validation
        for axis in 0..3 {
            let (min, max) = (self.world.bounds_min[axis], self.world.bounds_max[axis]);
            anyhow::ensure!(
                min.is_finite() && max.is_finite(),
                "World bounds must be finite (axis {axis})"
            );
            anyhow::ensure!(
                max > min,
                "World bounds max must exceed min (axis {axis})"
            );
        }
        anyhow::ensure!(
            self.world.cell_size.is_finite() && self.world.cell_size > 0.0,
            "Cell size must be positive"
        );

        // Cell validation
        anyhow::ensure!(
            self.cell.diameter.is_finite() && self.cell.diameter > 0.0,
            "Cell diameter must be positive"
        );

        // Layout validation
        match &self.layout {
            LayoutConfig::Single { position } => {
                anyhow::ensure!(position.is_finite(), "Single position must be finite");
            }
            LayoutConfig::Grid2d(grid) => {
                grid.validate()?;
            }
            LayoutConfig::Grid3d(grid) => {
                grid.validate()?;
            }
        }

        Ok(())
    }

    /// Parses and validates configuration from TOML text.
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config = toml::from_str::<Self>(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads `path`, falling back to defaults when the file does not exist.
    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        if !path.exists() {
            tracing::warn!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    #[must_use]
    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(format!("{:?}", self.world).as_bytes());
        hasher.update(format!("{:?}", self.cell).as_bytes());
        hasher.update(format!("{:?}", self.palette).as_bytes());
        hasher.update(format!("{:?}", self.layout).as_bytes());
        hex::encode(hasher.finalize())
    }
}

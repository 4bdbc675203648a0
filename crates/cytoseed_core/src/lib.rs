//! # Cytoseed Core
//!
//! Cell assembly and lattice seeding for agent-based tissue simulations.
//!
//! This crate contains:
//! - The cell assembler, wiring a soma, a physical sphere and a spatial node
//! - 2D and 3D lattice seeding with seeded Gaussian jitter
//! - A standard environment (body registry, spatial index, palette, noise)
//! - Configuration, error types and structured logging
//!
//! ## Example
//!
//! ```
//! use cytoseed_core::environment::SimEnvironment;
//! use cytoseed_core::factory::CellFactory;
//! use cytoseed_core::lattice::{Grid2d, Span};
//!
//! let mut env = SimEnvironment::with_seed(42);
//! let factory = CellFactory::new();
//! let grid = Grid2d {
//!     x: Span::new(0.0, 100.0),
//!     y: Span::new(0.0, 100.0),
//!     z: 0.0,
//!     nx: 3,
//!     ny: 4,
//!     noise_std: 1.0,
//! };
//! let cells = factory.create_2d_grid(&mut env, &grid).unwrap();
//! assert_eq!(cells.len(), 12);
//! assert_eq!(env.registry.len(), 12);
//! ```

/// Configuration management for seeding parameters
pub mod config;
/// Collaborator contract and the standard environment
pub mod environment;
/// Error taxonomy
pub mod error;
/// Single-cell assembly
pub mod factory;
/// Regular lattices of cells
pub mod lattice;
/// Seeding counters and logging setup
pub mod metrics;
/// Seeded Gaussian noise
pub mod noise;
/// Cell type to color mapping
pub mod palette;
/// Arena of registered physical spheres
pub mod registry;
/// Uniform grid spatial index
pub mod spatial_index;

pub use config::AppConfig;
pub use environment::{Environment, SimEnvironment};
pub use error::{CellError, Result};
pub use factory::{CellFactory, PhysicalSphereFactory, SomaFactory};
pub use lattice::{seed_2d, seed_3d, Grid2d, Grid3d, Span};
pub use metrics::{init_logging, Metrics};

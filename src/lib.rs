//! Cytoseed: assemble simulated cells and seed them on jittered lattices.
//!
//! This crate re-exports the data model and the core so applications depend
//! on a single library.

pub use cytoseed_core::{
    init_logging, seed_2d, seed_3d, AppConfig, CellError, CellFactory, Environment, Grid2d,
    Grid3d, Metrics, SimEnvironment, Span,
};
pub use cytoseed_data::{BodyId, Cell, CellType, Color, PhysicalSphere, Position, SomaElement};

pub mod report;

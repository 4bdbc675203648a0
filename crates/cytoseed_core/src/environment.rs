//! The simulation context cells are assembled into.
//!
//! [`Environment`] is the narrow contract the assembler and seeder rely on;
//! [`SimEnvironment`] is the standard implementation composed of a body
//! registry, a spatial index, a type palette and a seeded noise source.

use crate::config::AppConfig;
use crate::error::Result;
use crate::noise::NoiseSource;
use crate::palette::CellPalette;
use crate::registry::BodyRegistry;
use crate::spatial_index::SpatialIndex;
use cytoseed_data::{BodyId, CellType, Color, PhysicalSphere, Position, SpaceNodeId};

/// Collaborator services needed to build and place cells.
pub trait Environment {
    /// Creates a spatial-index node at `position` that routes queries back to `body`.
    fn spatial_node_for(&mut self, position: Position, body: BodyId) -> Result<SpaceNodeId>;

    /// Drops a node previously returned by [`Environment::spatial_node_for`].
    fn remove_spatial_node(&mut self, node: SpaceNodeId);

    /// Makes `sphere` visible to whole-simulation queries.
    fn add_physical_sphere(&mut self, sphere: PhysicalSphere) -> Result<()>;

    /// Withdraws a sphere registered by [`Environment::add_physical_sphere`].
    /// Its spatial node is left alone.
    fn unregister_physical_sphere(&mut self, id: BodyId) -> Option<PhysicalSphere>;

    fn physical_sphere_mut(&mut self, id: BodyId) -> Option<&mut PhysicalSphere>;

    fn cell_type_color(&self, cell_type: &CellType) -> Color;

    /// One sample from `N(mean, std_dev)`, advancing the shared noise stream.
    fn gaussian(&mut self, mean: f64, std_dev: f64) -> f64;
}

#[derive(Debug, Clone)]
pub struct SimEnvironment {
    pub registry: BodyRegistry,
    pub space: SpatialIndex,
    pub palette: CellPalette,
    noise: NoiseSource,
}

impl SimEnvironment {
    /// Builds an environment from a validated configuration.
    pub fn new(config: &AppConfig) -> anyhow::Result<Self> {
        config.validate()?;
        let space = SpatialIndex::new(
            config.world.cell_size,
            Position::from(config.world.bounds_min),
            Position::from(config.world.bounds_max),
        );
        let noise = match config.world.effective_seed() {
            Some(seed) => NoiseSource::seeded(seed),
            None => NoiseSource::from_entropy(),
        };
        tracing::info!(
            seed = ?noise.seed(),
            fingerprint = %config.fingerprint(),
            "Environment ready"
        );
        Ok(Self {
            registry: BodyRegistry::new(),
            space,
            palette: CellPalette::from_config(&config.palette),
            noise,
        })
    }

    /// Default configuration with a fixed noise seed.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        let world = crate::config::WorldConfig::default();
        Self {
            registry: BodyRegistry::new(),
            space: SpatialIndex::new(
                world.cell_size,
                Position::from(world.bounds_min),
                Position::from(world.bounds_max),
            ),
            palette: CellPalette::new(),
            noise: NoiseSource::seeded(seed),
        }
    }

    pub fn physical_sphere(&self, id: BodyId) -> Option<PhysicalSphere> {
        self.registry.get(id)
    }

    /// All registered spheres in registration order.
    pub fn physical_spheres(&self) -> Vec<PhysicalSphere> {
        self.registry.physical_spheres()
    }

    /// Removes a sphere together with its spatial node.
    pub fn remove_physical_sphere(&mut self, id: BodyId) -> Option<PhysicalSphere> {
        let sphere = self.registry.remove(id)?;
        if let Some(node) = sphere.space_node {
            self.space.remove(node);
        }
        Some(sphere)
    }

    /// Bodies whose spatial node lies within `radius` of `center`.
    pub fn neighbors(&self, center: Position, radius: f64) -> Vec<BodyId> {
        let mut out = Vec::new();
        self.space.query_into(center, radius, &mut out);
        out
    }
}

impl Environment for SimEnvironment {
    fn spatial_node_for(&mut self, position: Position, body: BodyId) -> Result<SpaceNodeId> {
        self.space.insert(position, body)
    }

    fn remove_spatial_node(&mut self, node: SpaceNodeId) {
        self.space.remove(node);
    }

    fn add_physical_sphere(&mut self, sphere: PhysicalSphere) -> Result<()> {
        self.registry.add(sphere)
    }

    fn unregister_physical_sphere(&mut self, id: BodyId) -> Option<PhysicalSphere> {
        self.registry.remove(id)
    }

    fn physical_sphere_mut(&mut self, id: BodyId) -> Option<&mut PhysicalSphere> {
        self.registry.get_mut(id)
    }

    fn cell_type_color(&self, cell_type: &CellType) -> Color {
        self.palette.color_for(cell_type)
    }

    fn gaussian(&mut self, mean: f64, std_dev: f64) -> f64 {
        self.noise.gaussian(mean, std_dev)
    }
}

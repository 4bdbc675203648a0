//! Assembly of single cells from their soma, sphere and spatial node.

use crate::config::CellConfig;
use crate::environment::Environment;
use crate::error::{CellError, Result};
use crate::metrics::Metrics;
use cytoseed_data::{Cell, CellId, CellType, PhysicalSphere, Position, SomaElement};
use std::sync::Arc;

/// Named counter bumped whenever a spatial node is released after a failed assembly.
pub const NODE_ROLLBACK: &str = "node_rollback";
/// Named counter bumped whenever a registered sphere is withdrawn after a failed assembly.
pub const REGISTRATION_ROLLBACK: &str = "registration_rollback";

/// Produces unlinked soma elements.
pub trait SomaFactory {
    fn create(&self) -> Result<SomaElement>;
}

/// Produces physical spheres with no location, node or color yet.
pub trait PhysicalSphereFactory {
    fn create(&self) -> Result<PhysicalSphere>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultSomaFactory;

impl SomaFactory for DefaultSomaFactory {
    fn create(&self) -> Result<SomaElement> {
        Ok(SomaElement::new())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SphereFactory {
    pub diameter: f64,
}

impl Default for SphereFactory {
    fn default() -> Self {
        Self { diameter: 20.0 }
    }
}

impl PhysicalSphereFactory for SphereFactory {
    fn create(&self) -> Result<PhysicalSphere> {
        if !(self.diameter.is_finite() && self.diameter > 0.0) {
            return Err(CellError::collaborator(
                "sphere factory",
                format!("diameter {} must be positive", self.diameter),
            ));
        }
        Ok(PhysicalSphere::new(self.diameter))
    }
}

/// Builds fully wired [`Cell`]s inside an [`Environment`].
///
/// The environment is passed to every call rather than stored, so one
/// factory can seed any number of environments.
///
/// # Examples
/// ```
/// use cytoseed_core::environment::SimEnvironment;
/// use cytoseed_core::factory::CellFactory;
/// use cytoseed_data::Position;
///
/// let mut env = SimEnvironment::with_seed(1);
/// let factory = CellFactory::new();
/// let cell = factory.create_cell(&mut env, Position::new(1.0, 2.0, 3.0)).unwrap();
/// assert_eq!(env.registry.len(), 1);
/// assert_eq!(cell.soma.physical, Some(cell.body));
/// ```
#[derive(Debug, Clone)]
pub struct CellFactory<S = DefaultSomaFactory, P = SphereFactory> {
    soma_factory: S,
    sphere_factory: P,
    cell_type: CellType,
    metrics: Option<Arc<Metrics>>,
}

impl CellFactory {
    #[must_use]
    pub fn new() -> Self {
        Self::with_factories(DefaultSomaFactory, SphereFactory::default())
    }

    #[must_use]
    pub fn from_config(config: &CellConfig) -> Self {
        Self::with_factories(
            DefaultSomaFactory,
            SphereFactory {
                diameter: config.diameter,
            },
        )
        .with_cell_type(config.default_type.clone())
    }
}

impl Default for CellFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: SomaFactory, P: PhysicalSphereFactory> CellFactory<S, P> {
    pub fn with_factories(soma_factory: S, sphere_factory: P) -> Self {
        Self {
            soma_factory,
            sphere_factory,
            cell_type: CellType::default(),
            metrics: None,
        }
    }

    /// Type given to cells created through [`CellFactory::create_cell`].
    #[must_use]
    pub fn with_cell_type(mut self, cell_type: CellType) -> Self {
        self.cell_type = cell_type;
        self
    }

    #[must_use]
    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn cell_type(&self) -> &CellType {
        &self.cell_type
    }

    /// Creates a cell of the factory's default type at `origin`.
    pub fn create_cell<E: Environment + ?Sized>(
        &self,
        env: &mut E,
        origin: Position,
    ) -> Result<Cell> {
        self.create_cell_of_type(env, origin, self.cell_type.clone())
    }

    /// Creates a cell of `cell_type` at `origin`.
    ///
    /// Either every wiring step succeeds, or the call fails without leaving a
    /// registered sphere or a spatial node behind. Rollbacks are counted under
    /// [`NODE_ROLLBACK`] and [`REGISTRATION_ROLLBACK`] when metrics are attached.
    pub fn create_cell_of_type<E: Environment + ?Sized>(
        &self,
        env: &mut E,
        origin: Position,
        cell_type: CellType,
    ) -> Result<Cell> {
        let result = self.assemble(env, origin, cell_type);
        if let Some(metrics) = &self.metrics {
            match &result {
                Ok(_) => metrics.record_cell_created(),
                Err(_) => metrics.record_cell_failed(),
            }
        }
        result
    }

    fn assemble<E: Environment + ?Sized>(
        &self,
        env: &mut E,
        origin: Position,
        cell_type: CellType,
    ) -> Result<Cell> {
        let mut soma = self.soma_factory.create()?;
        let mut sphere = self.sphere_factory.create()?;
        soma.physical = Some(sphere.id);
        sphere.soma = Some(soma.id);

        let node = env.spatial_node_for(origin, sphere.id)?;
        sphere.space_node = Some(node);

        // Registration is the first step visible to the rest of the simulation.
        let body = sphere.id;
        if let Err(err) = env.add_physical_sphere(sphere) {
            tracing::warn!(%body, %node, error = %err, "Registration failed, releasing spatial node");
            env.remove_spatial_node(node);
            self.count(NODE_ROLLBACK);
            return Err(err);
        }

        let color = env.cell_type_color(&cell_type);
        match env.physical_sphere_mut(body) {
            Some(sphere) => {
                sphere.mass_location = Some(origin);
                sphere.color = Some(color);
            }
            None => {
                tracing::error!(%body, %node, "Registered sphere not found during assembly, rolling back");
                env.unregister_physical_sphere(body);
                env.remove_spatial_node(node);
                self.count(REGISTRATION_ROLLBACK);
                self.count(NODE_ROLLBACK);
                return Err(CellError::PartialConstruction(body));
            }
        }

        let cell = Cell {
            id: CellId::new_v4(),
            cell_type,
            soma,
            body,
        };
        tracing::debug!(
            cell = %cell.id,
            %body,
            kind = %cell.cell_type,
            x = origin.x,
            y = origin.y,
            z = origin.z,
            "Created cell"
        );
        Ok(cell)
    }

    fn count(&self, name: &str) {
        if let Some(metrics) = &self.metrics {
            metrics.increment_counter(name);
        }
    }

    pub(crate) fn record_grid(&self) {
        if let Some(metrics) = &self.metrics {
            metrics.record_grid_seeded();
        }
    }
}

pub mod macros;

use cytoseed_core::config::{AppConfig, WorldConfig};
use cytoseed_core::Result;
use cytoseed_lib::{BodyId, CellError, CellType, Color, Environment, PhysicalSphere, Position, SimEnvironment};
use cytoseed_data::SpaceNodeId;
use std::collections::VecDeque;

#[allow(dead_code)]
pub struct EnvBuilder {
    config: AppConfig,
    overrides: Vec<(String, Color)>,
}

#[allow(dead_code)]
impl EnvBuilder {
    pub fn new() -> Self {
        let config = AppConfig {
            world: WorldConfig {
                seed: Some(42),
                ..Default::default()
            },
            ..Default::default()
        };
        Self {
            config,
            overrides: Vec::new(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.world.seed = Some(seed);
        self
    }

    pub fn with_bounds(mut self, min: [f64; 3], max: [f64; 3]) -> Self {
        self.config.world.bounds_min = min;
        self.config.world.bounds_max = max;
        self
    }

    pub fn with_color(mut self, type_name: &str, color: Color) -> Self {
        self.overrides.push((type_name.to_string(), color));
        self
    }

    pub fn with_config<F>(mut self, modifier: F) -> Self
    where
        F: FnOnce(&mut AppConfig),
    {
        modifier(&mut self.config);
        self
    }

    pub fn build(self) -> SimEnvironment {
        let mut env = SimEnvironment::new(&self.config).expect("Failed to create environment");
        for (name, color) in self.overrides {
            env.palette.set_override(name, color);
        }
        env
    }
}

/// Environment wrapper that records every collaborator call and can be told to fail.
#[allow(dead_code)]
pub struct ScriptedEnv {
    pub inner: SimEnvironment,
    pub calls: Vec<&'static str>,
    /// Fail the n-th (0-based) spatial node request.
    pub fail_spatial_at: Option<usize>,
    /// Fail the n-th (0-based) registration.
    pub fail_register_at: Option<usize>,
    /// Pretend registered spheres cannot be looked up again.
    pub lose_bodies: bool,
    /// Offsets returned by `gaussian` (added to the mean) until exhausted.
    pub noise_script: VecDeque<f64>,
    /// `std_dev` of every `gaussian` call, in order.
    pub std_devs: Vec<f64>,
    spatial_requests: usize,
    registrations: usize,
}

#[allow(dead_code)]
impl ScriptedEnv {
    pub fn new(inner: SimEnvironment) -> Self {
        Self {
            inner,
            calls: Vec::new(),
            fail_spatial_at: None,
            fail_register_at: None,
            lose_bodies: false,
            noise_script: VecDeque::new(),
            std_devs: Vec::new(),
            spatial_requests: 0,
            registrations: 0,
        }
    }

    pub fn failing_spatial_at(mut self, n: usize) -> Self {
        self.fail_spatial_at = Some(n);
        self
    }

    pub fn failing_register_at(mut self, n: usize) -> Self {
        self.fail_register_at = Some(n);
        self
    }

    pub fn losing_bodies(mut self) -> Self {
        self.lose_bodies = true;
        self
    }

    pub fn with_noise<I: IntoIterator<Item = f64>>(mut self, offsets: I) -> Self {
        self.noise_script.extend(offsets);
        self
    }

    pub fn count(&self, call: &str) -> usize {
        self.calls.iter().filter(|c| **c == call).count()
    }
}

impl Environment for ScriptedEnv {
    fn spatial_node_for(&mut self, position: Position, body: BodyId) -> Result<SpaceNodeId> {
        self.calls.push("spatial_node_for");
        let n = self.spatial_requests;
        self.spatial_requests += 1;
        if self.fail_spatial_at == Some(n) {
            return Err(CellError::collaborator("spatial index", "scripted failure"));
        }
        self.inner.spatial_node_for(position, body)
    }

    fn remove_spatial_node(&mut self, node: SpaceNodeId) {
        self.calls.push("remove_spatial_node");
        self.inner.remove_spatial_node(node);
    }

    fn add_physical_sphere(&mut self, sphere: PhysicalSphere) -> Result<()> {
        self.calls.push("add_physical_sphere");
        let n = self.registrations;
        self.registrations += 1;
        if self.fail_register_at == Some(n) {
            return Err(CellError::collaborator("body registry", "scripted failure"));
        }
        self.inner.add_physical_sphere(sphere)
    }

    fn unregister_physical_sphere(&mut self, id: BodyId) -> Option<PhysicalSphere> {
        self.calls.push("unregister_physical_sphere");
        self.inner.unregister_physical_sphere(id)
    }

    fn physical_sphere_mut(&mut self, id: BodyId) -> Option<&mut PhysicalSphere> {
        self.calls.push("physical_sphere_mut");
        if self.lose_bodies {
            return None;
        }
        self.inner.physical_sphere_mut(id)
    }

    fn cell_type_color(&self, cell_type: &CellType) -> Color {
        self.inner.cell_type_color(cell_type)
    }

    fn gaussian(&mut self, mean: f64, std_dev: f64) -> f64 {
        self.calls.push("gaussian");
        self.std_devs.push(std_dev);
        match self.noise_script.pop_front() {
            Some(offset) => mean + offset,
            None => self.inner.gaussian(mean, std_dev),
        }
    }
}

/// Location of a cell's sphere, panicking if the cell is not fully wired.
#[allow(dead_code)]
pub fn location(env: &SimEnvironment, cell: &cytoseed_lib::Cell) -> Position {
    env.physical_sphere(cell.body)
        .and_then(|s| s.mass_location)
        .expect("Cell has no registered location")
}

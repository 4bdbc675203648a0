use crate::error::{CellError, Result};
use cytoseed_data::{BodyId, PhysicalSphere};
use std::collections::HashMap;

/// Arena of registered physical spheres.
///
/// Spheres live as components in a `hecs::World`; [`BodyId`] handles are
/// mapped to entities so back-references stay valid without pointers.
/// Iteration follows registration order.
#[derive(Default)]
pub struct BodyRegistry {
    world: hecs::World,
    handles: HashMap<BodyId, hecs::Entity>,
    order: Vec<BodyId>,
}

impl std::fmt::Debug for BodyRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BodyRegistry")
            .field("len", &self.order.len())
            .finish()
    }
}

impl Clone for BodyRegistry {
    fn clone(&self) -> Self {
        let mut registry = Self::new();
        for sphere in self.physical_spheres() {
            let entity = registry.world.spawn((sphere.clone(),));
            registry.handles.insert(sphere.id, entity);
            registry.order.push(sphere.id);
        }
        registry
    }
}

impl BodyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, sphere: PhysicalSphere) -> Result<()> {
        if self.handles.contains_key(&sphere.id) {
            return Err(CellError::collaborator(
                "body registry",
                format!("body {} is already registered", sphere.id),
            ));
        }
        let id = sphere.id;
        let entity = self.world.spawn((sphere,));
        self.handles.insert(id, entity);
        self.order.push(id);
        Ok(())
    }

    pub fn get(&self, id: BodyId) -> Option<PhysicalSphere> {
        let entity = *self.handles.get(&id)?;
        self.world
            .get::<&PhysicalSphere>(entity)
            .ok()
            .map(|sphere| PhysicalSphere::clone(&sphere))
    }

    pub fn get_mut(&mut self, id: BodyId) -> Option<&mut PhysicalSphere> {
        let entity = *self.handles.get(&id)?;
        self.world.query_one_mut::<&mut PhysicalSphere>(entity).ok()
    }

    pub fn contains(&self, id: BodyId) -> bool {
        self.handles.contains_key(&id)
    }

    pub fn remove(&mut self, id: BodyId) -> Option<PhysicalSphere> {
        let entity = self.handles.remove(&id)?;
        self.order.retain(|b| *b != id);
        let sphere = self.world.remove_one::<PhysicalSphere>(entity).ok();
        let _ = self.world.despawn(entity);
        sphere
    }

    /// Snapshot of all spheres in registration order.
    pub fn physical_spheres(&self) -> Vec<PhysicalSphere> {
        self.order.iter().filter_map(|id| self.get(*id)).collect()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

use crate::error::{CellError, Result};
use cytoseed_data::{BodyId, Position, SpaceNodeId};
use std::collections::HashMap;

/// Entry of the spatial index: where a body sits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpaceNode {
    pub id: SpaceNodeId,
    pub position: Position,
    pub body: BodyId,
}

/// Uniform 3D grid hash over a bounded region.
///
/// Nodes are bucketed by grid cell; only occupied buckets are stored, so a
/// large region with few cells stays cheap. The index owns its nodes, bodies
/// only hold their [`SpaceNodeId`].
///
/// # Fields
/// - `cell_size`: Edge length of each grid cell in world units
/// - `min/max`: Corners of the indexed region (inclusive)
/// - `dims`: Grid dimensions (# cells along x, y, z)
///
/// # Examples
/// ```
/// use cytoseed_core::spatial_index::SpatialIndex;
/// use cytoseed_data::{BodyId, Position};
///
/// let mut index = SpatialIndex::new(10.0, Position::new(0.0, 0.0, 0.0), Position::new(100.0, 100.0, 100.0));
/// let body = BodyId::new_v4();
/// index.insert(Position::new(15.0, 15.0, 15.0), body).unwrap();
///
/// let mut nearby = Vec::new();
/// index.query_into(Position::new(12.0, 12.0, 12.0), 10.0, &mut nearby);
/// assert_eq!(nearby, vec![body]);
/// ```
#[derive(Debug, Clone)]
pub struct SpatialIndex {
    pub cell_size: f64,
    pub min: Position,
    pub max: Position,
    pub dims: [usize; 3],
    buckets: HashMap<usize, Vec<SpaceNodeId>>,
    nodes: HashMap<SpaceNodeId, SpaceNode>,
    next_id: u64,
}

impl SpatialIndex {
    pub fn new(cell_size: f64, min: Position, max: Position) -> Self {
        let dim = |lo: f64, hi: f64| (((hi - lo) / cell_size).ceil() as usize).max(1);
        Self {
            cell_size,
            min,
            max,
            dims: [dim(min.x, max.x), dim(min.y, max.y), dim(min.z, max.z)],
            buckets: HashMap::new(),
            nodes: HashMap::new(),
            next_id: 0,
        }
    }

    /// Grid coordinates of `p`, or `None` when it is non-finite or outside the region.
    #[inline]
    pub fn get_cell_coords(&self, p: Position) -> Option<[usize; 3]> {
        if !p.is_finite() {
            return None;
        }
        let lo = self.min.to_array();
        let hi = self.max.to_array();
        let v = p.to_array();
        let mut coords = [0usize; 3];
        for axis in 0..3 {
            if v[axis] < lo[axis] || v[axis] > hi[axis] {
                return None;
            }
            let rel = (v[axis] - lo[axis]) / self.cell_size;
            // Check for i32 overflow before casting
            if rel > i32::MAX as f64 {
                return None;
            }
            coords[axis] = (rel as usize).min(self.dims[axis] - 1);
        }
        Some(coords)
    }

    #[inline]
    pub fn get_cell_idx(&self, p: Position) -> Option<usize> {
        self.get_cell_coords(p).and_then(|c| self.flat_index(c))
    }

    #[inline]
    fn flat_index(&self, [cx, cy, cz]: [usize; 3]) -> Option<usize> {
        cz.checked_mul(self.dims[1])?
            .checked_add(cy)?
            .checked_mul(self.dims[0])?
            .checked_add(cx)
    }

    /// Adds a node for `body` at `position`.
    pub fn insert(&mut self, position: Position, body: BodyId) -> Result<SpaceNodeId> {
        let Some(idx) = self.get_cell_idx(position) else {
            return Err(CellError::collaborator(
                "spatial index",
                format!(
                    "position ({}, {}, {}) is outside the indexed region",
                    position.x, position.y, position.z
                ),
            ));
        };
        let id = SpaceNodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id, SpaceNode { id, position, body });
        self.buckets.entry(idx).or_default().push(id);
        Ok(id)
    }

    pub fn remove(&mut self, id: SpaceNodeId) -> Option<SpaceNode> {
        let node = self.nodes.remove(&id)?;
        if let Some(idx) = self.get_cell_idx(node.position) {
            if let Some(bucket) = self.buckets.get_mut(&idx) {
                bucket.retain(|n| *n != id);
                if bucket.is_empty() {
                    self.buckets.remove(&idx);
                }
            }
        }
        Some(node)
    }

    pub fn node(&self, id: SpaceNodeId) -> Option<&SpaceNode> {
        self.nodes.get(&id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Calls `callback` for every node within `radius` of `center`.
    pub fn query_callback<F>(&self, center: Position, radius: f64, mut callback: F)
    where
        F: FnMut(&SpaceNode),
    {
        if !center.is_finite() || !radius.is_finite() || radius < 0.0 {
            return;
        }
        let c = center.to_array();
        let lo = self.min.to_array();
        let mut range = [(0usize, 0usize); 3];
        for axis in 0..3 {
            let from = ((c[axis] - radius - lo[axis]) / self.cell_size).floor();
            let to = ((c[axis] + radius - lo[axis]) / self.cell_size).floor();
            let last = (self.dims[axis] - 1) as f64;
            if to < 0.0 || from > last {
                return;
            }
            range[axis] = (from.max(0.0) as usize, to.min(last) as usize);
        }

        let r2 = radius * radius;
        for cz in range[2].0..=range[2].1 {
            for cy in range[1].0..=range[1].1 {
                for cx in range[0].0..=range[0].1 {
                    let Some(bucket) = self
                        .flat_index([cx, cy, cz])
                        .and_then(|idx| self.buckets.get(&idx))
                    else {
                        continue;
                    };
                    for id in bucket {
                        if let Some(node) = self.nodes.get(id) {
                            if node.position.distance_squared(&center) <= r2 {
                                callback(node);
                            }
                        }
                    }
                }
            }
        }
    }

    pub fn query_into(&self, center: Position, radius: f64, out: &mut Vec<BodyId>) {
        self.query_callback(center, radius, |node| out.push(node.body));
    }

    pub fn count_nearby(&self, center: Position, radius: f64) -> usize {
        let mut count = 0;
        self.query_callback(center, radius, |_| count += 1);
        count
    }
}

use anyhow::{anyhow, Result};
use cytoseed_core::SimEnvironment;
use cytoseed_data::{Cell, CellType, Color, Position};
use serde::Serialize;
use uuid::Uuid;

/// One line of CLI output describing a seeded cell.
#[derive(Debug, Clone, Serialize)]
pub struct CellReport {
    pub id: Uuid,
    pub cell_type: CellType,
    pub position: Option<Position>,
    pub color: Option<Color>,
    pub diameter: f64,
}

impl CellReport {
    /// Reads each cell's sphere back from the environment.
    ///
    /// Fails on the first cell whose body is no longer registered, so the
    /// report never lists fewer cells than it was given.
    pub fn collect(env: &SimEnvironment, cells: &[Cell]) -> Result<Vec<CellReport>> {
        cells
            .iter()
            .map(|cell| {
                let sphere = env.physical_sphere(cell.body).ok_or_else(|| {
                    anyhow!("cell {} has no registered body {}", cell.id, cell.body)
                })?;
                Ok(CellReport {
                    id: cell.id.0,
                    cell_type: cell.cell_type.clone(),
                    position: sphere.mass_location,
                    color: sphere.color,
                    diameter: sphere.diameter,
                })
            })
            .collect()
    }
}

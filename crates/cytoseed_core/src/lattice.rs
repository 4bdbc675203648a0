//! Regular 2D and 3D lattices of cells with Gaussian jitter.
//!
//! Grid points are strictly interior to the bounding box: an axis with `n`
//! cells is divided into `n + 1` intervals and index `1..=n` is used. Each
//! point is perturbed by one noise draw per axis, drawn in x, y, z order, and
//! points are visited with the x index outermost.

use crate::environment::Environment;
use crate::error::{CellError, Result};
use crate::factory::{CellFactory, PhysicalSphereFactory, SomaFactory};
use cytoseed_data::{Cell, Position};
use serde::{Deserialize, Serialize};

/// Closed interval along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub min: f64,
    pub max: f64,
}

impl Span {
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Distance between neighbouring lattice points for `count` points.
    #[inline]
    #[must_use]
    pub fn spacing(&self, count: usize) -> f64 {
        (self.max - self.min) / (count as f64 + 1.0)
    }

    /// Coordinate of the 1-based lattice `index` out of `count` points.
    #[inline]
    #[must_use]
    pub fn lattice_coordinate(&self, index: usize, count: usize) -> f64 {
        self.min + index as f64 * self.spacing(count)
    }

    fn validate(&self, axis: &str) -> Result<()> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(CellError::geometry(format!(
                "{axis} span [{}, {}] is not finite",
                self.min, self.max
            )));
        }
        if self.max <= self.min {
            return Err(CellError::geometry(format!(
                "{axis} span [{}, {}] must have max > min",
                self.min, self.max
            )));
        }
        Ok(())
    }
}

fn validate_noise(name: &str, std_dev: f64) -> Result<()> {
    if std_dev.is_finite() && std_dev >= 0.0 {
        Ok(())
    } else {
        Err(CellError::noise(format!(
            "{name} must be finite and non-negative, got {std_dev}"
        )))
    }
}

fn count_overflow(counts: &[usize]) -> CellError {
    let dims: Vec<String> = counts.iter().map(ToString::to_string).collect();
    CellError::geometry(format!(
        "a {} lattice has more points than fit in memory",
        dims.join(" x ")
    ))
}

fn reserve_cells(count: usize) -> Result<Vec<Cell>> {
    let mut cells = Vec::new();
    cells
        .try_reserve_exact(count)
        .map_err(|e| CellError::geometry(format!("cannot hold {count} cells: {e}")))?;
    Ok(cells)
}

/// A planar lattice at height `z` with isotropic noise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Grid2d {
    pub x: Span,
    pub y: Span,
    pub z: f64,
    pub nx: usize,
    pub ny: usize,
    /// Applied to all three axes, z included.
    pub noise_std: f64,
}

impl Default for Grid2d {
    fn default() -> Self {
        Self {
            x: Span::new(0.0, 100.0),
            y: Span::new(0.0, 100.0),
            z: 0.0,
            nx: 5,
            ny: 5,
            noise_std: 0.0,
        }
    }
}

impl Grid2d {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nx == 0 || self.ny == 0
    }

    /// Number of lattice points, or an error if it does not fit in `usize`.
    pub fn point_count(&self) -> Result<usize> {
        self.nx
            .checked_mul(self.ny)
            .ok_or_else(|| count_overflow(&[self.nx, self.ny]))
    }

    /// Checks geometry, noise and point count. Empty lattices are always valid.
    pub fn validate(&self) -> Result<()> {
        if self.is_empty() {
            return Ok(());
        }
        self.point_count()?;
        self.x.validate("x")?;
        self.y.validate("y")?;
        if !self.z.is_finite() {
            return Err(CellError::geometry(format!("z = {} is not finite", self.z)));
        }
        validate_noise("noise_std", self.noise_std)
    }

    /// Unperturbed lattice points in seeding order.
    pub fn base_points(&self) -> impl Iterator<Item = Position> + '_ {
        (1..=self.nx).flat_map(move |i| {
            (1..=self.ny).map(move |j| {
                Position::new(
                    self.x.lattice_coordinate(i, self.nx),
                    self.y.lattice_coordinate(j, self.ny),
                    self.z,
                )
            })
        })
    }
}

/// A volumetric lattice with separate in-plane and vertical noise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Grid3d {
    pub x: Span,
    pub y: Span,
    pub z: Span,
    pub nx: usize,
    pub ny: usize,
    pub nz: usize,
    pub noise_xy_std: f64,
    pub noise_z_std: f64,
}

impl Default for Grid3d {
    fn default() -> Self {
        Self {
            x: Span::new(0.0, 100.0),
            y: Span::new(0.0, 100.0),
            z: Span::new(0.0, 100.0),
            nx: 4,
            ny: 4,
            nz: 4,
            noise_xy_std: 0.0,
            noise_z_std: 0.0,
        }
    }
}

impl Grid3d {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nx == 0 || self.ny == 0 || self.nz == 0
    }

    /// Number of lattice points, or an error if it does not fit in `usize`.
    pub fn point_count(&self) -> Result<usize> {
        self.nx
            .checked_mul(self.ny)
            .and_then(|n| n.checked_mul(self.nz))
            .ok_or_else(|| count_overflow(&[self.nx, self.ny, self.nz]))
    }

    /// Checks geometry, noise and point count. Empty lattices are always valid.
    pub fn validate(&self) -> Result<()> {
        if self.is_empty() {
            return Ok(());
        }
        self.point_count()?;
        self.x.validate("x")?;
        self.y.validate("y")?;
        self.z.validate("z")?;
        validate_noise("noise_xy_std", self.noise_xy_std)?;
        validate_noise("noise_z_std", self.noise_z_std)
    }

    /// Unperturbed lattice points in seeding order.
    pub fn base_points(&self) -> impl Iterator<Item = Position> + '_ {
        (1..=self.nx).flat_map(move |i| {
            (1..=self.ny).flat_map(move |j| {
                (1..=self.nz).map(move |k| {
                    Position::new(
                        self.x.lattice_coordinate(i, self.nx),
                        self.y.lattice_coordinate(j, self.ny),
                        self.z.lattice_coordinate(k, self.nz),
                    )
                })
            })
        })
    }
}

impl<S: SomaFactory, P: PhysicalSphereFactory> CellFactory<S, P> {
    /// Seeds one cell per point of a planar lattice.
    ///
    /// Fails fast: the first failing cell aborts the whole grid and no
    /// partial sequence is returned.
    pub fn create_2d_grid<E: Environment + ?Sized>(
        &self,
        env: &mut E,
        grid: &Grid2d,
    ) -> Result<Vec<Cell>> {
        if grid.is_empty() {
            return Ok(Vec::new());
        }
        grid.validate()?;

        let mut cells = reserve_cells(grid.point_count()?)?;
        for (n, base) in grid.base_points().enumerate() {
            let location = Position::new(
                base.x + env.gaussian(0.0, grid.noise_std),
                base.y + env.gaussian(0.0, grid.noise_std),
                base.z + env.gaussian(0.0, grid.noise_std),
            );
            tracing::trace!(n, x = location.x, y = location.y, z = location.z, "Lattice point");
            let cell = self
                .create_cell(env, location)
                .map_err(|e| e.with_context(format!("2d grid point {n}")))?;
            cells.push(cell);
        }

        self.record_grid();
        tracing::info!(cells = cells.len(), nx = grid.nx, ny = grid.ny, "Seeded 2d grid");
        Ok(cells)
    }

    /// Seeds one cell per point of a volumetric lattice.
    ///
    /// x and y jitter use `noise_xy_std`, z jitter uses `noise_z_std`.
    pub fn create_3d_grid<E: Environment + ?Sized>(
        &self,
        env: &mut E,
        grid: &Grid3d,
    ) -> Result<Vec<Cell>> {
        if grid.is_empty() {
            return Ok(Vec::new());
        }
        grid.validate()?;

        let mut cells = reserve_cells(grid.point_count()?)?;
        for (n, base) in grid.base_points().enumerate() {
            let location = Position::new(
                base.x + env.gaussian(0.0, grid.noise_xy_std),
                base.y + env.gaussian(0.0, grid.noise_xy_std),
                base.z + env.gaussian(0.0, grid.noise_z_std),
            );
            tracing::trace!(n, x = location.x, y = location.y, z = location.z, "Lattice point");
            let cell = self
                .create_cell(env, location)
                .map_err(|e| e.with_context(format!("3d grid point {n}")))?;
            cells.push(cell);
        }

        self.record_grid();
        tracing::info!(
            cells = cells.len(),
            nx = grid.nx,
            ny = grid.ny,
            nz = grid.nz,
            "Seeded 3d grid"
        );
        Ok(cells)
    }
}

/// Flat-argument form of [`CellFactory::create_2d_grid`].
#[allow(clippy::too_many_arguments)]
pub fn seed_2d<S, P, E>(
    factory: &CellFactory<S, P>,
    env: &mut E,
    xmin: f64,
    xmax: f64,
    ymin: f64,
    ymax: f64,
    z: f64,
    nx: usize,
    ny: usize,
    noise_std: f64,
) -> Result<Vec<Cell>>
where
    S: SomaFactory,
    P: PhysicalSphereFactory,
    E: Environment + ?Sized,
{
    let grid = Grid2d {
        x: Span::new(xmin, xmax),
        y: Span::new(ymin, ymax),
        z,
        nx,
        ny,
        noise_std,
    };
    factory.create_2d_grid(env, &grid)
}

/// Flat-argument form of [`CellFactory::create_3d_grid`].
#[allow(clippy::too_many_arguments)]
pub fn seed_3d<S, P, E>(
    factory: &CellFactory<S, P>,
    env: &mut E,
    xmin: f64,
    xmax: f64,
    ymin: f64,
    ymax: f64,
    zmin: f64,
    zmax: f64,
    nx: usize,
    ny: usize,
    nz: usize,
    noise_xy_std: f64,
    noise_z_std: f64,
) -> Result<Vec<Cell>>
where
    S: SomaFactory,
    P: PhysicalSphereFactory,
    E: Environment + ?Sized,
{
    let grid = Grid3d {
        x: Span::new(xmin, xmax),
        y: Span::new(ymin, ymax),
        z: Span::new(zmin, zmax),
        nx,
        ny,
        nz,
        noise_xy_std,
        noise_z_std,
    };
    factory.create_3d_grid(env, &grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::SimEnvironment;

    fn env() -> SimEnvironment {
        SimEnvironment::with_seed(42)
    }

    fn location(env: &SimEnvironment, cell: &Cell) -> Position {
        env.physical_sphere(cell.body)
            .and_then(|s| s.mass_location)
            .expect("seeded cell has a location")
    }

    #[test]
    fn test_spacing_divides_into_count_plus_one() {
        let span = Span::new(0.0, 10.0);
        assert!((span.spacing(4) - 2.0).abs() < 1e-12);
        assert!((span.lattice_coordinate(1, 4) - 2.0).abs() < 1e-12);
        assert!((span.lattice_coordinate(4, 4) - 8.0).abs() < 1e-12);
        assert!((span.spacing(0) - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_regular_2d_lattice_in_x_major_order() {
        let mut env = env();
        let factory = CellFactory::new();
        let cells = seed_2d(&factory, &mut env, 0.0, 10.0, 0.0, 10.0, 0.0, 2, 2, 0.0).unwrap();

        let third = 10.0 / 3.0;
        let expected = [
            (third, third),
            (third, 2.0 * third),
            (2.0 * third, third),
            (2.0 * third, 2.0 * third),
        ];
        assert_eq!(cells.len(), 4);
        for (cell, (ex, ey)) in cells.iter().zip(expected) {
            let p = location(&env, cell);
            assert!((p.x - ex).abs() < 1e-9, "x {} != {}", p.x, ex);
            assert!((p.y - ey).abs() < 1e-9, "y {} != {}", p.y, ey);
            assert_eq!(p.z, 0.0);
        }
    }

    #[test]
    fn test_3d_lattice_k_innermost() {
        let mut env = env();
        let factory = CellFactory::new();
        let grid = Grid3d {
            x: Span::new(0.0, 3.0),
            y: Span::new(0.0, 3.0),
            z: Span::new(0.0, 3.0),
            nx: 2,
            ny: 2,
            nz: 2,
            ..Default::default()
        };
        let cells = factory.create_3d_grid(&mut env, &grid).unwrap();
        let points: Vec<_> = cells.iter().map(|c| location(&env, c).to_array()).collect();
        assert_eq!(
            points,
            vec![
                [1.0, 1.0, 1.0],
                [1.0, 1.0, 2.0],
                [1.0, 2.0, 1.0],
                [1.0, 2.0, 2.0],
                [2.0, 1.0, 1.0],
                [2.0, 1.0, 2.0],
                [2.0, 2.0, 1.0],
                [2.0, 2.0, 2.0],
            ]
        );
    }

    #[test]
    fn test_zero_count_is_empty_not_error() {
        let mut env = env();
        let factory = CellFactory::new();
        let cells = seed_2d(&factory, &mut env, 0.0, 10.0, 0.0, 10.0, 0.0, 0, 5, 1.0).unwrap();
        assert!(cells.is_empty());
        let cells = seed_3d(
            &factory, &mut env, 0.0, 10.0, 0.0, 10.0, 0.0, 10.0, 3, 3, 0, 1.0, 1.0,
        )
        .unwrap();
        assert!(cells.is_empty());
        assert!(env.registry.is_empty());
    }

    #[test]
    fn test_inverted_span_is_invalid_geometry() {
        let mut env = env();
        let factory = CellFactory::new();
        let err = seed_2d(&factory, &mut env, 10.0, 0.0, 0.0, 10.0, 0.0, 2, 2, 0.0).unwrap_err();
        assert!(matches!(err, CellError::InvalidGeometry(_)));
        assert!(env.registry.is_empty());
    }

    #[test]
    fn test_negative_noise_is_rejected() {
        let grid = Grid3d {
            noise_z_std: -0.5,
            ..Default::default()
        };
        assert!(matches!(grid.validate(), Err(CellError::InvalidNoise(_))));
    }

    #[test]
    fn test_base_points_match_point_count() {
        let grid = Grid3d {
            nx: 3,
            ny: 4,
            nz: 5,
            ..Default::default()
        };
        assert_eq!(grid.base_points().count(), grid.point_count().unwrap());
        assert_eq!(grid.point_count().unwrap(), 60);
    }

    #[test]
    fn test_point_count_overflow_is_invalid_geometry() {
        let grid = Grid3d {
            nx: usize::MAX,
            ny: 2,
            nz: 1,
            ..Default::default()
        };
        assert!(matches!(grid.point_count(), Err(CellError::InvalidGeometry(_))));
        assert!(matches!(grid.validate(), Err(CellError::InvalidGeometry(_))));
    }
}

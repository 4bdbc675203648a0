mod common;

use common::{location, EnvBuilder};
use cytoseed_lib::{CellFactory, Grid2d, Grid3d, Span};
use proptest::prelude::*;

prop_compose! {
    fn arb_span()(
        min in -400.0f64..400.0,
        width in 1.0f64..500.0
    ) -> Span {
        Span::new(min, min + width)
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_2d_count_and_interior_placement(
        x in arb_span(),
        y in arb_span(),
        z in -100.0f64..100.0,
        nx in 0usize..8,
        ny in 0usize..8
    ) {
        let mut env = EnvBuilder::new().build();
        let grid = Grid2d { x, y, z, nx, ny, noise_std: 0.0 };
        let cells = CellFactory::new().create_2d_grid(&mut env, &grid).unwrap();

        prop_assert_eq!(cells.len(), nx * ny);
        prop_assert_eq!(env.registry.len(), nx * ny);
        for cell in &cells {
            let p = location(&env, cell);
            prop_assert!(p.x > x.min && p.x < x.max, "x {} outside ({}, {})", p.x, x.min, x.max);
            prop_assert!(p.y > y.min && p.y < y.max, "y {} outside ({}, {})", p.y, y.min, y.max);
            prop_assert_eq!(p.z, z);
        }
    }

    #[test]
    fn test_3d_noise_centered_on_lattice(
        x in arb_span(),
        y in arb_span(),
        z in arb_span(),
        nx in 1usize..5,
        ny in 1usize..5,
        nz in 1usize..5,
        noise in 0.0f64..0.5
    ) {
        let mut env = EnvBuilder::new().build();
        let grid = Grid3d { x, y, z, nx, ny, nz, noise_xy_std: noise, noise_z_std: noise };
        let cells = CellFactory::new().create_3d_grid(&mut env, &grid).unwrap();

        prop_assert_eq!(cells.len(), nx * ny * nz);
        // Six deviations covers every realistic draw.
        let tolerance = 6.0 * noise + 1e-9;
        for (cell, base) in cells.iter().zip(grid.base_points()) {
            let p = location(&env, cell);
            prop_assert!((p.x - base.x).abs() <= tolerance);
            prop_assert!((p.y - base.y).abs() <= tolerance);
            prop_assert!((p.z - base.z).abs() <= tolerance);
        }
    }
}

/// Asserts that two positions agree on every axis within `eps`.
#[macro_export]
macro_rules! assert_position_near {
    ($actual:expr, $expected:expr, $eps:expr) => {
        let a = $actual;
        let e = $expected;
        assert!(
            (a.x - e.x).abs() <= $eps && (a.y - e.y).abs() <= $eps && (a.z - e.z).abs() <= $eps,
            "Position {:?} is not within {} of {:?}",
            a,
            $eps,
            e
        );
    };
}

/// Asserts that a cell, its soma and its sphere reference each other.
#[macro_export]
macro_rules! assert_cell_wired {
    ($env:expr, $cell:expr) => {
        let sphere = $env
            .physical_sphere($cell.body)
            .expect("Cell body not registered");
        assert!(sphere.is_wired(), "Sphere {} is not fully wired", sphere.id);
        assert_eq!(sphere.soma, Some($cell.soma.id), "Sphere soma back-reference mismatch");
        assert_eq!($cell.soma.physical, Some(sphere.id), "Soma physical reference mismatch");
        let node = $env
            .space
            .node(sphere.space_node.expect("Sphere has no spatial node"))
            .expect("Spatial node not in index");
        assert_eq!(node.body, sphere.id, "Spatial node routes to another body");
        assert_eq!(Some(node.position), sphere.mass_location, "Node and mass location diverged");
    };
}

/// Asserts the registry holds exactly `$count` spheres.
#[macro_export]
macro_rules! assert_registered {
    ($env:expr, $count:expr) => {
        assert_eq!($env.registry.len(), $count, "Registry size mismatch");
    };
}

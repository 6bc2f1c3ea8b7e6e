use nlib::{
    Octree, OctreeError, brute_force,
    shared::{Body, Bounds, Gravity, PointMass, TreeSettings, Vector},
};
use rand::{Rng, SeedableRng, rngs::StdRng, seq::SliceRandom};

fn body(x: f64, y: f64, z: f64, mass: f64) -> PointMass<f64> {
    PointMass::at_rest(Vector::new(x, y, z), mass)
}

/// Random cloud inside [-1, 1]^3 with masses in [0.5, 1.5).
fn cloud(n: usize, seed: u64) -> Vec<PointMass<f64>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            body(
                rng.random_range(-1.0..1.0),
                rng.random_range(-1.0..1.0),
                rng.random_range(-1.0..1.0),
                rng.random_range(0.5..1.5),
            )
        })
        .collect()
}

fn settings() -> TreeSettings<f64> {
    TreeSettings::default().with_gravity(Gravity::new(1.0, 0.0))
}

fn relative_error(approximate: &Vector<f64>, exact: &Vector<f64>) -> f64 {
    (approximate - exact).norm() / exact.norm()
}

fn sorted_positions<'a>(bodies: impl Iterator<Item = &'a PointMass<f64>>) -> Vec<[f64; 3]> {
    let mut positions: Vec<[f64; 3]> = bodies
        .map(|b| [b.position.x, b.position.y, b.position.z])
        .collect();
    positions.sort_by(|a, b| a.partial_cmp(b).unwrap());
    positions
}

#[test]
fn test_enumeration_has_no_duplicates_or_losses() {
    let bodies = cloud(2_000, 1);
    let tree = Octree::from_bodies(2.0, settings(), bodies.iter().copied());

    assert_eq!(tree.len(), bodies.len());
    assert_eq!(
        sorted_positions(tree.iter().unwrap()),
        sorted_positions(bodies.iter())
    );
}

#[test]
fn test_aggregate_is_independent_of_insertion_order() {
    let mut bodies = cloud(500, 2);
    let total_mass: f64 = bodies.iter().map(|b| b.mass).sum();
    let centroid = bodies
        .iter()
        .fold(Vector::zeros(), |acc, b| acc + b.position * b.mass)
        / total_mass;

    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..4 {
        bodies.shuffle(&mut rng);
        let tree = Octree::from_bodies(2.0, settings(), bodies.iter().copied());
        let aggregate = tree.aggregate().unwrap();

        assert!((aggregate.mass - total_mass).abs() < 1e-9);
        assert!((aggregate.position - centroid).norm() < 1e-9);
    }
}

#[test]
fn test_zero_theta_matches_brute_force() {
    let bodies = cloud(300, 4);
    let probes = cloud(20, 5)
        .into_iter()
        .map(|p| body(p.position.x * 3.0, p.position.y * 3.0, p.position.z * 3.0, 1.0));
    let gravity = Gravity::new(1.0, 0.0);
    let tree = Octree::from_bodies(2.0, settings(), bodies.iter().copied());

    for probe in probes {
        let approximate = tree.force_on_with_theta(&probe, 0.0).unwrap();
        let exact = brute_force::net_force(&bodies, &probe, &gravity);
        assert!(relative_error(&approximate, &exact) < 1e-10);
    }
}

#[test]
fn test_error_shrinks_as_theta_decreases() {
    let bodies = cloud(1_000, 6);
    let probes = cloud(32, 7);
    let gravity = Gravity::new(1.0, 0.0);
    let tree = Octree::from_bodies(2.0, settings(), bodies.iter().copied());

    let mean_error = |theta: f64| {
        probes
            .iter()
            .map(|probe| {
                let approximate = tree.force_on_with_theta(probe, theta).unwrap();
                relative_error(&approximate, &brute_force::net_force(&bodies, probe, &gravity))
            })
            .sum::<f64>()
            / probes.len() as f64
    };

    let coarse = mean_error(1.0);
    let medium = mean_error(0.5);
    let fine = mean_error(0.1);

    assert!(fine < medium, "{fine} >= {medium}");
    assert!(medium < coarse, "{medium} >= {coarse}");
    assert!(fine < 1e-2);
    // a wide opening angle loses accuracy but stays finite
    assert!(mean_error(2.0).is_finite());
}

#[test]
fn test_large_theta_collapses_to_root_aggregate() {
    let bodies = cloud(200, 8);
    let gravity = Gravity::new(1.0, 0.0);
    let tree = Octree::from_bodies(2.0, settings(), bodies.iter().copied());
    let probe = body(0.0, 0.0, 50.0, 1.0);

    let approximate = tree.force_on_with_theta(&probe, 10.0).unwrap();
    let aggregate = tree.aggregate().unwrap();

    assert!((approximate - probe.gravitational_force(aggregate, &gravity)).norm() < 1e-15);
}

#[test]
fn test_two_body_scenario() {
    let gravity = Gravity::new(1.0, 0.0);
    let left = body(-1.0, 0.0, 0.0, 1.0);
    let right = body(1.0, 0.0, 0.0, 1.0);
    let tree = Octree::from_bodies(4.0, settings(), [right, left]);
    let probe = body(0.0, 0.0, 10.0, 1.0);

    let approximate = tree.force_on_with_theta(&probe, 1.0).unwrap();
    let merged = probe.gravitational_force(&body(0.0, 0.0, 0.0, 2.0), &gravity);
    assert!((approximate - merged).norm() < 1e-15);

    let exact = tree.force_on_with_theta(&probe, 0.0).unwrap();
    let pairwise =
        probe.gravitational_force(&left, &gravity) + probe.gravitational_force(&right, &gravity);
    assert!((exact - pairwise).norm() < 1e-15);
}

#[test]
fn test_empty_tree_errors() {
    let tree: Octree<f64, PointMass<f64>> = Octree::with_settings(1.0, settings());

    assert_eq!(
        tree.force_on(&body(0.0, 0.0, 0.0, 1.0)).unwrap_err(),
        OctreeError::EmptyTree
    );
    assert!(tree.iter().is_err());
}

#[test]
fn test_near_coincident_bodies_on_small_stack() {
    let handle = std::thread::Builder::new()
        .stack_size(256 * 1024)
        .spawn(|| {
            let mut tree = Octree::with_settings(4.0, settings());
            tree.insert(body(1.0, 1.0, 1.0, 1.0));
            tree.insert(body(1.0 + 1e-12, 1.0, 1.0, 1.0));
            (tree.len(), tree.depth(), tree.iter().map(|bodies| bodies.count()))
        })
        .unwrap();

    let (len, depth, count) = handle.join().expect("insertion overflowed the stack");

    assert_eq!(len, 2);
    assert_eq!(count, Ok(2));
    assert!(depth.unwrap() <= nlib::shared::DEFAULT_MAX_DEPTH);
}

#[test]
fn test_exactly_coincident_bodies_on_small_stack() {
    let handle = std::thread::Builder::new()
        .stack_size(256 * 1024)
        .spawn(|| {
            let mut tree = Octree::with_settings(4.0, settings().with_max_depth(Some(32)));
            for _ in 0..10 {
                tree.insert(body(-0.3, 0.7, 1.1, 1.0));
            }
            let probe = body(10.0, 0.0, 0.0, 1.0);
            let force = tree.force_on_with_theta(&probe, 0.0).unwrap();
            (tree.depth(), tree.iter().unwrap().count(), force)
        })
        .unwrap();

    let (depth, count, force) = handle.join().expect("insertion overflowed the stack");

    assert_eq!(depth, Some(32));
    assert_eq!(count, 10);
    let expected = body(10.0, 0.0, 0.0, 1.0)
        .gravitational_force(&body(-0.3, 0.7, 1.1, 10.0), &Gravity::new(1.0, 0.0));
    assert!((force - expected).norm() < 1e-12);
}

#[test]
fn test_concurrent_readers_agree() {
    let bodies = cloud(1_000, 9);
    let probes = cloud(64, 10);
    let tree = Octree::from_bodies(2.0, settings(), bodies.iter().copied());

    let sequential: Vec<Vector<f64>> = probes
        .iter()
        .map(|probe| tree.force_on(probe).unwrap())
        .collect();

    std::thread::scope(|scope| {
        let handles: Vec<_> = probes
            .chunks(16)
            .map(|chunk| {
                let tree = &tree;
                scope.spawn(move || {
                    chunk
                        .iter()
                        .map(|probe| tree.force_on(probe).unwrap())
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let parallel: Vec<Vector<f64>> = handles
            .into_iter()
            .flat_map(|handle| handle.join().unwrap())
            .collect();
        assert_eq!(parallel, sequential);
    });
}

#[test]
fn test_fitted_extent_contains_cloud() {
    let bodies: Vec<PointMass<f64>> = cloud(100, 11)
        .into_iter()
        .map(|b| body(b.position.x * 40.0, b.position.y, b.position.z * -7.0, b.mass))
        .collect();
    let bounds = Bounds::enclosing(bodies.iter().map(|b| &b.position));

    let mut tree = Octree::with_settings(bounds.width, settings());
    for b in bodies.iter() {
        assert_eq!(tree.try_insert(*b), Ok(()));
    }
    assert_eq!(tree.len(), 100);
}

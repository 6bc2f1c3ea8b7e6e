use clap::Parser;
use log::info;
use rand::{Rng, SeedableRng, rngs::StdRng};
use rayon::prelude::*;
use web_time::Instant;

use nlib::{
    Octree, OctreeError, brute_force,
    shared::{Bounds, DEFAULT_MAX_DEPTH, Gravity, PointMass, TreeSettings, Vector},
};

/// Builds an octree over a random cloud and compares Barnes-Hut forces on a set of probe bodies
/// with the exact pairwise sum.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Number of bodies inserted into the tree
    #[arg(short, long, default_value_t = 10_000)]
    bodies: usize,

    /// Number of probe bodies the forces are evaluated on
    #[arg(short, long, default_value_t = 256)]
    probes: usize,

    /// Opening angle
    #[arg(short, long, default_value_t = 0.5)]
    theta: f64,

    #[arg(short, long, default_value_t = 42)]
    seed: u64,

    /// Side of the root cube; fitted to the cloud when omitted
    #[arg(long)]
    extent: Option<f64>,

    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Subdivide without a depth limit
    #[arg(long)]
    unbounded_depth: bool,

    #[arg(long, default_value_t = 1.0)]
    g: f64,

    #[arg(long, default_value_t = 0.0)]
    g_soft: f64,
}

fn init_logger() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

fn random_body(rng: &mut impl Rng) -> PointMass<f64> {
    PointMass::at_rest(
        Vector::new(
            rng.random_range(-1.0..1.0),
            rng.random_range(-1.0..1.0),
            rng.random_range(-1.0..1.0),
        ),
        rng.random_range(0.5..1.5),
    )
}

fn main() -> Result<(), OctreeError> {
    init_logger();
    let args = Args::parse();

    let mut rng = StdRng::seed_from_u64(args.seed);
    let bodies: Vec<PointMass<f64>> = (0..args.bodies).map(|_| random_body(&mut rng)).collect();
    let probes: Vec<PointMass<f64>> = (0..args.probes).map(|_| random_body(&mut rng)).collect();

    let extent = args
        .extent
        .unwrap_or_else(|| Bounds::enclosing(bodies.iter().map(|b| &b.position)).width);
    let settings = TreeSettings::default()
        .with_theta(args.theta)
        .with_gravity(Gravity::new(args.g, args.g_soft))
        .with_max_depth((!args.unbounded_depth).then_some(args.max_depth));

    let start = Instant::now();
    let tree = Octree::from_bodies(extent, settings, bodies.iter().copied());
    let build_elapsed = start.elapsed();
    info!(
        "built tree over {} bodies: {} nodes, depth {:?}, root width {extent}",
        tree.len(),
        tree.node_count(),
        tree.depth(),
    );

    let start = Instant::now();
    let approximate = probes
        .par_iter()
        .map(|probe| tree.force_on(probe))
        .collect::<Result<Vec<_>, _>>()?;
    let tree_elapsed = start.elapsed();

    let start = Instant::now();
    let exact: Vec<Vector<f64>> = probes
        .par_iter()
        .map(|probe| brute_force::net_force(&bodies, probe, &settings.gravity))
        .collect();
    let brute_elapsed = start.elapsed();

    let errors: Vec<f64> = approximate
        .iter()
        .zip(exact.iter())
        .map(|(a, e)| (a - e).norm() / e.norm())
        .collect();
    let mean_error = errors.iter().sum::<f64>() / errors.len().max(1) as f64;
    let max_error = errors.iter().copied().fold(0.0, f64::max);

    println!("bodies:          {}", tree.len());
    println!("probes:          {}", probes.len());
    println!("theta:           {}", args.theta);
    println!("build:           {:?}", build_elapsed);
    println!("barnes-hut:      {:?}", tree_elapsed);
    println!("brute force:     {:?}", brute_elapsed);
    println!("mean rel. error: {:.3e}", mean_error);
    println!("max rel. error:  {:.3e}", max_error);

    Ok(())
}

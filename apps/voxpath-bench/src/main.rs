//! Voxpath concurrent search driver
//!
//! Generates an obstacle field, spreads agents around a ring and sends each
//! one to the opposite side of the ring. All searches share one world and one
//! path finder and run in parallel on the rayon pool.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --release -p voxpath-bench -- [OPTIONS]
//! ```
//!
//! ## Environment Variables
//!
//! - `RUST_LOG`: Set log level (e.g., info, debug, trace)

use std::f64::consts::TAU;
use std::time::{Duration, Instant};

use anyhow::{bail, Context};
use rayon::prelude::*;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use voxpath_core::constants::CHUNK_WIDTH;
use voxpath_core::{ChunkCoordinates, GlobalVoxelCoordinates};
use voxpath_nav::{BoundingBox, PathFinder, PathOutcome, SearchConfig};
use voxpath_world::{ObstacleConfig, ObstacleGenerator, VoxelWorld};

/// Columns tried on each side of a blocked ring position.
const PLACEMENT_SLACK: i32 = 4;

#[derive(Debug, Clone)]
struct Options {
    seed: u64,
    agents: usize,
    radius: i32,
    budget: usize,
    density: f64,
    timeout: Option<Duration>,
    tall: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            seed: 42,
            agents: 64,
            radius: 6,
            budget: 200_000,
            density: 0.35,
            timeout: None,
            tall: false,
        }
    }
}

fn main() -> anyhow::Result<()> {
    if std::env::args().any(|arg| arg == "-h" || arg == "--help") {
        print_help();
        return Ok(());
    }

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let options = parse_args(std::env::args().skip(1))?;
    run(&options)
}

fn parse_args(args: impl IntoIterator<Item = String>) -> anyhow::Result<Options> {
    let mut options = Options::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        let mut value = || {
            args.next()
                .with_context(|| format!("missing value for {arg}"))
        };
        match arg.as_str() {
            "--seed" => options.seed = value()?.parse().context("invalid --seed")?,
            "--agents" => options.agents = value()?.parse().context("invalid --agents")?,
            "--radius" => options.radius = value()?.parse().context("invalid --radius")?,
            "--budget" => options.budget = value()?.parse().context("invalid --budget")?,
            "--density" => options.density = value()?.parse().context("invalid --density")?,
            "--timeout-ms" => {
                let millis: u64 = value()?.parse().context("invalid --timeout-ms")?;
                options.timeout = Some(Duration::from_millis(millis));
            }
            "--tall" => options.tall = true,
            other => bail!("unknown argument {other:?} (try --help)"),
        }
    }

    if options.radius < 1 {
        bail!("--radius must be at least 1");
    }
    if !(0.0..=1.0).contains(&options.density) {
        bail!("--density must be within 0..=1");
    }
    Ok(options)
}

fn print_help() {
    eprintln!(
        "Voxpath concurrent path search driver

USAGE:
    cargo run --release -p voxpath-bench -- [OPTIONS]

WORLD OPTIONS:
    --seed <N>              Obstacle field seed (default: 42)
    --radius <N>            Chunk radius of the generated world (default: 6)
    --density <F>           Obstacle density between 0 and 1 (default: 0.35)

SEARCH OPTIONS:
    --agents <N>            Number of concurrent searches (default: 64)
    --budget <N>            Node expansion budget per search (default: 200000)
    --timeout-ms <N>        Wall-clock limit per search (default: none)
    --tall                  Use a 0.6 x 1.8 agent instead of a single voxel

OTHER:
    -h, --help              Print this help message

ENVIRONMENT VARIABLES:
    RUST_LOG                Set log level (e.g., info, debug, trace)"
    );
}

fn run(options: &Options) -> anyhow::Result<()> {
    let generator = ObstacleGenerator::new(ObstacleConfig {
        seed: options.seed,
        // Noise is roughly within [-1, 1]; denser fields need a lower cut-off.
        threshold: 1.0 - 2.0 * options.density,
        ..Default::default()
    });
    let world = VoxelWorld::default();
    let generated = Instant::now();
    generator.populate(&world, ChunkCoordinates::new(0, 0), options.radius);
    info!(
        chunks = world.chunk_count(),
        memory_kib = world.memory_usage() / 1024,
        elapsed = ?generated.elapsed(),
        "world ready"
    );

    let bounds = if options.tall {
        BoundingBox::agent(0.6, 1.8)
    } else {
        BoundingBox::default()
    };
    let mut config = SearchConfig::default().with_max_expansions(options.budget);
    if let Some(timeout) = options.timeout {
        config = config.with_timeout(timeout);
    }
    let finder = PathFinder::new(config);

    let level = generator.walk_level();
    let ring = f64::from(options.radius * CHUNK_WIDTH) * 0.8;
    let agents: Vec<_> = (0..options.agents)
        .filter_map(|i| {
            #[allow(clippy::cast_precision_loss)]
            let angle = TAU * i as f64 / options.agents as f64;
            let start = place(&world, &bounds, ring_point(angle, ring, level))?;
            let goal = place(&world, &bounds, ring_point(angle + TAU / 2.0, ring, level))?;
            Some((i, start, goal))
        })
        .collect();
    if agents.len() < options.agents {
        warn!(
            skipped = options.agents - agents.len(),
            "some agents had no clear start or goal"
        );
    }

    let started = Instant::now();
    let outcomes: Vec<_> = agents
        .par_iter()
        .map(|&(i, start, goal)| {
            finder
                .find_path(&world, &bounds, start, goal)
                .map(|outcome| (i, outcome))
        })
        .collect::<Result<_, _>>()?;
    let elapsed = started.elapsed();

    let mut found = 0;
    let mut expanded = 0;
    let mut cost = 0.0;
    for (i, outcome) in &outcomes {
        match outcome {
            PathOutcome::Found(path) => {
                found += 1;
                expanded += path.nodes_expanded();
                cost += path.cost();
                tracing::debug!(agent = i, waypoints = path.len(), cost = path.cost(), "arrived");
            }
            PathOutcome::NoPathFound(failure) => {
                expanded += failure.nodes_expanded;
                info!(agent = i, %failure, "agent stuck");
            }
        }
    }

    info!(
        agents = outcomes.len(),
        found,
        expanded,
        total_cost = cost,
        ?elapsed,
        "searches complete"
    );
    Ok(())
}

#[allow(clippy::cast_possible_truncation)]
fn ring_point(angle: f64, radius: f64, level: i32) -> GlobalVoxelCoordinates {
    GlobalVoxelCoordinates::new(
        (angle.cos() * radius).round() as i32,
        level,
        (angle.sin() * radius).round() as i32,
    )
}

/// Nearest clear position along X, if any lies within the slack.
fn place(
    world: &VoxelWorld,
    bounds: &BoundingBox,
    pos: GlobalVoxelCoordinates,
) -> Option<GlobalVoxelCoordinates> {
    (0..=PLACEMENT_SLACK)
        .flat_map(|d| [d, -d])
        .map(|d| GlobalVoxelCoordinates::new(pos.x + d, pos.y, pos.z))
        .find(|&candidate| bounds.fits(world, candidate))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn defaults_without_arguments() {
        let options = parse_args(Vec::new()).unwrap();
        assert_eq!(options.seed, 42);
        assert_eq!(options.agents, 64);
        assert!(options.timeout.is_none());
    }

    #[test]
    fn parses_flags() {
        let options = parse_args(args(&[
            "--seed", "7", "--agents", "3", "--radius", "2", "--budget", "500", "--density",
            "0.1", "--timeout-ms", "20", "--tall",
        ]))
        .unwrap();
        assert_eq!(options.seed, 7);
        assert_eq!(options.agents, 3);
        assert_eq!(options.radius, 2);
        assert_eq!(options.budget, 500);
        assert!((options.density - 0.1).abs() < f64::EPSILON);
        assert_eq!(options.timeout, Some(Duration::from_millis(20)));
        assert!(options.tall);
    }

    #[test]
    fn rejects_bad_input() {
        assert!(parse_args(args(&["--seed"])).is_err());
        assert!(parse_args(args(&["--agents", "many"])).is_err());
        assert!(parse_args(args(&["--density", "2"])).is_err());
        assert!(parse_args(args(&["--radius", "0"])).is_err());
        assert!(parse_args(args(&["--frobnicate"])).is_err());
    }

    #[test]
    fn small_run_completes() {
        let options = Options {
            agents: 4,
            radius: 1,
            budget: 10_000,
            ..Default::default()
        };
        assert!(run(&options).is_ok());
    }
}

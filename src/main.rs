/*
 * Boid Flocking Simulation - Headless Runner
 *
 * Seeds a random flock from a parameter set, advances it for a number of
 * ticks and logs how the flock and its quadtree evolve. Parameters come from
 * the built-in defaults, optionally overlaid by a JSON file and then by
 * command-line flags.
 */

use std::fs;
use std::path::PathBuf;
use std::thread;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use quadflock::{Simulation, SimulationParams};

#[derive(Parser, Debug)]
#[command(
    name = "quadflock",
    version,
    about = "Run a quadtree-backed boid flock without a window"
)]
struct Cli {
    /// JSON file with simulation parameters; missing fields keep their defaults.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of boids to seed.
    #[arg(short = 'n', long)]
    boids: Option<usize>,

    /// Number of ticks to run.
    #[arg(short, long)]
    steps: Option<u64>,

    /// Seed for the initial flock.
    #[arg(long)]
    seed: Option<u64>,

    /// Log flock statistics every this many ticks (0 logs only the final tick).
    #[arg(long, default_value_t = 100)]
    report_every: u64,

    /// Sleep for the configured tick interval between ticks.
    #[arg(long)]
    realtime: bool,

    /// Print the resolved parameters as JSON and exit.
    #[arg(long)]
    print_params: bool,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let params = resolve_params(&cli)?;

    if cli.print_params {
        println!("{}", serde_json::to_string_pretty(&params)?);
        return Ok(());
    }

    let seed = params.seed.unwrap_or(0x5EED_B01D_u64);
    let mut rng = StdRng::seed_from_u64(seed);
    let mut simulation =
        Simulation::from_params(&params, &mut rng).context("invalid simulation parameters")?;

    info!(
        boids = params.num_boids,
        steps = params.steps,
        seed,
        capacity = params.capacity,
        search_radius = params.search_radius,
        "Starting flock"
    );

    let started = Instant::now();
    for _ in 0..params.steps {
        simulation.step();

        if cli.report_every > 0 && simulation.tick() % cli.report_every == 0 {
            info!("{}", simulation.stats());
        }
        if cli.realtime {
            thread::sleep(params.tick_interval());
        }
    }

    let elapsed = started.elapsed();
    info!(
        elapsed_ms = elapsed.as_secs_f64() * 1000.0,
        "Finished: {}",
        simulation.stats()
    );
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init();
}

fn resolve_params(cli: &Cli) -> Result<SimulationParams> {
    let mut params = match &cli.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("parsing {}", path.display()))?
        }
        None => SimulationParams::default(),
    };

    if let Some(boids) = cli.boids {
        params.num_boids = boids;
    }
    if let Some(steps) = cli.steps {
        params.steps = steps;
    }
    if cli.seed.is_some() {
        params.seed = cli.seed;
    }

    params.validate()?;
    Ok(params)
}

//! Pull simulator CLI.
//!
//! Run Monte Carlo pulls against a banner to check its rates and pity.
//!
//! Usage:
//!   cargo run --bin simulate -- [OPTIONS]
//!
//! Examples:
//!   cargo run --bin simulate                          # Built-in standard banner
//!   cargo run --bin simulate -- -n 100 -p 500         # 100 players, 500 pulls each
//!   cargo run --bin simulate -- --seed 42             # Reproducible run
//!   cargo run --bin simulate -- --pack mod.json -b summer

use clap::Parser;
use gacha::content::{self, ContentPack};
use gacha::engine::PullEngine;
use gacha::simulator::{run_simulation, SimConfig};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "simulate", about = "Monte Carlo gacha pull simulator")]
struct Cli {
    /// Number of simulated players
    #[arg(short = 'n', long, default_value_t = SimConfig::default().num_players)]
    players: u32,

    /// Pulls per player
    #[arg(short, long, default_value_t = SimConfig::default().pulls_per_player)]
    pulls: u32,

    /// Pulls per batch
    #[arg(long, default_value_t = SimConfig::default().batch_size)]
    batch: u32,

    /// Seed for a reproducible run
    #[arg(short, long, env = "GACHA_SEED")]
    seed: Option<u64>,

    /// Content pack JSON to load instead of the built-in standard pack
    #[arg(long)]
    pack: Option<PathBuf>,

    /// Banner id to simulate
    #[arg(short, long, default_value = "standard")]
    banner: String,

    /// Write the report as JSON to this file
    #[arg(long)]
    json: Option<PathBuf>,

    /// Log each player's summary
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("gacha=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let pack = match &cli.pack {
        Some(path) => ContentPack::from_file(path)?,
        None => content::standard_pack(),
    };
    let loaded = content::load(pack)?;
    let banner = loaded.registry.get(&cli.banner)?;
    let engine = PullEngine::new(&banner, &loaded.catalog)?;

    let config = SimConfig {
        num_players: cli.players,
        pulls_per_player: cli.pulls,
        batch_size: cli.batch,
        seed: cli.seed,
        verbosity: if cli.verbose { 2 } else { 1 },
    };

    println!("Configuration:");
    println!("  Banner:         {} (v{})", banner.id, banner.version);
    println!("  Players:        {}", config.num_players);
    println!("  Pulls/Player:   {}", config.pulls_per_player);
    println!("  Batch Size:     {}", config.batch_size);
    if let Some(seed) = config.seed {
        println!("  Seed:           {}", seed);
    }
    println!();

    let report = run_simulation(&config, &engine)?;
    println!("{}", report.to_text());

    if let Some(path) = &cli.json {
        std::fs::write(path, report.to_json()?)?;
        println!("JSON report saved to: {}", path.display());
    }
    Ok(())
}

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing::info;

use pixelbana_config::{PixelbanaConfig, SourceMode};
use pixelbana_engine::DatapathBuilder;

#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the deterministic datapath simulation
    Simulate(SimulateArgs),
}

#[derive(Args, Debug, Clone)]
pub struct SimulateArgs {
    /// Configuration file; defaults plus PIXELBANA_* variables otherwise
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Seed override for the random pixel source
    #[arg(long)]
    pub seed: Option<u64>,

    /// Fixed frame byte override (switches the source to fixed mode)
    #[arg(long)]
    pub pixel: Option<u8>,

    /// Virtual-time horizon override in nanoseconds
    #[arg(long)]
    pub horizon: Option<u64>,

    /// Expected state hash to validate the run against
    #[arg(long)]
    pub validate_hash: Option<String>,
}

pub fn run_command(cli: Cli) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    match cli.command {
        Commands::Simulate(args) => run_simulation(args),
    }
}

fn run_simulation(args: SimulateArgs) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut config = match &args.config {
        Some(path) => PixelbanaConfig::load_from_path(path)?,
        None => PixelbanaConfig::load()?,
    };
    if let Some(seed) = args.seed {
        config.sim.seed = seed;
    }
    if let Some(pixel) = args.pixel {
        config.sim.pixel = pixel;
        config.sim.source = SourceMode::Fixed;
    }
    if let Some(horizon) = args.horizon {
        config.sim.horizon_ns = horizon;
    }

    let mut runtime = DatapathBuilder::new(config).build()?;
    let report = runtime.run();

    println!("steps:      {}", report.steps);
    println!("final time: {}ns", report.final_time_ns);
    println!("frame byte: {}", report.frame);
    println!("state hash: {}", report.state_hash);

    if let Some(expected) = &args.validate_hash {
        report.validate_hash(expected)?;
        info!("state hash validated");
    }

    Ok(())
}

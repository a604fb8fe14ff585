//! ## pixelbana-cli
//! **Operational interface for the datapath simulator**
//!
//! Loads the hierarchical configuration, wires the datapath once, and runs
//! the deterministic simulation to its virtual-time horizon.

use clap::Parser;

use pixelbana_telemetry::EventLogger;

mod commands;

use commands::Cli;

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    EventLogger::init();
    let cli = Cli::parse();
    commands::run_command(cli)
}

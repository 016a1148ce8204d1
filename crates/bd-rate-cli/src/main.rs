//! bd-rate CLI - BD-rate calculator

use clap::{Parser, Subcommand};

mod commands;

use commands::batch::BatchArgs;
use commands::compute::ComputeArgs;

/// Bjontegaard-Delta rate calculator.
#[derive(Parser)]
#[command(name = "bd-rate")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output (intermediate values on stderr)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the BD-rate of a test curve against an anchor curve
    Compute(ComputeArgs),

    /// Compute BD-rates for every curve in a CSV file against an anchor curve
    Batch(BatchArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Compute(args) => commands::compute::run(args, cli.verbose),
        Commands::Batch(args) => commands::batch::run(args, cli.verbose),
    }
}

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "procyon", about = "Astrophotography post-processing tool")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Adjust contrast of an image with a tone-curve method
    Contrast(commands::contrast::ContrastArgs),
    /// Apply a three-segment piecewise-linear contrast stretch
    Curves(commands::curves::CurvesArgs),
    /// Run the full processing pipeline
    Run(commands::run::RunArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match &cli.command {
        Commands::Contrast(args) => commands::contrast::run(args),
        Commands::Curves(args) => commands::curves::run(args),
        Commands::Run(args) => commands::run::run(args),
    }
}

//! ppi-stratify - Main Entry Point
//!
//! Splits label files into multi-label stratified cross-validation folds.

use clap::Parser;
use ppi_stratify::cli::{cmd_inspect, cmd_split, Cli, Commands};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ppi_stratify=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Split { labels, n_splits, shuffle, seed, delimiter, config, output } => {
            cmd_split(&labels, n_splits, shuffle, seed, delimiter, config.as_deref(), output.as_deref())?;
        }
        Commands::Inspect { labels, delimiter } => {
            cmd_inspect(&labels, delimiter)?;
        }
    }

    Ok(())
}

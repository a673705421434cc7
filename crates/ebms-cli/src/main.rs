//! Operator CLI for the ebMS pull engine
//!
//! Loads an engine configuration, lists its partition channels and simulates
//! pull requests against static producers declared in the same file.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod config;

use commands::{
    build_engine,
    channels::handle_channels,
    pull::{handle_pull, PullArgs},
};
use config::CliConfig;

#[derive(Parser)]
#[command(name = "ebms")]
#[command(about = "ebMS pull engine - channel inspection and pull simulation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file path
    #[arg(short, long, global = true, default_value = "ebms.toml")]
    config: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered and declared partition channels
    Channels,

    /// Simulate one pull request
    Pull(PullArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_writer(std::io::stderr)
        .init();

    let config = CliConfig::load(&cli.config)?;
    let engine = build_engine(&config)?;
    tracing::debug!(
        channels = engine.channels().len(),
        producers = engine.producers().len(),
        "engine ready"
    );

    match cli.command {
        Commands::Channels => handle_channels(engine.channels())?,
        Commands::Pull(args) => handle_pull(&engine, &args).await?,
    }

    Ok(())
}

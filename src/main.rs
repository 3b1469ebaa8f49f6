use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;

use artwork_scout::utils::logging;
use artwork_scout::{BenchmarkApp, Config, ScrapeApp};

/// Scraping and benchmarking harness for the artwork catalog
///
/// Settings come from environment variables, optionally layered on top of a
/// TOML file given with `--config`.
#[derive(Parser)]
#[command(name = "artwork_scout", version, about)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve every image of the images directory and write the artifacts
    Scrape,

    /// Run the ground-truth table against the similarity endpoint
    Benchmark,

    /// Wait until the catalog API reports ready and exit
    WaitReady,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init();

    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Scrape => {
            ScrapeApp::initialize(config).await?.run().await?;
        }
        Commands::Benchmark => {
            BenchmarkApp::initialize(config)?.run().await?;
        }
        Commands::WaitReady => {
            let checks = BenchmarkApp::initialize(config)?.wait_for_catalog().await?;
            info!("catalog ready after {} check(s)", checks);
        }
    }

    Ok(())
}

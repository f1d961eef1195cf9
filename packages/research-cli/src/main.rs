//! Topic research CLI
//!
//! Searches every configured topic, filters and ranks the hits, and writes a
//! `research_data_<timestamp>.json` file that later runs use to skip URLs
//! they have already reported.

mod run;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "research")]
#[command(about = "Search, filter and rank research results per topic")]
pub struct Cli {
    /// Path to the YAML configuration
    #[arg(long, default_value = "config.yaml")]
    pub config: PathBuf,

    /// Skip AI relevance scoring and sort by publication year
    #[arg(long)]
    pub no_ai: bool,

    /// Override the configured output directory
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Delete output files older than this many days (0 keeps everything)
    #[arg(long)]
    pub keep_days: Option<u32>,

    /// Run the pipeline but do not write or delete any files
    #[arg(long)]
    pub dry_run: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "debug,hyper=info,reqwest=info"
    } else {
        "info,research_pipeline=debug"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();

    run::execute(cli).await
}

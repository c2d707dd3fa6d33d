use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use epg_merge::{
    config::Config,
    errors::AppError,
    pipeline::{self, PipelineOutcome},
};

#[derive(Parser)]
#[command(name = "epg-merge")]
#[command(version)]
#[command(about = "Merge multiple XMLTV EPG sources into a single deduplicated guide")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Output file path (overrides config file)
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Default language code for untagged display-name/title/desc elements
    #[arg(long, value_name = "LANG")]
    default_lang: Option<String>,

    /// Per-fetch timeout (e.g. "30s", "2m")
    #[arg(long, value_name = "DURATION")]
    fetch_timeout: Option<String>,

    /// Log level
    #[arg(short = 'v', long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging with specified level
    let log_filter = format!("epg_merge={}", cli.log_level);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting epg-merge v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration from specified file
    let mut config = Config::load_from_file(&cli.config)?;
    info!("Configuration loaded from: {}", cli.config);

    // Override config with CLI arguments
    if let Some(output) = cli.output {
        config.output.path = output;
    }
    if let Some(default_lang) = cli.default_lang {
        config.epg.default_lang = default_lang;
    }
    if let Some(fetch_timeout) = cli.fetch_timeout {
        config.ingestion.fetch_timeout = humantime::parse_duration(&fetch_timeout)
            .map_err(|e| {
                AppError::configuration(format!("Invalid --fetch-timeout '{fetch_timeout}': {e}"))
            })?;
    }

    match pipeline::run(&config).await? {
        PipelineOutcome::Completed {
            channels,
            programmes,
        } => {
            info!(
                "Merge complete: {} channels and {} programmes written",
                channels, programmes
            );
        }
        // Terminal conditions were already logged by the pipeline; the
        // process still exits cleanly, matching the tool's contract
        PipelineOutcome::NoValidSources | PipelineOutcome::WriteFailed => {}
    }

    Ok(())
}

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod config;
mod tui;

#[derive(Parser)]
#[command(name = "sbergate-console")]
#[command(author, version, about = "Terminal admin console for the SberGate smart-home gateway", long_about = None)]
struct Cli {
    /// Gateway base URL (overrides the config file)
    #[arg(short, long, env = "SBERGATE_URL")]
    url: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Write logs to this file instead of stderr
    ///
    /// Useful while the console occupies the terminal's alternate screen.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    match &cli.log_file {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("failed to create log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::sync::Mutex::new(file))
                .with_ansi(false)
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }

    let config = config::Config::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load config, using defaults");
        config::Config::default()
    });

    let url = cli
        .url
        .or(config.url)
        .unwrap_or_else(|| config::DEFAULT_GATEWAY_URL.to_string());

    tui::run(url).await
}

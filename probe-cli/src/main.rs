use anyhow::Result;
use clap::Parser;

mod app;
mod config;
mod console;

use app::ProbeApp;
use config::{CliOverrides, resolve_config};

#[derive(Parser)]
#[command(name = "shiirumax-probe")]
#[command(about = "Runs the ShiiruMax REST API test battery and reports a pass/fail verdict")]
#[command(version)]
struct Cli {
    /// Configuration file path (TOML)
    #[arg(short, long)]
    config: Option<String>,

    /// Base URL of the API under test
    #[arg(short, long)]
    base_url: Option<String>,

    /// Minimum success rate, in percent, for a passing run
    #[arg(short, long)]
    threshold: Option<f64>,

    /// Per-request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    shiirumax_probe::error::logging::init_from_env()
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {}", e))?;

    // Parse command line arguments
    let cli = Cli::parse();
    console::configure_colors();

    let overrides = CliOverrides {
        base_url: cli.base_url,
        threshold: cli.threshold,
        timeout_secs: cli.timeout,
    };
    let config = resolve_config(cli.config.as_deref(), &overrides)?;

    let app = ProbeApp::new(config);
    let code = app.run().await?;

    std::process::exit(code);
}

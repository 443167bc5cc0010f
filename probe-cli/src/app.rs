use anyhow::Result;
use shiirumax_probe::{ProbeConfig, run_with_config};
use tracing::{info, warn};

use crate::console::ConsoleReporter;

pub struct ProbeApp {
    config: ProbeConfig,
}

impl ProbeApp {
    pub fn new(config: ProbeConfig) -> Self {
        Self { config }
    }

    /// Run the battery and return the process exit status
    pub async fn run(&self) -> Result<i32> {
        info!(base_url = %self.config.target.base_url, "Starting battery");

        let (report, _console) = run_with_config(&self.config, ConsoleReporter::stdout()).await?;

        if let Err(err) = report.ensure_completed() {
            warn!(error = %err, "Battery did not complete");
        }

        Ok(report.exit_code())
    }
}

use anyhow::{Context, Result};
use shiirumax_probe::ProbeConfig;

/// Settings given on the command line; each one overrides the file and environment
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub base_url: Option<String>,
    pub threshold: Option<f64>,
    pub timeout_secs: Option<u64>,
}

/// Build the effective configuration.
///
/// Precedence, lowest first: built-in defaults or the config file, then
/// `SHIIRUMAX_BASE_URL`, then command-line flags.
pub fn resolve_config(config_path: Option<&str>, overrides: &CliOverrides) -> Result<ProbeConfig> {
    let mut config = match config_path {
        Some(path) => ProbeConfig::from_file(path)
            .with_context(|| format!("loading configuration from {}", path))?,
        None => ProbeConfig::default(),
    };

    config.apply_env_overrides();

    if let Some(base_url) = &overrides.base_url {
        config.target.base_url = base_url.clone();
    }
    if let Some(threshold) = overrides.threshold {
        config.verdict.pass_threshold_percent = threshold;
    }
    if let Some(timeout) = overrides.timeout_secs {
        config.target.request_timeout_secs = timeout;
    }

    config.validate().context("invalid configuration")?;
    Ok(config)
}

//! Configuration management for the test battery

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use crate::error::ProbeError;

/// Base URL of the hosted preview deployment the battery targets by default
pub const DEFAULT_BASE_URL: &str = "https://bet-admin-manager.preview.emergentagent.com/api";

/// Environment variable that overrides `target.base_url`
pub const BASE_URL_ENV: &str = "SHIIRUMAX_BASE_URL";

/// Main configuration for a battery run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Where the API under test lives
    #[serde(default)]
    pub target: TargetConfig,
    /// Seeded accounts used by the login cases
    #[serde(default)]
    pub accounts: AccountsConfig,
    /// Pass/fail threshold
    #[serde(default)]
    pub verdict: VerdictConfig,
}

/// Connection settings for the API under test
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetConfig {
    /// Base URL; case paths are joined onto it with a single `/`
    pub base_url: String,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Login credentials for one account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: &str, password: &str) -> Self {
        Self {
            email: email.to_string(),
            password: password.to_string(),
        }
    }
}

/// Accounts the backend is expected to be seeded with
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountsConfig {
    pub admin: Credentials,
    pub user: Credentials,
}

impl Default for AccountsConfig {
    fn default() -> Self {
        Self {
            admin: Credentials::new("admin@shiirumax.com", "admin123"),
            user: Credentials::new("player1@test.com", "test123"),
        }
    }
}

/// Verdict settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerdictConfig {
    /// Minimum success rate (percent) for a passing run
    pub pass_threshold_percent: f64,
}

impl Default for VerdictConfig {
    fn default() -> Self {
        Self {
            pass_threshold_percent: 80.0,
        }
    }
}

impl ProbeConfig {
    /// Load configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ProbeError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ProbeError::Configuration {
                message: format!("Failed to read config file: {}", e),
                field: "config_file".to_string(),
            }
        })?;

        let config: ProbeConfig = toml::from_str(&content).map_err(|e| {
            ProbeError::Configuration {
                message: format!("Failed to parse config file: {}", e),
                field: "config_format".to_string(),
            }
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ProbeError> {
        let content = toml::to_string_pretty(self).map_err(|e| {
            ProbeError::Configuration {
                message: format!("Failed to serialize config: {}", e),
                field: "config_serialization".to_string(),
            }
        })?;

        fs::write(path, content).map_err(|e| {
            ProbeError::Configuration {
                message: format!("Failed to write config file: {}", e),
                field: "config_write".to_string(),
            }
        })?;

        Ok(())
    }

    /// Apply overrides from the process environment
    pub fn apply_env_overrides(&mut self) {
        if let Ok(base_url) = env::var(BASE_URL_ENV) {
            if !base_url.trim().is_empty() {
                self.target.base_url = base_url;
            }
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ProbeError> {
        let base_url = self.target.base_url.trim();
        if base_url.is_empty() {
            return Err(ProbeError::Configuration {
                message: "Base URL must not be empty".to_string(),
                field: "target.base_url".to_string(),
            });
        }

        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ProbeError::Configuration {
                message: format!("Base URL must use http or https: {}", base_url),
                field: "target.base_url".to_string(),
            });
        }

        if self.target.request_timeout_secs == 0 {
            return Err(ProbeError::Configuration {
                message: "Request timeout must be greater than 0".to_string(),
                field: "target.request_timeout_secs".to_string(),
            });
        }

        let threshold = self.verdict.pass_threshold_percent;
        if !(0.0..=100.0).contains(&threshold) {
            return Err(ProbeError::Configuration {
                message: format!("Pass threshold must be within 0..=100, got {}", threshold),
                field: "verdict.pass_threshold_percent".to_string(),
            });
        }

        for (field, creds) in [("accounts.admin", &self.accounts.admin), ("accounts.user", &self.accounts.user)] {
            if creds.email.trim().is_empty() || creds.password.is_empty() {
                return Err(ProbeError::Configuration {
                    message: "Account email and password must be set".to_string(),
                    field: field.to_string(),
                });
            }
        }

        Ok(())
    }
}

//! ShiiruMax probe - black-box integration tests for the ShiiruMax betting API
//!
//! The probe drives a fixed, dependency-ordered battery of HTTP checks
//! against a running deployment:
//! - admin and player authentication, gating the rest of the run
//! - authorization boundaries on admin-only endpoints
//! - game, match and bet administration
//! - staking as a player and settlement of the match result
//!
//! Each check compares one response status with its expectation; the run
//! passes when the share of passing checks reaches the configured threshold.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod runner;

// Re-export commonly used types for convenience
pub use error::{ProbeError, ProbeResult, TransportError};

// Re-export client interfaces
pub use client::{ApiRequest, ApiResponse, Method, ReqwestTransport, Transport};

// Re-export runner interfaces
pub use runner::{
    ApiTester, CheckOutcome, ProgressEvent, Reporter, RunReport, Verdict, run_with_config,
};

// Re-export configuration interfaces
pub use config::{AccountsConfig, Credentials, ProbeConfig, TargetConfig, VerdictConfig};

//! Stateful, sequential runner for the API test battery

pub mod cases;
pub mod report;
pub mod session;
pub mod suite;
pub mod tester;

// Re-export runner types
pub use report::{CaseFailure, NullReporter, ProgressEvent, RecordingReporter, Reporter, RunSummary, Section};
pub use session::{BalanceWatch, CreatedResources, ResourceKind, Session, Tally};
pub use suite::{RunReport, Verdict, run_with_config, verdict_for};
pub use tester::{ApiTester, CheckOutcome};

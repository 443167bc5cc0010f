//! Progress events emitted while the battery runs

use std::fmt;
use crate::runner::session::ResourceKind;

/// Groups of cases, in the order the battery runs them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Authentication,
    Authorization,
    AdminFunctionality,
    UserFunctionality,
    BettingSystem,
    FinalVerification,
}

impl Section {
    pub fn title(self) -> &'static str {
        match self {
            Section::Authentication => "AUTHENTICATION TESTS",
            Section::Authorization => "AUTHORIZATION TESTS",
            Section::AdminFunctionality => "ADMIN FUNCTIONALITY TESTS",
            Section::UserFunctionality => "USER FUNCTIONALITY TESTS",
            Section::BettingSystem => "BETTING SYSTEM TESTS",
            Section::FinalVerification => "FINAL VERIFICATION",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Why a case did not pass
#[derive(Debug, Clone, PartialEq)]
pub enum CaseFailure {
    /// The service answered with a different status
    StatusMismatch {
        expected: u16,
        actual: u16,
        body: String,
    },
    /// No response was obtained
    Transport { message: String },
    /// A prerequisite id was never created; no request was issued
    MissingDependency { kind: ResourceKind },
    /// The status matched but the case's own condition did not hold
    Unmet { reason: String },
}

impl fmt::Display for CaseFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaseFailure::StatusMismatch { expected, actual, .. } => {
                write!(f, "Expected {}, got {}", expected, actual)
            }
            CaseFailure::Transport { message } => write!(f, "Error: {}", message),
            CaseFailure::MissingDependency { kind } => write!(f, "No {} available", kind),
            CaseFailure::Unmet { reason } => f.write_str(reason),
        }
    }
}

/// Final tally handed to reporters once the battery completes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    pub attempted: u32,
    pub passed: u32,
    pub success_rate: f64,
    pub threshold: f64,
    pub succeeded: bool,
}

/// Everything a reporter may be told during a run
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    RunStarted { base_url: String },
    SectionStarted(Section),
    CaseStarted { name: String },
    CasePassed { name: String, status: u16 },
    CaseFailed { name: String, failure: CaseFailure },
    /// Informational line about what a case observed
    Detail { line: String },
    /// A gating case failed; nothing else will run
    Aborted { case: String },
    Finished(RunSummary),
}

/// Sink for progress events
pub trait Reporter: Send {
    fn report(&mut self, event: &ProgressEvent);
}

/// Reporter that drops everything
#[derive(Debug, Default)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn report(&mut self, _event: &ProgressEvent) {}
}

/// Reporter that keeps every event, in order
#[derive(Debug, Default, Clone)]
pub struct RecordingReporter {
    pub events: Vec<ProgressEvent>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Names of cases that were started, in order
    pub fn started_cases(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|event| match event {
                ProgressEvent::CaseStarted { name } => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }

    /// The failure recorded for `case`, if any
    pub fn failure_of(&self, case: &str) -> Option<&CaseFailure> {
        self.events.iter().find_map(|event| match event {
            ProgressEvent::CaseFailed { name, failure } if name == case => Some(failure),
            _ => None,
        })
    }

    pub fn details(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|event| match event {
                ProgressEvent::Detail { line } => Some(line.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Reporter for RecordingReporter {
    fn report(&mut self, event: &ProgressEvent) {
        self.events.push(event.clone());
    }
}

//! The check primitive every case is built on

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};
use crate::api::to_body;
use crate::client::{ApiRequest, Transport, empty_payload};
use super::report::{CaseFailure, ProgressEvent, Reporter};
use super::session::{ResourceKind, Session};

/// Result of a single check
#[derive(Debug, Clone, PartialEq)]
pub struct CheckOutcome {
    /// Received status matched the expectation
    pub passed: bool,
    /// Parsed JSON body on success, empty object otherwise
    pub payload: Value,
}

impl CheckOutcome {
    fn failed() -> Self {
        Self {
            passed: false,
            payload: empty_payload(),
        }
    }
}

/// Stateful runner that issues checks against the API under test
pub struct ApiTester<T: Transport, R: Reporter> {
    transport: T,
    reporter: R,
    session: Session,
}

impl<T: Transport, R: Reporter> ApiTester<T, R> {
    pub fn new(base_url: impl Into<String>, transport: T, reporter: R) -> Self {
        Self {
            transport,
            reporter,
            session: Session::new(base_url),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub(crate) fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Give back the reporter, dropping the rest of the runner
    pub fn into_reporter(self) -> R {
        self.reporter
    }

    pub(crate) fn emit(&mut self, event: ProgressEvent) {
        self.reporter.report(&event);
    }

    pub(crate) fn detail(&mut self, line: impl Into<String>) {
        self.emit(ProgressEvent::Detail { line: line.into() });
    }

    /// Issue `request` and compare the status with `expected_status`.
    ///
    /// Counts one attempt; counts a pass only on a status match. Transport
    /// faults are reported as failures and never propagated.
    pub async fn run_check(&mut self, name: &str, request: ApiRequest, expected_status: u16) -> CheckOutcome {
        self.emit(ProgressEvent::CaseStarted { name: name.to_string() });

        let result = self.transport.send(&self.session.base_url, &request).await;

        let response = match result {
            Ok(response) => response,
            Err(err) => {
                warn!(case = name, method = %request.method, path = %request.path, error = %err, "Request did not complete");
                self.session.tally.record(false);
                self.emit(ProgressEvent::CaseFailed {
                    name: name.to_string(),
                    failure: CaseFailure::Transport { message: err.to_string() },
                });
                return CheckOutcome::failed();
            }
        };

        debug!(
            case = name,
            method = %request.method,
            path = %request.path,
            expected = expected_status,
            actual = response.status,
            "Check completed"
        );

        if response.status == expected_status {
            self.session.tally.record(true);
            self.emit(ProgressEvent::CasePassed {
                name: name.to_string(),
                status: response.status,
            });
            CheckOutcome {
                passed: true,
                payload: response.json_or_empty(),
            }
        } else {
            self.session.tally.record(false);
            self.emit(ProgressEvent::CaseFailed {
                name: name.to_string(),
                failure: CaseFailure::StatusMismatch {
                    expected: expected_status,
                    actual: response.status,
                    body: response.diagnostic_body(),
                },
            });
            CheckOutcome::failed()
        }
    }

    /// Like [`run_check`](Self::run_check), with `body` encoded as the JSON payload
    pub async fn run_json_check<B: Serialize>(
        &mut self,
        name: &str,
        request: ApiRequest,
        body: &B,
        expected_status: u16,
    ) -> CheckOutcome {
        match to_body(body) {
            Ok(value) => self.run_check(name, request.with_body(value), expected_status).await,
            Err(err) => {
                self.emit(ProgressEvent::CaseStarted { name: name.to_string() });
                self.session.tally.record(false);
                self.fail_unmet(name, format!("Could not encode request body: {}", err));
                CheckOutcome::failed()
            }
        }
    }

    /// Fail `name` without a request because no `kind` id exists yet.
    ///
    /// Counts as an attempted, failed check.
    pub(crate) fn fail_missing_dependency(&mut self, name: &str, kind: ResourceKind) -> bool {
        debug!(case = name, dependency = %kind, "Skipping request, dependency missing");
        self.session.tally.record(false);
        self.emit(ProgressEvent::CaseFailed {
            name: name.to_string(),
            failure: CaseFailure::MissingDependency { kind },
        });
        false
    }

    /// Report that a case whose status matched still did not hold
    pub(crate) fn fail_unmet(&mut self, name: &str, reason: impl Into<String>) -> bool {
        self.emit(ProgressEvent::CaseFailed {
            name: name.to_string(),
            failure: CaseFailure::Unmet { reason: reason.into() },
        });
        false
    }
}

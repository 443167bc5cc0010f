//! Sequential driver for the whole battery

use std::time::Duration;
use tracing::{debug, info, Instrument};
use uuid::Uuid;
use crate::client::{ReqwestTransport, Transport};
use crate::config::{AccountsConfig, ProbeConfig};
use crate::error::{ProbeError, ProbeResult};
use super::cases::{ADMIN_LOGIN, USER_LOGIN};
use super::report::{ProgressEvent, Reporter, RunSummary, Section};
use super::session::{ResourceKind, Tally};
use super::tester::ApiTester;

/// Outcome of a complete run
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    /// Success rate reached the threshold
    Passed,
    /// Success rate fell short of the threshold
    Failed,
    /// A gating login case failed and the run stopped there
    Aborted { case: String },
}

/// What a run produced
#[derive(Debug, Clone)]
pub struct RunReport {
    pub tally: Tally,
    pub threshold: f64,
    pub verdict: Verdict,
}

impl RunReport {
    pub fn success_rate(&self) -> f64 {
        self.tally.success_rate()
    }

    /// Process exit status: 0 only for a passing verdict
    pub fn exit_code(&self) -> i32 {
        match self.verdict {
            Verdict::Passed => 0,
            Verdict::Failed | Verdict::Aborted { .. } => 1,
        }
    }

    /// `Err(ProbeError::Aborted)` when a gating case stopped the run
    pub fn ensure_completed(&self) -> ProbeResult<()> {
        match &self.verdict {
            Verdict::Aborted { case } => Err(ProbeError::Aborted { case: case.clone() }),
            Verdict::Passed | Verdict::Failed => Ok(()),
        }
    }
}

/// Whether `tally` meets `threshold` percent
pub fn verdict_for(tally: &Tally, threshold: f64) -> Verdict {
    if tally.success_rate() >= threshold {
        Verdict::Passed
    } else {
        Verdict::Failed
    }
}

impl<T: Transport, R: Reporter> ApiTester<T, R> {
    /// Run every case in dependency order and compute the verdict.
    ///
    /// A failed admin or user login stops the run immediately; every other
    /// failure is recorded and the run continues.
    pub async fn run_battery(&mut self, accounts: &AccountsConfig, threshold: f64) -> RunReport {
        let span = tracing::info_span!(
            "battery",
            run_id = %Uuid::new_v4(),
            base_url = %self.session().base_url,
        );
        self.run_sections(accounts, threshold).instrument(span).await
    }

    async fn run_sections(&mut self, accounts: &AccountsConfig, threshold: f64) -> RunReport {
        let base_url = self.session().base_url.clone();
        self.emit(ProgressEvent::RunStarted { base_url });

        self.emit(ProgressEvent::SectionStarted(Section::Authentication));
        if !self.test_admin_login(&accounts.admin).await {
            return self.abort(ADMIN_LOGIN, threshold);
        }
        if !self.test_user_login(&accounts.user).await {
            return self.abort(USER_LOGIN, threshold);
        }
        self.test_user_registration().await;

        self.emit(ProgressEvent::SectionStarted(Section::Authorization));
        self.test_unauthorized_access().await;
        self.test_user_access_to_admin().await;

        self.emit(ProgressEvent::SectionStarted(Section::AdminFunctionality));
        self.test_admin_stats().await;
        self.test_create_game().await;
        self.test_get_games().await;
        self.test_create_match().await;
        self.test_get_matches().await;
        self.test_create_bet().await;
        self.test_update_bet_odds().await;
        self.test_admin_users().await;

        self.emit(ProgressEvent::SectionStarted(Section::UserFunctionality));
        self.test_user_profile().await;
        self.test_get_bets().await;
        self.test_place_bet().await;
        self.test_user_bet_history().await;

        self.emit(ProgressEvent::SectionStarted(Section::BettingSystem));
        self.test_set_match_result().await;

        self.emit(ProgressEvent::SectionStarted(Section::FinalVerification));
        self.test_settled_balance().await;

        let tally = self.session().tally;
        let verdict = verdict_for(&tally, threshold);
        info!(
            attempted = tally.attempted(),
            passed = tally.passed(),
            failed = tally.failed(),
            success_rate = tally.success_rate(),
            verdict = ?verdict,
            "Battery finished"
        );
        for kind in ResourceKind::ALL {
            debug!(kind = %kind, count = self.session().resources.count(kind), "Resources created");
        }

        self.emit(ProgressEvent::Finished(RunSummary {
            attempted: tally.attempted(),
            passed: tally.passed(),
            success_rate: tally.success_rate(),
            threshold,
            succeeded: verdict == Verdict::Passed,
        }));

        RunReport { tally, threshold, verdict }
    }

    fn abort(&mut self, case: &str, threshold: f64) -> RunReport {
        tracing::error!(case, "Gating case failed, stopping battery");
        self.emit(ProgressEvent::Aborted { case: case.to_string() });
        RunReport {
            tally: self.session().tally,
            threshold,
            verdict: Verdict::Aborted { case: case.to_string() },
        }
    }
}

/// Build a reqwest-backed runner from `config` and run the battery
pub async fn run_with_config<R: Reporter>(config: &ProbeConfig, reporter: R) -> ProbeResult<(RunReport, R)> {
    config.validate()?;

    let transport = ReqwestTransport::new(Duration::from_secs(config.target.request_timeout_secs))
        .map_err(|e| e.during("building HTTP client"))?;
    let mut tester = ApiTester::new(config.target.base_url.clone(), transport, reporter);
    let report = tester
        .run_battery(&config.accounts, config.verdict.pass_threshold_percent)
        .await;

    Ok((report, tester.into_reporter()))
}

use std::env;
use std::io::{self, IsTerminal, Write};
use colored::*;
use shiirumax_probe::runner::{CaseFailure, ProgressEvent, Reporter, RunSummary, Section};

const RULE_WIDTH: usize = 60;
const SECTION_RULE_WIDTH: usize = 30;

/// Whether ANSI colors should be written.
///
/// `CLICOLOR_FORCE` wins, then `NO_COLOR`; otherwise only a terminal gets colors.
fn color_enabled(is_terminal: bool, no_color: bool, force: bool) -> bool {
    force || (!no_color && is_terminal)
}

/// Turn colors off when stdout is piped or redirected
pub fn configure_colors() {
    let force = env::var("CLICOLOR_FORCE").map_or(false, |v| v != "0");
    let no_color = env::var_os("NO_COLOR").is_some();
    colored::control::set_override(color_enabled(io::stdout().is_terminal(), no_color, force));
}

/// Human-readable progress log
pub struct ConsoleReporter<W: Write + Send> {
    out: W,
}

impl ConsoleReporter<io::Stdout> {
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write + Send> ConsoleReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: impl std::fmt::Display) {
        // A closed stdout must not take the battery down with it.
        let _ = writeln!(self.out, "{}", text);
    }

    fn section_icon(section: Section) -> &'static str {
        match section {
            Section::Authentication => "📋",
            Section::Authorization => "🔒",
            Section::AdminFunctionality => "👑",
            Section::UserFunctionality => "👤",
            Section::BettingSystem => "🎯",
            Section::FinalVerification => "🏁",
        }
    }

    fn failure(&mut self, name: &str, failure: &CaseFailure) {
        match failure {
            CaseFailure::StatusMismatch { body, .. } => {
                self.line(format!("❌ Failed - {}", failure).red());
                self.line(format!("   Response: {}", body));
            }
            CaseFailure::MissingDependency { kind } => {
                self.line(format!("\n❌ No {} available for {}", kind, name).red());
            }
            CaseFailure::Transport { .. } | CaseFailure::Unmet { .. } => {
                self.line(format!("❌ Failed - {}", failure).red());
            }
        }
    }

    fn summary(&mut self, summary: &RunSummary) {
        self.line(format!("\n{}", "=".repeat(RULE_WIDTH)));
        self.line("📊 FINAL RESULTS".bold());
        self.line(format!("Tests passed: {}/{}", summary.passed, summary.attempted));
        self.line(format!(
            "Success rate: {:.1}% (threshold {:.1}%)",
            summary.success_rate, summary.threshold
        ));

        if summary.succeeded {
            self.line("✅ Backend API testing PASSED".green().bold());
        } else {
            self.line("❌ Backend API testing FAILED".red().bold());
        }
    }
}

impl<W: Write + Send> Reporter for ConsoleReporter<W> {
    fn report(&mut self, event: &ProgressEvent) {
        match event {
            ProgressEvent::RunStarted { base_url } => {
                self.line("🚀 Starting ShiiruMax API Testing...".bright_blue().bold());
                self.line(format!("Target: {}", base_url).dimmed());
                self.line("=".repeat(RULE_WIDTH));
            }
            ProgressEvent::SectionStarted(section) => {
                self.line(format!("\n{} {}", Self::section_icon(*section), section).cyan().bold());
                self.line("-".repeat(SECTION_RULE_WIDTH));
            }
            ProgressEvent::CaseStarted { name } => {
                self.line(format!("\n🔍 Testing {}...", name));
            }
            ProgressEvent::CasePassed { status, .. } => {
                self.line(format!("✅ Passed - Status: {}", status).green());
            }
            ProgressEvent::CaseFailed { name, failure } => self.failure(name, failure),
            ProgressEvent::Detail { line } => {
                self.line(format!("   {}", line));
            }
            ProgressEvent::Aborted { case } => {
                self.line(format!("❌ {} failed, stopping tests", case).red().bold());
            }
            ProgressEvent::Finished(summary) => self.summary(summary),
        }
        let _ = self.out.flush();
    }
}

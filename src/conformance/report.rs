use crate::conformance::{Suite, TestResult};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};
use ulid::Ulid;

pub const SEPARATOR: &str = "============================================================";

/// Pass/fail tally of one run, counted per check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub passed: usize,
    pub failed: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RunSummary {
    #[must_use]
    pub fn start() -> Self {
        let now = Utc::now();
        Self {
            passed: 0,
            failed: 0,
            started_at: now,
            finished_at: now,
        }
    }

    pub fn record(&mut self, passed: bool) {
        if passed {
            self.passed += 1;
        } else {
            self.failed += 1;
        }
    }

    pub fn finish(&mut self) {
        self.finished_at = Utc::now();
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.passed + self.failed
    }

    /// Percentage of passed checks; `0.0` when nothing ran.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn success_rate(&self) -> f64 {
        if self.total() == 0 {
            return 0.0;
        }
        self.passed as f64 / self.total() as f64 * 100.0
    }

    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }

    /// Process exit status: `0` when every check passed, `1` otherwise.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        u8::from(!self.all_passed())
    }

    #[must_use]
    pub fn render(&self) -> String {
        let verdict = if self.all_passed() {
            "All checks passed!"
        } else {
            "Some checks failed. Check details above."
        };

        format!(
            "{SEPARATOR}\nSUMMARY\nPassed: {}\nFailed: {}\nSuccess Rate: {:.1}%\n{verdict}",
            self.passed,
            self.failed,
            self.success_rate()
        )
    }
}

/// Machine-readable record of a run, written with `--report`.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub run_id: Ulid,
    pub tool: &'static str,
    pub base_url: &'a str,
    pub suite: Suite,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub passed: usize,
    pub failed: usize,
    pub success_rate: f64,
    pub results: &'a [TestResult],
}

impl<'a> Report<'a> {
    #[must_use]
    pub fn new(
        base_url: &'a str,
        suite: Suite,
        summary: &RunSummary,
        results: &'a [TestResult],
    ) -> Self {
        Self {
            run_id: Ulid::new(),
            tool: crate::APP_USER_AGENT,
            base_url,
            suite,
            started_at: summary.started_at,
            finished_at: summary.finished_at,
            passed: summary.passed,
            failed: summary.failed,
            success_rate: (summary.success_rate() * 10.0).round() / 10.0,
            results,
        }
    }

    /// # Errors
    /// Returns an error if the file cannot be created or written.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        let file = File::create(path)
            .with_context(|| format!("failed to create report {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)
            .with_context(|| format!("failed to write report {}", path.display()))?;
        writer.flush()?;
        Ok(())
    }
}

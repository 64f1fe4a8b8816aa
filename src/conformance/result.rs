//! Per-check outcomes and the append-only log that collects them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io::{self, Write};
use tracing::{debug, warn};

/// Outcome of a single assertion made by a check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    pub name: String,
    pub success: bool,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl TestResult {
    #[must_use]
    pub fn new(name: &str, success: bool, message: impl Into<String>, details: Option<Value>) -> Self {
        Self {
            name: name.to_string(),
            success,
            message: message.into(),
            timestamp: Utc::now(),
            details,
        }
    }

    /// Human-readable line(s) for this result, without a trailing newline.
    #[must_use]
    pub fn render(&self) -> String {
        let status = if self.success { "PASS" } else { "FAIL" };
        let mut line = format!("{status} {}: {}", self.name, self.message);

        if !self.success {
            if let Some(details) = &self.details {
                line.push_str(&format!("\n   Details: {details}"));
            }
        }

        line
    }
}

/// Ordered results of one run. Entries are only ever appended.
///
/// Every recorded result is echoed to the sink as soon as it is appended, so
/// progress is visible while slow checks are still running.
pub struct ResultsLog {
    results: Vec<TestResult>,
    sink: Box<dyn Write + Send>,
}

impl ResultsLog {
    #[must_use]
    pub fn new(sink: Box<dyn Write + Send>) -> Self {
        Self {
            results: Vec::new(),
            sink,
        }
    }

    #[must_use]
    pub fn stdout() -> Self {
        Self::new(Box::new(io::stdout()))
    }

    /// A log that keeps results but prints nothing.
    #[must_use]
    pub fn silent() -> Self {
        Self::new(Box::new(io::sink()))
    }

    pub fn record(
        &mut self,
        name: &str,
        success: bool,
        message: impl Into<String>,
        details: Option<Value>,
    ) -> bool {
        let result = TestResult::new(name, success, message, details);
        debug!(check = name, success, "recorded result");
        self.emit(&result.render());
        self.results.push(result);
        success
    }

    pub fn pass(&mut self, name: &str, message: impl Into<String>, details: Option<Value>) -> bool {
        self.record(name, true, message, details)
    }

    pub fn fail(&mut self, name: &str, message: impl Into<String>, details: Option<Value>) -> bool {
        self.record(name, false, message, details)
    }

    /// Write a free-form line to the sink without recording a result.
    pub fn emit(&mut self, line: &str) {
        if let Err(e) = writeln!(self.sink, "{line}") {
            warn!("failed to write result line: {e}");
        }
    }

    #[must_use]
    pub fn results(&self) -> &[TestResult] {
        &self.results
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    #[must_use]
    pub fn into_results(self) -> Vec<TestResult> {
        self.results
    }
}

impl std::fmt::Debug for ResultsLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultsLog")
            .field("results", &self.results)
            .finish_non_exhaustive()
    }
}

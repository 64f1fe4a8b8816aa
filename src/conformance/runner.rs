use crate::conformance::{report::SEPARATOR, ApiClient, Check, ResultsLog, RunContext, RunSummary};
use tracing::{info, info_span, warn, Instrument};

/// Drives an ordered list of checks against one service and tallies the outcome.
///
/// A check that errors is recorded as a failure under its own name and the run
/// moves on; nothing a check does can end the run early.
#[derive(Debug)]
pub struct Runner {
    client: ApiClient,
    ctx: RunContext,
    log: ResultsLog,
}

impl Runner {
    #[must_use]
    pub fn new(client: ApiClient, ctx: RunContext, log: ResultsLog) -> Self {
        Self { client, ctx, log }
    }

    pub async fn run(&mut self, checks: &[Check]) -> RunSummary {
        let mut summary = RunSummary::start();

        self.log.emit(&format!(
            "Starting {} conformance checks",
            self.ctx.product
        ));
        self.log
            .emit(&format!("Base URL: {}", self.client.base_url()));
        self.log.emit(SEPARATOR);

        for &check in checks {
            let passed = self.run_one(check).await;
            summary.record(passed);
            self.log.emit("");
        }

        summary.finish();
        self.log.emit(&summary.render());

        info!(
            passed = summary.passed,
            failed = summary.failed,
            "conformance run complete"
        );

        summary
    }

    async fn run_one(&mut self, check: Check) -> bool {
        let span = info_span!("check", name = check.name());
        let recorded = self.log.len();

        let outcome = check
            .run(&self.client, &mut self.ctx, &mut self.log)
            .instrument(span)
            .await;

        match outcome {
            Ok(passed) if self.log.len() > recorded => passed,
            Ok(passed) => {
                let message = if passed { "Check passed" } else { "Check failed" };
                self.log.record(check.name(), passed, message, None)
            }
            Err(e) => {
                warn!(check = check.name(), "check aborted: {e}");
                self.log
                    .fail(check.name(), format!("Request failed: {e}"), None)
            }
        }
    }

    #[must_use]
    pub fn log(&self) -> &ResultsLog {
        &self.log
    }

    #[must_use]
    pub fn context(&self) -> &RunContext {
        &self.ctx
    }

    #[must_use]
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    #[must_use]
    pub fn into_log(self) -> ResultsLog {
        self.log
    }
}

pub mod check;

// Internal "interpreter" for `Action`.
mod run;

#[derive(Debug)]
pub enum Action {
    Check(check::Args),
}

impl Action {
    /// Execute the action and return the process exit status.
    /// # Errors
    /// Returns an error if the action cannot be started or its output cannot be written.
    pub async fn execute(self) -> anyhow::Result<std::process::ExitCode> {
        run::execute(self).await
    }
}

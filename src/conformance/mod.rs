//! Conformance checks for the Wallet2FA HTTP API.

pub mod checks;
pub mod client;
pub mod context;
pub mod contract;
pub mod report;
pub mod result;
pub mod runner;
pub mod suite;

pub use self::checks::Check;
pub use self::client::{ApiClient, ApiResponse, CheckError};
pub use self::context::RunContext;
pub use self::report::{Report, RunSummary};
pub use self::result::{ResultsLog, TestResult};
pub use self::runner::Runner;
pub use self::suite::Suite;

//! The individual conformance checks.
//!
//! Each check module exposes `run(client, ctx, log)`. A check records its own
//! results in the log and returns whether it passed; errors it returns are
//! recorded by the runner instead.

pub mod burst;
pub mod cors;
pub mod discovery;
pub mod health;
pub mod liveness;
pub mod nonce;
pub mod profile;
pub mod routing;
pub mod verify;

use crate::conformance::{ApiClient, CheckError, ResultsLog, RunContext};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Check {
    Health,
    Discovery,
    NonceIssuance,
    VerifyValidation,
    VerifySignatureRejection,
    ProfileAuthorization,
    PersistenceLiveness,
    CorsHeaders,
    CorsPreflight,
    NegativeRouting,
    BurstLiveness,
    NonceUniqueness,
    ProofFailurePath,
}

impl Check {
    /// Name used for results recorded on the check's behalf.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Check::Health => health::NAME,
            Check::Discovery => discovery::NAME,
            Check::NonceIssuance => nonce::NAME,
            Check::VerifyValidation => verify::VALIDATION_NAME,
            Check::VerifySignatureRejection => verify::SIGNATURE_NAME,
            Check::ProfileAuthorization => profile::NAME,
            Check::PersistenceLiveness => liveness::NAME,
            Check::CorsHeaders => cors::HEADERS_NAME,
            Check::CorsPreflight => cors::PREFLIGHT_NAME,
            Check::NegativeRouting => routing::NAME,
            Check::BurstLiveness => burst::NAME,
            Check::NonceUniqueness => nonce::UNIQUENESS_NAME,
            Check::ProofFailurePath => verify::PROOF_NAME,
        }
    }

    /// # Errors
    /// Returns an error if a request fails at the transport level or a body
    /// that must be JSON cannot be parsed.
    pub async fn run(
        self,
        client: &ApiClient,
        ctx: &mut RunContext,
        log: &mut ResultsLog,
    ) -> Result<bool, CheckError> {
        match self {
            Check::Health => health::run(client, ctx, log).await,
            Check::Discovery => discovery::run(client, log).await,
            Check::NonceIssuance => nonce::run(client, ctx, log).await,
            Check::VerifyValidation => verify::run_validation(client, ctx, log).await,
            Check::VerifySignatureRejection => verify::run_signature(client, ctx, log).await,
            Check::ProfileAuthorization => profile::run(client, log).await,
            Check::PersistenceLiveness => liveness::run(client, ctx, log).await,
            Check::CorsHeaders => cors::run_headers(client, log).await,
            Check::CorsPreflight => cors::run_preflight(client, log).await,
            Check::NegativeRouting => routing::run(client, log).await,
            Check::BurstLiveness => burst::run(client, log).await,
            Check::NonceUniqueness => nonce::run_uniqueness(client, ctx, log).await,
            Check::ProofFailurePath => verify::run_proof_path(client, ctx, log).await,
        }
    }
}

impl std::fmt::Display for Check {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

use crate::conformance::Check;
use serde::Serialize;
use std::{fmt, str::FromStr};

/// Named, ordered selections of checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Suite {
    /// Route contracts: health, discovery, auth flow, profile, CORS.
    Backend,
    /// Storage-facing behaviour: nonce uniqueness, proof path, routing, load.
    Integration,
    #[default]
    All,
}

pub const SUITE_NAMES: [&str; 3] = ["backend", "integration", "all"];

impl Suite {
    #[must_use]
    pub fn checks(self) -> Vec<Check> {
        match self {
            Suite::Backend => vec![
                Check::Health,
                Check::Discovery,
                Check::NonceIssuance,
                Check::VerifyValidation,
                Check::VerifySignatureRejection,
                Check::ProfileAuthorization,
                Check::PersistenceLiveness,
                Check::CorsHeaders,
                Check::CorsPreflight,
            ],
            Suite::Integration => vec![
                Check::NonceUniqueness,
                Check::ProofFailurePath,
                Check::NegativeRouting,
                Check::CorsPreflight,
                Check::BurstLiveness,
            ],
            Suite::All => vec![
                Check::Health,
                Check::Discovery,
                Check::NonceIssuance,
                Check::VerifyValidation,
                Check::VerifySignatureRejection,
                Check::ProfileAuthorization,
                Check::PersistenceLiveness,
                Check::CorsHeaders,
                Check::CorsPreflight,
                Check::NegativeRouting,
                Check::BurstLiveness,
                Check::NonceUniqueness,
                Check::ProofFailurePath,
            ],
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Suite::Backend => "backend",
            Suite::Integration => "integration",
            Suite::All => "all",
        }
    }
}

impl FromStr for Suite {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "backend" => Ok(Suite::Backend),
            "integration" => Ok(Suite::Integration),
            "all" => Ok(Suite::All),
            other => Err(format!("unknown suite: {other}")),
        }
    }
}

impl fmt::Display for Suite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

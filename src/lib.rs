//! # Wallet2FA conformance runner
//!
//! `wallet2fa-conformance` exercises a deployed Wallet2FA authentication API
//! (SIWE nonce issuance, signature verification, JWT-protected profile access)
//! strictly over HTTP and reports whether every route honours its contract.
//!
//! ## Run model
//!
//! Checks run one after another against a single base URL. Each check appends
//! one or more [`conformance::TestResult`]s to the run's
//! [`conformance::ResultsLog`]; transport or decode errors are converted into
//! failing results by the [`conformance::Runner`], so a broken endpoint never
//! aborts the run. The process exits with `0` only when every check passed.
//!
//! ## Cross-check state
//!
//! The nonce captured by the issuance check is carried in an explicit
//! [`conformance::RunContext`] and reused by the signature rejection check.

pub mod cli;
pub mod conformance;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
        assert!(
            GIT_COMMIT_HASH.len() >= 7,
            "GIT_COMMIT_HASH should be at least 7 characters long, got: {GIT_COMMIT_HASH}"
        );
    }

    #[test]
    fn test_app_user_agent_format() {
        assert!(APP_USER_AGENT.starts_with(env!("CARGO_PKG_NAME")));
        assert!(APP_USER_AGENT.contains(env!("CARGO_PKG_VERSION")));
    }
}

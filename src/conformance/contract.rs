//! Static contract of the Wallet2FA HTTP API.
//!
//! Routes are relative to the configured base URL, which already carries the
//! `/api` prefix. The documented endpoint list, on the other hand, is compared
//! verbatim against what the discovery route advertises and therefore keeps it.

use chrono::{SecondsFormat, Utc};
use regex::Regex;

pub const HEALTH: &str = "/health";
pub const ROOT: &str = "/";
pub const NONCE: &str = "/auth/nonce";
pub const VERIFY: &str = "/auth/verify";
pub const PROFILE: &str = "/user/profile";

pub const DEFAULT_PRODUCT: &str = "Wallet2FA";
pub const DEFAULT_ADDRESS: &str = "0x742d35Cc6634C0532925a3b844Bc9e7595f0bEb";
pub const DEFAULT_SECONDARY_ADDRESS: &str = "0x1234567890123456789012345678901234567890";

/// Route signatures the discovery endpoint must advertise.
pub const DOCUMENTED_ENDPOINTS: [&str; 4] = [
    "POST /api/auth/nonce",
    "POST /api/auth/verify",
    "GET /api/user/profile",
    "GET /api/health",
];

pub const HEALTH_FIELDS: [&str; 3] = ["status", "timestamp", "service"];
pub const DISCOVERY_FIELDS: [&str; 3] = ["message", "version", "endpoints"];

pub const CORS_HEADERS: [&str; 3] = [
    "Access-Control-Allow-Origin",
    "Access-Control-Allow-Methods",
    "Access-Control-Allow-Headers",
];

pub const PREFLIGHT_ROUTES: [&str; 4] = [HEALTH, NONCE, VERIFY, PROFILE];

pub const INVALID_ROUTES: [&str; 3] = ["/nonexistent", "/auth/invalid", "/user/invalid"];

/// Used in SIWE messages when the issuance check did not capture a nonce.
pub const FALLBACK_NONCE: &str = "abcd1234abcd1234abcd1234abcd1234";

/// Well-formed 65-byte hex signature that cannot verify against any message.
pub const INVALID_SIGNATURE: &str = "0x1234567890abcdef1234567890abcdef1234567890abcdef1234567890abcdef1234567890abcdef1234567890abcdef1234567890abcdef1234567890abcdef1b";

pub const INVALID_BEARER_TOKEN: &str = "invalid_token";

pub const BURST_REQUESTS: usize = 10;
pub const BURST_TIMEOUT_SECS: u64 = 5;

pub const NONCE_UNIQUENESS_SAMPLES: usize = 3;

/// Which of the three verify fields a payload carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifyFields {
    pub message: bool,
    pub signature: bool,
    pub address: bool,
}

impl VerifyFields {
    /// Every combination that leaves at least one required field out.
    #[must_use]
    pub fn incomplete() -> Vec<Self> {
        (0u8..7)
            .map(|bits| Self {
                message: bits & 0b100 != 0,
                signature: bits & 0b010 != 0,
                address: bits & 0b001 != 0,
            })
            .collect()
    }

    #[must_use]
    pub fn is_complete(self) -> bool {
        self.message && self.signature && self.address
    }

    #[must_use]
    pub fn payload(self, address: &str) -> serde_json::Value {
        let mut body = serde_json::Map::new();
        if self.message {
            body.insert("message".into(), "test".into());
        }
        if self.signature {
            body.insert("signature".into(), "test".into());
        }
        if self.address {
            body.insert("address".into(), address.into());
        }
        serde_json::Value::Object(body)
    }

    /// Short description such as `missing signature and address`.
    #[must_use]
    pub fn describe(self) -> String {
        let missing: Vec<&str> = [
            (self.message, "message"),
            (self.signature, "signature"),
            (self.address, "address"),
        ]
        .into_iter()
        .filter_map(|(present, name)| (!present).then_some(name))
        .collect();

        match missing.as_slice() {
            [] => "complete payload".to_string(),
            [one] => format!("missing {one}"),
            [a, b] => format!("missing {a} and {b}"),
            _ => "empty payload".to_string(),
        }
    }
}

#[must_use]
pub fn is_valid_nonce(nonce: &str) -> bool {
    Regex::new(r"^[0-9a-f]{32}$").map_or(false, |re| re.is_match(nonce))
}

/// EIP-4361 sign-in message for `address` bound to `nonce`.
#[must_use]
pub fn siwe_message(address: &str, nonce: &str) -> String {
    let issued_at = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

    format!(
        "localhost:3000 wants you to sign in with your Ethereum account:\n\
         {address}\n\
         \n\
         Sign in with Ethereum to the app.\n\
         \n\
         URI: http://localhost:3000\n\
         Version: 1\n\
         Chain ID: 1\n\
         Nonce: {nonce}\n\
         Issued At: {issued_at}"
    )
}

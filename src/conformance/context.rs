use crate::conformance::contract::{DEFAULT_ADDRESS, DEFAULT_PRODUCT, DEFAULT_SECONDARY_ADDRESS};

/// State threaded through one run.
///
/// Holds the run's fixed inputs and the values later checks pick up from earlier
/// ones. It is owned by the runner and handed to each check by `&mut`.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub product: String,
    pub address: String,
    pub secondary_address: String,
    nonce: Option<String>,
}

impl RunContext {
    #[must_use]
    pub fn new(product: &str, address: &str, secondary_address: &str) -> Self {
        Self {
            product: product.to_string(),
            address: address.to_string(),
            secondary_address: secondary_address.to_string(),
            nonce: None,
        }
    }

    /// Nonce captured by the issuance check, if it ran and succeeded.
    #[must_use]
    pub fn nonce(&self) -> Option<&str> {
        self.nonce.as_deref()
    }

    pub fn set_nonce(&mut self, nonce: String) {
        self.nonce = Some(nonce);
    }
}

impl Default for RunContext {
    fn default() -> Self {
        Self::new(DEFAULT_PRODUCT, DEFAULT_ADDRESS, DEFAULT_SECONDARY_ADDRESS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_without_nonce() {
        let ctx = RunContext::default();
        assert!(ctx.nonce().is_none());
        assert_eq!(ctx.product, "Wallet2FA");
        assert_ne!(
            ctx.address.to_lowercase(),
            ctx.secondary_address.to_lowercase()
        );
    }

    #[test]
    fn set_nonce_replaces_previous() {
        let mut ctx = RunContext::default();
        ctx.set_nonce("a".repeat(32));
        ctx.set_nonce("b".repeat(32));
        assert_eq!(ctx.nonce(), Some("b".repeat(32).as_str()));
    }
}

use crate::domain::money::Sats;
use rand::Rng;
use rand::distributions::Alphanumeric;
use std::time::{SystemTime, UNIX_EPOCH};

/// An issued payment-request artifact from the settlement service.
///
/// Opaque and immutable once issued. `expires_at` is advisory display
/// information only; the ledger never enforces it as a cutoff.
#[derive(Debug, Clone, PartialEq)]
pub struct Invoice {
    pub payment_request: String,
    pub payment_hash: String,
    pub amount: Sats,
    pub description: String,
    /// Expiry as milliseconds since the Unix epoch.
    pub expires_at: u64,
}

/// Opaque proof-of-payment token (a preimage on a real network).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettlementProof(pub String);

impl SettlementProof {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Fabricates a token for direct/demo settlement, where no external
    /// settlement service hands one over.
    pub fn generate() -> Self {
        let token: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(16)
            .map(char::from)
            .collect();
        Self(token.to_ascii_lowercase())
    }
}

/// Milliseconds since the Unix epoch.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

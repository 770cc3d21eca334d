use crate::domain::invoice::{Invoice, now_millis};
use crate::domain::money::Sats;
use crate::domain::ports::{InvoiceIssuer, PriceOracle};
use crate::error::Result;
use async_trait::async_trait;
use rand::Rng;
use rand::distributions::Alphanumeric;
use rust_decimal::Decimal;

/// Lifetime fabricated invoices advertise: one hour.
const INVOICE_TTL_MILLIS: u64 = 3_600_000;

/// A stand-in Lightning node that fabricates BOLT11-shaped invoices
/// locally instead of talking to a real one.
///
/// The payment requests are not valid BOLT11 and the hashes commit to
/// nothing; good enough for demos and tests, never for settlement.
#[derive(Debug, Default, Clone, Copy)]
pub struct MockLnNode;

impl MockLnNode {
    pub fn new() -> Self {
        Self
    }
}

fn random_token(len: usize) -> String {
    let token: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect();
    token.to_ascii_lowercase()
}

#[async_trait]
impl InvoiceIssuer for MockLnNode {
    async fn issue(&self, amount: Sats, description: &str) -> Result<Invoice> {
        Ok(Invoice {
            payment_request: format!("lnbc{}u1p{}", amount.value(), random_token(10)),
            payment_hash: random_token(13),
            amount,
            description: description.to_string(),
            expires_at: now_millis() + INVOICE_TTL_MILLIS,
        })
    }
}

/// A fixed BTC/USD rate injected at startup. Display conversion only;
/// the rate never feeds back into ledger state.
#[derive(Debug, Clone, Copy)]
pub struct FixedRate(Decimal);

impl FixedRate {
    pub fn new(rate: Decimal) -> Self {
        Self(rate)
    }
}

impl PriceOracle for FixedRate {
    fn btc_usd(&self) -> Decimal {
        self.0
    }
}

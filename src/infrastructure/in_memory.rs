use crate::domain::group::GroupConfig;
use crate::domain::invoice::{Invoice, SettlementProof};
use crate::domain::ledger::Ledger;
use crate::domain::member::MemberId;
use crate::domain::ports::LedgerStore;
use crate::domain::record::PaymentRecord;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory ledger store.
///
/// Wraps the grid in `Arc<RwLock<Ledger>>`: every mutation runs under a
/// single write lock, so readers only ever observe fully applied updates,
/// and `snapshot` hands out an owned copy of the whole grid.
#[derive(Clone)]
pub struct InMemoryLedgerStore {
    ledger: Arc<RwLock<Ledger>>,
}

impl InMemoryLedgerStore {
    pub fn new(ledger: Ledger) -> Self {
        Self {
            ledger: Arc::new(RwLock::new(ledger)),
        }
    }

    /// Builds the initial grid for a group: every cell unpaid.
    pub fn from_group(group: &GroupConfig) -> Self {
        Self::new(Ledger::initialize(
            &group.member_ids(),
            group.total_rounds(),
            group.contribution_sats,
        ))
    }
}

#[async_trait]
impl LedgerStore for InMemoryLedgerStore {
    async fn snapshot(&self) -> Result<Ledger> {
        let ledger = self.ledger.read().await;
        Ok(ledger.clone())
    }

    async fn cell(&self, member: MemberId, round: u32) -> Result<PaymentRecord> {
        let ledger = self.ledger.read().await;
        Ok(ledger.cell(member, round)?.clone())
    }

    async fn attach_invoice(
        &self,
        member: MemberId,
        round: u32,
        invoice: Invoice,
    ) -> Result<PaymentRecord> {
        let mut ledger = self.ledger.write().await;
        Ok(ledger.attach_invoice(member, round, invoice)?.clone())
    }

    async fn mark_paid(
        &self,
        member: MemberId,
        round: u32,
        proof: SettlementProof,
        confirmed_at: u64,
    ) -> Result<PaymentRecord> {
        let mut ledger = self.ledger.write().await;
        Ok(ledger.mark_paid(member, round, proof, confirmed_at)?.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::money::Sats;
    use crate::error::RoscaError;

    fn store() -> InMemoryLedgerStore {
        InMemoryLedgerStore::from_group(&GroupConfig::demo())
    }

    fn invoice() -> Invoice {
        Invoice {
            payment_request: "lnbc25000u1pabc".to_string(),
            payment_hash: "abc".to_string(),
            amount: Sats::new(25_000),
            description: "Rosca Round 1 - Payment to Oyin".to_string(),
            expires_at: 1_700_003_600_000,
        }
    }

    #[tokio::test]
    async fn test_store_round_trip() {
        let store = store();
        let cell = store.cell(MemberId(2), 0).await.unwrap();
        assert!(!cell.is_paid());

        store.attach_invoice(MemberId(2), 0, invoice()).await.unwrap();
        let cell = store.cell(MemberId(2), 0).await.unwrap();
        assert_eq!(cell.invoice().unwrap().payment_hash, "abc");

        let cell = store
            .mark_paid(MemberId(2), 0, SettlementProof::new("p"), 1_700_000_000_000)
            .await
            .unwrap();
        assert!(cell.is_paid());
    }

    #[tokio::test]
    async fn test_snapshot_is_isolated_from_later_writes() {
        let store = store();
        let before = store.snapshot().await.unwrap();

        store
            .mark_paid(MemberId(2), 0, SettlementProof::new("p"), 1_700_000_000_000)
            .await
            .unwrap();

        // The earlier snapshot still shows the cell unpaid.
        assert!(!before.cell(MemberId(2), 0).unwrap().is_paid());
        let after = store.snapshot().await.unwrap();
        assert!(after.cell(MemberId(2), 0).unwrap().is_paid());
    }

    #[tokio::test]
    async fn test_invalid_target_passes_through() {
        let store = store();
        assert!(matches!(
            store.cell(MemberId(99), 0).await,
            Err(RoscaError::InvalidTarget(_))
        ));
    }
}

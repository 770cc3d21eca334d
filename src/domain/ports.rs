use super::invoice::{Invoice, SettlementProof};
use super::ledger::Ledger;
use super::member::MemberId;
use super::money::Sats;
use super::record::PaymentRecord;
use crate::error::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;

#[async_trait]
pub trait LedgerStore: Send + Sync {
    async fn snapshot(&self) -> Result<Ledger>;
    async fn cell(&self, member: MemberId, round: u32) -> Result<PaymentRecord>;
    async fn attach_invoice(
        &self,
        member: MemberId,
        round: u32,
        invoice: Invoice,
    ) -> Result<PaymentRecord>;
    async fn mark_paid(
        &self,
        member: MemberId,
        round: u32,
        proof: SettlementProof,
        confirmed_at: u64,
    ) -> Result<PaymentRecord>;
}

pub type LedgerStoreBox = Box<dyn LedgerStore>;

#[async_trait]
pub trait InvoiceIssuer: Send + Sync {
    async fn issue(&self, amount: Sats, description: &str) -> Result<Invoice>;
}

pub type InvoiceIssuerBox = Box<dyn InvoiceIssuer>;

pub trait PriceOracle: Send + Sync {
    fn btc_usd(&self) -> Decimal;
}

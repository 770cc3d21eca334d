use crate::domain::group::GroupConfig;
use crate::domain::invoice::{Invoice, SettlementProof, now_millis};
use crate::domain::ledger::Ledger;
use crate::domain::member::{Member, MemberId};
use crate::domain::money::Sats;
use crate::domain::ports::{InvoiceIssuerBox, LedgerStoreBox};
use crate::domain::record::PaymentRecord;
use crate::domain::schedule::{PayoutSchedule, RoundCursor};
use crate::error::{Result, RoscaError};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// Correlates each in-flight issuance request with the cell it targets,
/// so a result that arrives after cancellation, or after a newer request
/// for the same cell, is discarded instead of applied.
struct IssuanceTickets {
    next: AtomicU64,
    pending: Mutex<HashMap<(MemberId, u32), u64>>,
}

impl IssuanceTickets {
    fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
            pending: Mutex::new(HashMap::new()),
        }
    }

    fn pending(&self) -> std::sync::MutexGuard<'_, HashMap<(MemberId, u32), u64>> {
        self.pending.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Registers a ticket for the cell, superseding any earlier one.
    fn begin(&self, member: MemberId, round: u32) -> u64 {
        let id = self.next.fetch_add(1, Ordering::Relaxed);
        self.pending().insert((member, round), id);
        id
    }

    /// Consumes the ticket if it is still the cell's current one; returns
    /// whether the caller may apply its result.
    fn complete(&self, member: MemberId, round: u32, id: u64) -> bool {
        let mut pending = self.pending();
        match pending.get(&(member, round)) {
            Some(&current) if current == id => {
                pending.remove(&(member, round));
                true
            }
            _ => false,
        }
    }

    fn cancel(&self, member: MemberId, round: u32) -> bool {
        self.pending().remove(&(member, round)).is_some()
    }
}

/// The main entry point of the savings circle.
///
/// `RoscaEngine` owns the ledger store and the invoice issuer and exposes
/// the full payment-cycle surface: cell reads, invoice creation, payment
/// confirmation, round navigation, and the derived totals. It assumes a
/// single logical actor: callers await one operation at a time, and every
/// store operation is applied atomically.
pub struct RoscaEngine {
    group: GroupConfig,
    schedule: PayoutSchedule,
    cursor: RwLock<RoundCursor>,
    ledger: LedgerStoreBox,
    issuer: InvoiceIssuerBox,
    tickets: IssuanceTickets,
}

impl RoscaEngine {
    /// Validates the group and wires the engine to its ports.
    pub fn new(group: GroupConfig, ledger: LedgerStoreBox, issuer: InvoiceIssuerBox) -> Result<Self> {
        group.validate()?;
        let schedule = group.schedule()?;
        let cursor = RoundCursor::new(schedule.total_rounds())?;
        Ok(Self {
            group,
            schedule,
            cursor: RwLock::new(cursor),
            ledger,
            issuer,
            tickets: IssuanceTickets::new(),
        })
    }

    pub fn group(&self) -> &GroupConfig {
        &self.group
    }

    fn require_member(&self, member: MemberId) -> Result<&Member> {
        self.group
            .member(member)
            .ok_or_else(|| RoscaError::InvalidTarget(format!("unknown member {member}")))
    }

    /// The designated recipient of a round.
    pub fn recipient_of(&self, round: u32) -> Result<&Member> {
        let id = self.schedule.recipient_of(round)?;
        self.require_member(id)
    }

    pub async fn current_round(&self) -> u32 {
        self.cursor.read().await.current()
    }

    pub async fn current_recipient(&self) -> Result<&Member> {
        let round = self.current_round().await;
        self.recipient_of(round)
    }

    /// Moves to the next round; saturates at the last one.
    pub async fn advance_round(&self) -> u32 {
        self.cursor.write().await.advance()
    }

    /// Moves to the previous round; saturates at round 0.
    pub async fn retreat_round(&self) -> u32 {
        self.cursor.write().await.retreat()
    }

    pub async fn cell(&self, member: MemberId, round: u32) -> Result<PaymentRecord> {
        self.require_member(member)?;
        self.ledger.cell(member, round).await
    }

    /// Issues an invoice for a member's contribution in a round and
    /// records it against the cell.
    ///
    /// The ledger stays untouched until issuance succeeds, and a result is
    /// applied only while its ticket is still the cell's current one:
    /// results arriving after [`Self::cancel_issuance`], after a newer
    /// request for the same cell, or after the cell settled are discarded
    /// with `StaleIssuance`. A cell that already holds an outstanding
    /// unpaid invoice returns that invoice without touching the issuer.
    pub async fn create_invoice_for(&self, member: MemberId, round: u32) -> Result<Invoice> {
        self.require_member(member)?;
        let cell = self.ledger.cell(member, round).await?;
        if cell.is_paid() {
            return Err(RoscaError::AlreadyPaid(format!(
                "member {member} already settled round {round}"
            )));
        }
        if let Some(existing) = cell.invoice() {
            debug!(%member, round, "returning outstanding invoice");
            return Ok(existing.clone());
        }

        let recipient = self.recipient_of(round)?;
        let description = format!("Rosca Round {} - Payment to {}", round + 1, recipient.name);

        let ticket = self.tickets.begin(member, round);
        let invoice = match self.issuer.issue(self.group.contribution_sats, &description).await {
            Ok(invoice) => invoice,
            Err(err) => {
                self.tickets.complete(member, round, ticket);
                return Err(err);
            }
        };

        if !self.tickets.complete(member, round, ticket) {
            warn!(%member, round, "discarding stale issuance result");
            return Err(RoscaError::StaleIssuance(format!(
                "member {member}, round {round}"
            )));
        }

        self.ledger
            .attach_invoice(member, round, invoice.clone())
            .await?;
        debug!(%member, round, payment_hash = %invoice.payment_hash, "invoice recorded");
        Ok(invoice)
    }

    /// Drops any pending issuance request for the cell so a late-arriving
    /// result is discarded. Returns whether a request was pending.
    pub fn cancel_issuance(&self, member: MemberId, round: u32) -> bool {
        let cancelled = self.tickets.cancel(member, round);
        if cancelled {
            debug!(%member, round, "pending issuance cancelled");
        }
        cancelled
    }

    /// Confirms a member's contribution for a round, fabricating an opaque
    /// settlement proof and confirmation time. No prior invoice is required
    /// (direct settlement). Idempotent: a settled cell is returned unchanged.
    pub async fn confirm_payment(&self, member: MemberId, round: u32) -> Result<PaymentRecord> {
        self.require_member(member)?;
        let cell = self.ledger.cell(member, round).await?;
        if cell.is_paid() {
            return Ok(cell);
        }

        // A settling payment outranks any in-flight issuance for the cell.
        self.cancel_issuance(member, round);
        let record = self
            .ledger
            .mark_paid(member, round, SettlementProof::generate(), now_millis())
            .await?;
        debug!(%member, round, "payment confirmed");
        Ok(record)
    }

    /// An owned, consistent copy of the whole grid.
    pub async fn snapshot(&self) -> Result<Ledger> {
        self.ledger.snapshot().await
    }

    pub async fn round_total(&self, round: u32) -> Result<Sats> {
        self.ledger.snapshot().await?.round_total(round)
    }

    /// True iff every member except the round's recipient has settled.
    pub async fn is_round_complete(&self, round: u32) -> Result<bool> {
        let recipient = self.schedule.recipient_of(round)?;
        self.ledger
            .snapshot()
            .await?
            .is_round_complete(round, recipient)
    }

    pub async fn lifetime_total(&self, member: MemberId) -> Result<Sats> {
        self.ledger.snapshot().await?.lifetime_total(member)
    }

    /// Per-member lifetime summaries, in group declaration order.
    pub async fn member_summaries(&self) -> Result<Vec<MemberSummary>> {
        let ledger = self.ledger.snapshot().await?;
        self.group
            .members
            .iter()
            .map(|member| {
                Ok(MemberSummary {
                    member: member.id,
                    name: member.name.clone(),
                    rounds_paid: ledger.rounds_paid(member.id)?,
                    lifetime: ledger.lifetime_total(member.id)?,
                })
            })
            .collect()
    }

    /// Per-round collection reports, in round order.
    pub async fn round_reports(&self) -> Result<Vec<RoundReport>> {
        let ledger = self.ledger.snapshot().await?;
        let pool = self.group.pool_total();
        (0..self.schedule.total_rounds())
            .map(|round| {
                let recipient = self.recipient_of(round)?;
                Ok(RoundReport {
                    round,
                    recipient: recipient.name.clone(),
                    collected: ledger.round_total(round)?,
                    pool,
                    complete: ledger.is_round_complete(round, recipient.id)?,
                })
            })
            .collect()
    }
}

/// A member's lifetime contribution summary.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberSummary {
    pub member: MemberId,
    pub name: String,
    pub rounds_paid: u32,
    pub lifetime: Sats,
}

/// Collection status of one round.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundReport {
    pub round: u32,
    pub recipient: String,
    pub collected: Sats,
    pub pool: Sats,
    pub complete: bool,
}

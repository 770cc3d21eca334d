use crate::domain::invoice::{Invoice, SettlementProof};
use crate::domain::member::MemberId;
use crate::domain::money::Sats;
use crate::domain::record::PaymentRecord;
use crate::error::{Result, RoscaError};
use std::collections::HashMap;

/// The full members × rounds grid of payment records.
///
/// Built once at group formation with every cell unpaid and invoice-less;
/// cells only move forward through the record state machine and are never
/// deleted. Aggregates are recomputed from the grid on every call; the
/// grid is small and bounded, so nothing is cached.
#[derive(Debug, Clone, PartialEq)]
pub struct Ledger {
    amount_due: Sats,
    rounds: u32,
    /// Member ids in group declaration order, for deterministic iteration.
    members: Vec<MemberId>,
    cells: HashMap<MemberId, Vec<PaymentRecord>>,
}

impl Ledger {
    /// Builds the full grid, every cell owed `amount_due`.
    pub fn initialize(members: &[MemberId], rounds: u32, amount_due: Sats) -> Self {
        let cells = members
            .iter()
            .map(|&member| {
                (
                    member,
                    vec![PaymentRecord::new(amount_due); rounds as usize],
                )
            })
            .collect();
        Self {
            amount_due,
            rounds,
            members: members.to_vec(),
            cells,
        }
    }

    pub fn members(&self) -> &[MemberId] {
        &self.members
    }

    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    pub fn amount_due(&self) -> Sats {
        self.amount_due
    }

    fn row(&self, member: MemberId) -> Result<&[PaymentRecord]> {
        self.cells
            .get(&member)
            .map(Vec::as_slice)
            .ok_or_else(|| RoscaError::InvalidTarget(format!("unknown member {member}")))
    }

    fn check_round(&self, round: u32) -> Result<usize> {
        if round < self.rounds {
            Ok(round as usize)
        } else {
            Err(RoscaError::InvalidTarget(format!(
                "round {round} out of range ({} rounds)",
                self.rounds
            )))
        }
    }

    pub fn cell(&self, member: MemberId, round: u32) -> Result<&PaymentRecord> {
        let round = self.check_round(round)?;
        Ok(&self.row(member)?[round])
    }

    fn cell_mut(&mut self, member: MemberId, round: u32) -> Result<&mut PaymentRecord> {
        let round = self.check_round(round)?;
        let row = self
            .cells
            .get_mut(&member)
            .ok_or_else(|| RoscaError::InvalidTarget(format!("unknown member {member}")))?;
        Ok(&mut row[round])
    }

    /// Records an issued invoice against a cell; the cell stays unpaid.
    pub fn attach_invoice(
        &mut self,
        member: MemberId,
        round: u32,
        invoice: Invoice,
    ) -> Result<&PaymentRecord> {
        let cell = self.cell_mut(member, round)?;
        cell.attach_invoice(invoice)?;
        Ok(cell)
    }

    /// Settles a cell. Idempotent on already-settled cells, and permitted
    /// without a prior invoice (direct settlement).
    pub fn mark_paid(
        &mut self,
        member: MemberId,
        round: u32,
        proof: SettlementProof,
        confirmed_at: u64,
    ) -> Result<&PaymentRecord> {
        let cell = self.cell_mut(member, round)?;
        cell.settle(proof, confirmed_at);
        Ok(cell)
    }

    fn aggregation_round(&self, round: u32) -> Result<usize> {
        if round < self.rounds {
            Ok(round as usize)
        } else {
            Err(RoscaError::OutOfRange(format!(
                "round {round} of {}",
                self.rounds
            )))
        }
    }

    /// Total collected for a round: the sum of `amount_due` over every
    /// settled cell in it.
    pub fn round_total(&self, round: u32) -> Result<Sats> {
        let round = self.aggregation_round(round)?;
        Ok(self
            .members
            .iter()
            .filter_map(|member| self.cells.get(member))
            .map(|row| &row[round])
            .filter(|cell| cell.is_paid())
            .map(PaymentRecord::amount_due)
            .sum())
    }

    /// True iff every member other than the round's recipient has settled.
    /// The recipient receives rather than pays, so their own cell is
    /// ignored.
    pub fn is_round_complete(&self, round: u32, recipient: MemberId) -> Result<bool> {
        let round = self.aggregation_round(round)?;
        Ok(self
            .members
            .iter()
            .filter(|&&member| member != recipient)
            .filter_map(|member| self.cells.get(member))
            .all(|row| row[round].is_paid()))
    }

    /// Lifetime contribution of a member: the sum of `amount_due` over
    /// their settled cells, regardless of round or recipient role.
    pub fn lifetime_total(&self, member: MemberId) -> Result<Sats> {
        Ok(self
            .row(member)?
            .iter()
            .filter(|cell| cell.is_paid())
            .map(PaymentRecord::amount_due)
            .sum())
    }

    /// Number of rounds a member has settled.
    pub fn rounds_paid(&self, member: MemberId) -> Result<u32> {
        Ok(self.row(member)?.iter().filter(|cell| cell.is_paid()).count() as u32)
    }
}

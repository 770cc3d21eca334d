use crate::domain::invoice::{Invoice, SettlementProof};
use crate::domain::money::Sats;
use crate::error::{Result, RoscaError};

/// Proof and confirmation time of a settled cell, recorded together
/// exactly once, alongside the invoice the payment settled against (absent
/// for direct/demo settlement).
#[derive(Debug, Clone, PartialEq)]
pub struct Settlement {
    pub invoice: Option<Invoice>,
    pub proof: SettlementProof,
    /// Confirmation time as milliseconds since the Unix epoch.
    pub confirmed_at: u64,
}

/// Where a cell sits in its payment lifecycle.
///
/// Transitions only move forward: `Owed → InvoiceIssued → Settled`, with
/// `Owed → Settled` permitted for direct settlement. A newly issued invoice
/// may supersede an outstanding unpaid one; a settled cell is terminal.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PaymentState {
    #[default]
    Owed,
    InvoiceIssued(Invoice),
    Settled(Settlement),
}

/// One member's contribution obligation for one round.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentRecord {
    amount_due: Sats,
    state: PaymentState,
}

impl PaymentRecord {
    pub fn new(amount_due: Sats) -> Self {
        Self {
            amount_due,
            state: PaymentState::Owed,
        }
    }

    /// The contribution owed for this cell, fixed at creation.
    pub fn amount_due(&self) -> Sats {
        self.amount_due
    }

    pub fn state(&self) -> &PaymentState {
        &self.state
    }

    pub fn is_paid(&self) -> bool {
        matches!(self.state, PaymentState::Settled(_))
    }

    /// The invoice currently recorded on the cell, whether still
    /// outstanding or carried into settlement.
    pub fn invoice(&self) -> Option<&Invoice> {
        match &self.state {
            PaymentState::Owed => None,
            PaymentState::InvoiceIssued(invoice) => Some(invoice),
            PaymentState::Settled(settlement) => settlement.invoice.as_ref(),
        }
    }

    pub fn settlement(&self) -> Option<&Settlement> {
        match &self.state {
            PaymentState::Settled(settlement) => Some(settlement),
            _ => None,
        }
    }

    /// Records a freshly issued invoice against the cell.
    ///
    /// An outstanding unpaid invoice is superseded by the new one, keeping
    /// at most one outstanding at a time. A settled cell is terminal.
    pub fn attach_invoice(&mut self, invoice: Invoice) -> Result<()> {
        if self.is_paid() {
            return Err(RoscaError::AlreadyPaid(
                "a settled cell cannot take a new invoice".to_string(),
            ));
        }
        self.state = PaymentState::InvoiceIssued(invoice);
        Ok(())
    }

    /// Moves the cell to settled, keeping any outstanding invoice.
    ///
    /// Idempotent: settling a settled cell is a no-op that preserves the
    /// original proof and confirmation time. Returns whether the state
    /// changed. No prior invoice is required (direct settlement).
    pub fn settle(&mut self, proof: SettlementProof, confirmed_at: u64) -> bool {
        match std::mem::take(&mut self.state) {
            PaymentState::Owed => {
                self.state = PaymentState::Settled(Settlement {
                    invoice: None,
                    proof,
                    confirmed_at,
                });
                true
            }
            PaymentState::InvoiceIssued(invoice) => {
                self.state = PaymentState::Settled(Settlement {
                    invoice: Some(invoice),
                    proof,
                    confirmed_at,
                });
                true
            }
            settled @ PaymentState::Settled(_) => {
                self.state = settled;
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invoice(hash: &str) -> Invoice {
        Invoice {
            payment_request: format!("lnbc25000u1p{hash}"),
            payment_hash: hash.to_string(),
            amount: Sats::new(25_000),
            description: "Rosca Round 1 - Payment to Oyin".to_string(),
            expires_at: 1_700_003_600_000,
        }
    }

    #[test]
    fn test_new_cell_is_unpaid_and_invoiceless() {
        let record = PaymentRecord::new(Sats::new(25_000));
        assert!(!record.is_paid());
        assert!(record.invoice().is_none());
        assert!(record.settlement().is_none());
        assert_eq!(record.amount_due(), Sats::new(25_000));
    }

    #[test]
    fn test_attach_then_settle_keeps_invoice() {
        let mut record = PaymentRecord::new(Sats::new(25_000));
        record.attach_invoice(invoice("abc")).unwrap();
        assert!(!record.is_paid());
        assert_eq!(record.invoice().unwrap().payment_hash, "abc");

        let changed = record.settle(SettlementProof::new("preimage"), 1_700_000_000_000);
        assert!(changed);
        assert!(record.is_paid());
        let settlement = record.settlement().unwrap();
        assert_eq!(settlement.confirmed_at, 1_700_000_000_000);
        assert_eq!(settlement.invoice.as_ref().unwrap().payment_hash, "abc");
    }

    #[test]
    fn test_settle_without_invoice() {
        // Direct/demo settlement: no invoice was ever issued.
        let mut record = PaymentRecord::new(Sats::new(25_000));
        let changed = record.settle(SettlementProof::new("preimage"), 1_700_000_000_000);
        assert!(changed);
        assert!(record.is_paid());
        assert!(record.settlement().unwrap().invoice.is_none());
    }

    #[test]
    fn test_settle_is_idempotent() {
        let mut record = PaymentRecord::new(Sats::new(25_000));
        record.settle(SettlementProof::new("first"), 1_700_000_000_000);
        let before = record.clone();

        let changed = record.settle(SettlementProof::new("second"), 1_700_009_999_999);
        assert!(!changed);
        // Original proof and confirmation time survive the re-confirmation.
        assert_eq!(record, before);
        assert_eq!(record.settlement().unwrap().proof, SettlementProof::new("first"));
        assert_eq!(record.settlement().unwrap().confirmed_at, 1_700_000_000_000);
    }

    #[test]
    fn test_attach_to_settled_cell_is_rejected() {
        let mut record = PaymentRecord::new(Sats::new(25_000));
        record.settle(SettlementProof::new("preimage"), 1_700_000_000_000);
        let before = record.clone();

        let result = record.attach_invoice(invoice("late"));
        assert!(matches!(result, Err(RoscaError::AlreadyPaid(_))));
        assert_eq!(record, before);
    }

    #[test]
    fn test_new_invoice_supersedes_outstanding_one() {
        let mut record = PaymentRecord::new(Sats::new(25_000));
        record.attach_invoice(invoice("old")).unwrap();
        record.attach_invoice(invoice("new")).unwrap();

        assert_eq!(record.invoice().unwrap().payment_hash, "new");
        assert!(!record.is_paid());
    }
}

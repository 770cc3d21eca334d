use crate::application::engine::{MemberSummary, RoundReport};
use crate::domain::member::MemberId;
use crate::domain::money::Sats;
use crate::error::Result;
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct MemberRow<'a> {
    member: MemberId,
    name: &'a str,
    rounds_paid: u32,
    total: Sats,
    usd: String,
}

#[derive(Serialize)]
struct RoundRow<'a> {
    round: u32,
    recipient: &'a str,
    collected: Sats,
    pool: Sats,
    complete: bool,
}

/// Writes engine reports as CSV to any `Write` sink.
///
/// Round coordinates in the output are the same 0-based ones the event
/// script uses.
pub struct SummaryWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> SummaryWriter<W> {
    pub fn new(target: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(target),
        }
    }

    /// Writes one row per member: rounds settled and lifetime contribution,
    /// in sats and in fiat at the given BTC/USD rate.
    pub fn write_members(&mut self, summaries: &[MemberSummary], rate: Decimal) -> Result<()> {
        for summary in summaries {
            self.writer.serialize(MemberRow {
                member: summary.member,
                name: &summary.name,
                rounds_paid: summary.rounds_paid,
                total: summary.lifetime,
                usd: format!("{:.2}", summary.lifetime.to_fiat(rate)),
            })?;
        }
        self.writer.flush()?;
        Ok(())
    }

    /// Writes one row per round with its collection status.
    pub fn write_rounds(&mut self, reports: &[RoundReport]) -> Result<()> {
        for report in reports {
            self.writer.serialize(RoundRow {
                round: report.round,
                recipient: &report.recipient,
                collected: report.collected,
                pool: report.pool,
                complete: report.complete,
            })?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

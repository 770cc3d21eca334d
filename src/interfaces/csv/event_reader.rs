use crate::domain::member::MemberId;
use crate::error::{Result, RoscaError};
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize, PartialEq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Invoice,
    Confirm,
    Advance,
    Retreat,
}

/// One row of the replay script driving the engine.
///
/// `member` and `round` apply to the payment events; the navigation events
/// leave them blank. A blank `round` on a payment event targets whichever
/// round the cursor is on when the event is applied.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct LedgerEvent {
    pub event: EventKind,
    pub member: Option<MemberId>,
    pub round: Option<u32>,
}

/// Reads ledger events from a CSV source.
///
/// Wraps `csv::Reader` into an iterator of `Result<LedgerEvent>`, trimming
/// whitespace and accepting short navigation rows, so one bad row never
/// stops the stream.
pub struct EventReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> EventReader<R> {
    /// Creates a new `EventReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and deserializes events.
    pub fn events(self) -> impl Iterator<Item = Result<LedgerEvent>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(RoscaError::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reader_valid_stream() {
        let data = "event, member, round\ninvoice, 2, 0\nconfirm, 2, 0\nadvance, ,";
        let reader = EventReader::new(data.as_bytes());
        let results: Vec<Result<LedgerEvent>> = reader.events().collect();

        assert_eq!(results.len(), 3);
        let first = results[0].as_ref().unwrap();
        assert_eq!(first.event, EventKind::Invoice);
        assert_eq!(first.member, Some(MemberId(2)));
        assert_eq!(first.round, Some(0));

        let third = results[2].as_ref().unwrap();
        assert_eq!(third.event, EventKind::Advance);
        assert_eq!(third.member, None);
        assert_eq!(third.round, None);
    }

    #[test]
    fn test_reader_blank_round_targets_cursor() {
        let data = "event, member, round\nconfirm, 3,";
        let reader = EventReader::new(data.as_bytes());
        let results: Vec<Result<LedgerEvent>> = reader.events().collect();

        let event = results[0].as_ref().unwrap();
        assert_eq!(event.member, Some(MemberId(3)));
        assert_eq!(event.round, None);
    }

    #[test]
    fn test_reader_short_navigation_row() {
        let data = "event, member, round\nretreat";
        let reader = EventReader::new(data.as_bytes());
        let results: Vec<Result<LedgerEvent>> = reader.events().collect();

        let event = results[0].as_ref().unwrap();
        assert_eq!(event.event, EventKind::Retreat);
        assert_eq!(event.member, None);
    }

    #[test]
    fn test_reader_malformed_line() {
        let data = "event, member, round\npayout, 1, 0";
        let reader = EventReader::new(data.as_bytes());
        let results: Vec<Result<LedgerEvent>> = reader.events().collect();

        assert!(results[0].is_err());
    }
}

//! Domain model of the savings circle: member identities, the payment
//! record grid and its aggregation, the payout schedule, and the ports
//! the application layer consumes.

pub mod group;
pub mod invoice;
pub mod ledger;
pub mod member;
pub mod money;
pub mod ports;
pub mod record;
pub mod schedule;

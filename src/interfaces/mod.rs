//! Interface adapters.
//!
//! CSV is the only wire format: a reader for the event script that drives
//! the engine, and writers for the member and round reports.

pub mod csv;

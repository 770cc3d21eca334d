//! Adapters behind the domain ports: the in-memory ledger store and the
//! fabricated Lightning issuer used for demos and tests.

pub mod in_memory;
pub mod mock_ln;

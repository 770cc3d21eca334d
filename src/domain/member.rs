use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique, stable identifier of a circle member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(pub u32);

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for MemberId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

/// Immutable member identity, created once at group formation.
///
/// `ln_address` is the contact address payouts settle to and `pubkey` the
/// member's public key identifier; the core treats both as opaque strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub name: String,
    pub ln_address: String,
    pub pubkey: String,
}

impl Member {
    pub fn new(
        id: impl Into<MemberId>,
        name: impl Into<String>,
        ln_address: impl Into<String>,
        pubkey: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ln_address: ln_address.into(),
            pubkey: pubkey.into(),
        }
    }
}

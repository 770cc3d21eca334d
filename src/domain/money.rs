use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul};

/// A satoshi amount.
///
/// Contribution amounts and pooled totals are whole satoshis, so this is a
/// wrapper around `u64` rather than a decimal type. Fiat values exist only
/// for display and are derived on demand via [`Sats::to_fiat`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize, Hash,
)]
#[serde(transparent)]
pub struct Sats(pub u64);

/// Satoshis per bitcoin, for fiat conversion.
const SATS_PER_BTC: u64 = 100_000_000;

impl Sats {
    pub const ZERO: Self = Self(0);

    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }

    /// Converts to a fiat amount at the given BTC rate.
    ///
    /// Display-only: the result never feeds back into ledger state.
    pub fn to_fiat(self, btc_rate: Decimal) -> Decimal {
        Decimal::from(self.0) / Decimal::from(SATS_PER_BTC) * btc_rate
    }
}

impl Add for Sats {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Sats {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Mul<u64> for Sats {
    type Output = Self;
    fn mul(self, rhs: u64) -> Self::Output {
        Self(self.0 * rhs)
    }
}

impl Sum for Sats {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl fmt::Display for Sats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Sats {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

//! Monetary amounts as exact decimals
//!
//! Prices arrive as floating point major units. Each one is converted to a
//! `Decimal` once, at the record boundary, and every sum after that is exact.
//! Conversion back to `f64` happens only for chart output.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::iter::Sum;
use std::ops::{Add, AddAssign};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    pub fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Whole minor units, e.g. `1999` for 19.99
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// Convert a major-unit amount without rounding to cents.
    ///
    /// Goes through the shortest decimal form of the float, so `0.1` is
    /// exactly `0.1`. NaN, infinities and magnitudes beyond `Decimal::MAX`
    /// become zero.
    pub fn from_major(amount: f64) -> Self {
        amount
            .to_string()
            .parse::<Decimal>()
            .ok()
            .or_else(|| Decimal::from_f64(amount))
            .map(|d| Self(d.normalize()))
            .unwrap_or(Self::ZERO)
    }

    pub fn amount(self) -> Decimal {
        self.0
    }

    pub fn as_major(self) -> f64 {
        self.0.to_f64().unwrap_or(0.0)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        *self = *self + rhs;
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_major())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        f64::deserialize(deserializer).map(Money::from_major)
    }
}

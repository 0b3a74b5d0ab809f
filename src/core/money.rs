//! Fixed-point monetary amounts.
//!
//! [`Money`] stores a signed number of minor units (cents) in an `i64`. Amounts enter the
//! system as [`Decimal`] values or decimal strings and are converted exactly; anything that
//! would need rounding is rejected. All arithmetic is checked so a ledger can never wrap
//! around silently.

use crate::errors::{Error, Result};
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, str::FromStr};

/// Number of fractional digits carried by every amount.
pub const MINOR_UNIT_SCALE: u32 = 2;

/// A signed monetary amount in minor units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    /// The zero amount.
    pub const ZERO: Self = Self(0);

    /// Wraps a raw number of cents.
    #[must_use]
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// The raw number of cents.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Converts a decimal amount, rejecting sub-cent precision and out-of-range values.
    pub fn from_decimal(amount: Decimal) -> Result<Self> {
        let normalized = amount.normalize();
        if normalized.scale() > MINOR_UNIT_SCALE {
            return Err(Error::validation(format!(
                "amount {amount} has more than {MINOR_UNIT_SCALE} decimal places"
            )));
        }

        normalized
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|cents| cents.to_i64())
            .map(Self)
            .ok_or_else(|| Error::validation(format!("amount {amount} is out of range")))
    }

    /// Converts a binary float, rejecting NaN and infinities.
    ///
    /// The float is read back through its shortest decimal representation, so `19.99`
    /// becomes exactly 1999 cents.
    pub fn from_f64(amount: f64) -> Result<Self> {
        if !amount.is_finite() {
            return Err(Error::validation(format!(
                "amount {amount} is not a finite number"
            )));
        }

        let decimal = Decimal::from_f64(amount)
            .ok_or_else(|| Error::validation(format!("amount {amount} is out of range")))?;
        Self::from_decimal(decimal)
    }

    /// The amount as a two-place decimal.
    #[must_use]
    pub fn to_decimal(self) -> Decimal {
        Decimal::new(self.0, MINOR_UNIT_SCALE)
    }

    /// Adds two amounts, `None` on overflow.
    #[must_use]
    pub const fn checked_add(self, other: Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(cents) => Some(Self(cents)),
            None => None,
        }
    }

    /// Adds two amounts, reporting overflow as [`Error::ArithmeticOverflow`].
    pub fn try_add(self, other: Self) -> Result<Self> {
        self.checked_add(other).ok_or(Error::ArithmeticOverflow)
    }

    /// True for amounts below zero.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_decimal())
    }
}

impl FromStr for Money {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let decimal = Decimal::from_str(trimmed)
            .map_err(|e| Error::validation(format!("'{trimmed}' is not a valid amount: {e}")))?;
        Self::from_decimal(decimal)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let decimal = <Decimal as Deserialize>::deserialize(deserializer)?;
        Self::from_decimal(decimal).map_err(serde::de::Error::custom)
    }
}

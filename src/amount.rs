//! Exact decimal amount type used for every numeric QIF field.
//!
//! Wraps `rust_decimal` and keeps values exactly as written, so split sums
//! and balances are compared exactly, never through floating point.

use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::Add;
use std::str::FromStr;

/// A decimal value with the precision it was read with.
///
/// Monetary amounts, share quantities and security prices all use this type.
/// Equality ignores trailing zeros: `1.0 == 1.00`.
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
/// use qif_reader::Amount;
///
/// let amount = Amount::from_str("1,234.5").unwrap();
/// assert_eq!(amount.to_string(), "1234.50");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Amount(Decimal);

impl Amount {
    /// Zero value.
    pub const ZERO: Self = Amount(Decimal::ZERO);

    /// Adds `rhs`, returning `None` if the result does not fit.
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Amount)
    }

    /// Sums `amounts` left to right, returning `None` on overflow.
    pub fn checked_sum<I>(amounts: I) -> Option<Self>
    where
        I: IntoIterator<Item = Self>,
    {
        amounts
            .into_iter()
            .try_fold(Amount::ZERO, |acc, amount| acc.checked_add(amount))
    }
}

impl FromStr for Amount {
    type Err = rust_decimal::Error;

    /// Parses a field value, accepting `,` as a thousands separator.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        let decimal = if trimmed.contains(',') {
            let digits: String = trimmed.chars().filter(|c| *c != ',').collect();
            Decimal::from_str(&digits)?
        } else {
            Decimal::from_str(trimmed)?
        };
        Ok(Amount(decimal))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // At least cents, more only when the value carries them.
        let mut shown = self.0.normalize();
        if shown.scale() < 2 {
            shown.rescale(2);
        }
        write!(f, "{}", shown)
    }
}

/// Panics on overflow. Documents produced by the reader never overflow:
/// every running split total and balance is checked while reading.
impl Add for Amount {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Amount(self.0 + rhs.0)
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, |acc, amount| acc + amount)
    }
}

impl<'a> Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

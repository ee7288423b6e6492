//! Whole-unit price representation.
//!
//! The storefront prices everything in whole pesos. There are no minor
//! units, so a price is a plain non-negative integer and all arithmetic is
//! exact. Arithmetic saturates instead of wrapping.

use core::fmt;
use core::iter::Sum;

use serde::{Deserialize, Serialize};

/// Currency symbol used when displaying prices.
pub const CURRENCY_SYMBOL: &str = "₱";

/// Errors that can occur when parsing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The input string is empty.
    #[error("price cannot be empty")]
    Empty,
    /// The input is not a non-negative whole number.
    #[error("price must be a non-negative whole number, got '{0}'")]
    Invalid(String),
}

/// A non-negative amount in whole currency units.
///
/// ## Examples
///
/// ```
/// use shopease_core::Price;
///
/// let price = Price::new(1500);
/// assert_eq!(price.to_string(), "₱1,500");
/// assert_eq!(price.times(3), Price::new(4500));
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Price(u64);

impl Price {
    /// The zero amount.
    pub const ZERO: Self = Self(0);

    /// Create a price from a whole-unit amount.
    #[must_use]
    pub const fn new(amount: u64) -> Self {
        Self(amount)
    }

    /// Get the underlying amount.
    #[must_use]
    pub const fn amount(self) -> u64 {
        self.0
    }

    /// Returns `true` for the zero amount.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Price of `qty` units.
    #[must_use]
    pub const fn times(self, qty: u32) -> Self {
        Self(self.0.saturating_mul(qty as u64))
    }

    /// Add two amounts.
    #[must_use]
    pub const fn plus(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// Parse a price submitted as text (e.g. from a form field).
    ///
    /// # Errors
    ///
    /// Returns an error if the trimmed input is empty or is not a
    /// non-negative integer.
    pub fn parse(s: &str) -> Result<Self, PriceError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(PriceError::Empty);
        }
        trimmed
            .parse::<u64>()
            .map(Self)
            .map_err(|_| PriceError::Invalid(trimmed.to_owned()))
    }
}

impl fmt::Display for Price {
    /// Formats as the currency symbol followed by the amount with thousands
    /// separators, e.g. `₱12,500`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.0.to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }
        write!(f, "{CURRENCY_SYMBOL}{grouped}")
    }
}

impl From<u64> for Price {
    fn from(amount: u64) -> Self {
        Self(amount)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Self::plus)
    }
}

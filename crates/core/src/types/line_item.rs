//! Cart line items and quantities.

use core::fmt;
use core::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;

/// Errors that can occur when constructing a [`Quantity`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum QuantityError {
    /// Quantities start at one.
    #[error("quantity must be at least 1")]
    Zero,
}

/// A positive item count.
///
/// A line item never holds zero units: removing the last unit removes the
/// line. User-entered quantities go through [`Quantity::parse_clamped`],
/// which never fails.
///
/// ## Examples
///
/// ```
/// use shopease_core::Quantity;
///
/// assert_eq!(Quantity::parse_clamped("3").get(), 3);
/// assert_eq!(Quantity::parse_clamped("0").get(), 1);
/// assert_eq!(Quantity::parse_clamped("abc").get(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Quantity(NonZeroU32);

impl Quantity {
    /// A single unit.
    pub const ONE: Self = Self(NonZeroU32::MIN);

    /// Create a quantity.
    ///
    /// # Errors
    ///
    /// Returns [`QuantityError::Zero`] for zero.
    pub const fn new(value: u32) -> Result<Self, QuantityError> {
        match NonZeroU32::new(value) {
            Some(n) => Ok(Self(n)),
            None => Err(QuantityError::Zero),
        }
    }

    /// Get the underlying count.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0.get()
    }

    /// Interpret free-form user input as a quantity.
    ///
    /// Reads an optional sign and the leading run of digits, ignoring
    /// anything after them (`"3 pcs"` is 3). Input without leading digits,
    /// zero and negative numbers all become 1. Values too large for a `u32`
    /// saturate.
    #[must_use]
    pub fn parse_clamped(input: &str) -> Self {
        let trimmed = input.trim_start();
        let (negative, rest) = match trimmed.as_bytes().first() {
            Some(b'-') => (true, trimmed.get(1..).unwrap_or_default()),
            Some(b'+') => (false, trimmed.get(1..).unwrap_or_default()),
            _ => (false, trimmed),
        };

        let digits_end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        let digits = rest.get(..digits_end).unwrap_or_default();
        if negative || digits.is_empty() {
            return Self::ONE;
        }

        let value = digits.parse::<u32>().unwrap_or(u32::MAX);
        Self::new(value).unwrap_or(Self::ONE)
    }

    /// Add units, saturating at `u32::MAX`.
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0.get()))
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::ONE
    }
}

impl TryFrom<u32> for Quantity {
    type Error = QuantityError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Quantity> for u32 {
    fn from(qty: Quantity) -> Self {
        qty.get()
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One product entry in the cart.
///
/// `price` is captured when the product is added and is never re-fetched.
/// The serialized form is the slot encoding used by the cart store:
/// `{"id":"p1","name":"Widget","price":1000,"qty":3}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Product key, unique within a cart.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Unit price at time of add.
    pub price: Price,
    /// Units in the cart.
    pub qty: Quantity,
}

impl LineItem {
    /// Create a new line item.
    #[must_use]
    pub fn new(id: ProductId, name: impl Into<String>, price: Price, qty: Quantity) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            qty,
        }
    }

    /// Price of the whole line (unit price × quantity).
    #[must_use]
    pub const fn line_total(&self) -> Price {
        self.price.times(self.qty.get())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_quantity_rejects_zero() {
        assert_eq!(Quantity::new(0), Err(QuantityError::Zero));
        assert_eq!(Quantity::new(2).unwrap().get(), 2);
    }

    #[test]
    fn test_parse_clamped_valid() {
        assert_eq!(Quantity::parse_clamped("4").get(), 4);
        assert_eq!(Quantity::parse_clamped("  12").get(), 12);
        assert_eq!(Quantity::parse_clamped("+2").get(), 2);
        assert_eq!(Quantity::parse_clamped("3 pcs").get(), 3);
        assert_eq!(Quantity::parse_clamped("2.7").get(), 2);
    }

    #[test]
    fn test_parse_clamped_coerces_to_one() {
        for input in ["0", "-3", "abc", "", "   ", "-", "+", "-0"] {
            assert_eq!(Quantity::parse_clamped(input), Quantity::ONE, "{input:?}");
        }
    }

    #[test]
    fn test_parse_clamped_saturates() {
        assert_eq!(Quantity::parse_clamped("99999999999").get(), u32::MAX);
    }

    #[test]
    fn test_line_total() {
        let item = LineItem::new(
            ProductId::parse("p1").unwrap(),
            "Widget",
            Price::new(1000),
            Quantity::new(3).unwrap(),
        );
        assert_eq!(item.line_total(), Price::new(3000));
    }

    #[test]
    fn test_slot_encoding() {
        let item = LineItem::new(
            ProductId::parse("p1").unwrap(),
            "Widget",
            Price::new(1000),
            Quantity::new(3).unwrap(),
        );
        let json = serde_json::to_string(&item).unwrap();
        assert_eq!(json, r#"{"id":"p1","name":"Widget","price":1000,"qty":3}"#);
    }

    #[test]
    fn test_decode_rejects_zero_quantity() {
        let json = r#"{"id":"p1","name":"Widget","price":1000,"qty":0}"#;
        assert!(serde_json::from_str::<LineItem>(json).is_err());
    }
}

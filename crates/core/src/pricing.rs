//! Pricing engine.
//!
//! Pure functions over a [`Cart`]. Nothing is cached: every call recomputes
//! from the lines it is given.

use serde::{Deserialize, Serialize};

use crate::cart::Cart;
use crate::types::Price;

/// Subtotal at or above which shipping is free.
pub const DEFAULT_FREE_SHIPPING_THRESHOLD: Price = Price::new(2000);

/// Flat shipping fee charged below the threshold.
pub const DEFAULT_FLAT_SHIPPING_FEE: Price = Price::new(150);

/// Sum of price × quantity over every line.
#[must_use]
pub fn subtotal(cart: &Cart) -> Price {
    cart.iter().map(crate::types::LineItem::line_total).sum()
}

/// Flat-rate shipping with a free-shipping threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingPolicy {
    /// Subtotal at or above which shipping is free (inclusive).
    pub free_threshold: Price,
    /// Fee charged when the subtotal is below the threshold.
    pub flat_fee: Price,
}

impl Default for ShippingPolicy {
    fn default() -> Self {
        Self {
            free_threshold: DEFAULT_FREE_SHIPPING_THRESHOLD,
            flat_fee: DEFAULT_FLAT_SHIPPING_FEE,
        }
    }
}

impl ShippingPolicy {
    /// Create a policy.
    #[must_use]
    pub const fn new(free_threshold: Price, flat_fee: Price) -> Self {
        Self {
            free_threshold,
            flat_fee,
        }
    }

    /// Shipping charged for a given subtotal.
    #[must_use]
    pub fn shipping_cost(&self, subtotal: Price) -> Price {
        if subtotal >= self.free_threshold {
            Price::ZERO
        } else {
            self.flat_fee
        }
    }

    /// Subtotal plus shipping.
    #[must_use]
    pub fn total(&self, cart: &Cart) -> Price {
        self.quote(cart).total
    }

    /// Compute subtotal, shipping and total in one pass.
    #[must_use]
    pub fn quote(&self, cart: &Cart) -> CartTotals {
        let subtotal = subtotal(cart);
        let shipping = self.shipping_cost(subtotal);
        CartTotals {
            subtotal,
            shipping,
            total: subtotal.plus(shipping),
        }
    }
}

/// Summary amounts shown under the cart and checkout item lists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartTotals {
    pub subtotal: Price,
    pub shipping: Price,
    pub total: Price,
}

impl CartTotals {
    /// Returns `true` when no shipping fee applies.
    #[must_use]
    pub const fn is_free_shipping(&self) -> bool {
        self.shipping.is_zero()
    }
}

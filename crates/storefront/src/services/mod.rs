//! Business logic services for storefront.
//!
//! # Services
//!
//! - `checkout` - Checkout phases and order placement

pub mod checkout;

pub use checkout::{Checkout, CheckoutError, OrderReceipt, SubmitOutcome};

//! ShopEase Core - Cart, pricing and checkout rules.
//!
//! This crate provides the state-bearing rules of the ShopEase storefront:
//! - `storefront` - The session-scoped storefront built on these rules
//! - `integration-tests` - End-to-end checks of the cart and checkout flow
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no session
//! access, no HTTP. Persistence and rendering live in the storefront crate.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for product IDs, prices, quantities and emails
//! - [`cart`] - The ordered id → line item mapping
//! - [`pricing`] - Subtotal, shipping and total computation
//! - [`checkout`] - Checkout form validation and phases

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod checkout;
pub mod pricing;
pub mod types;

pub use cart::Cart;
pub use checkout::{CheckoutField, CheckoutForm, CheckoutPhase, ValidationError};
pub use pricing::{CartTotals, ShippingPolicy};
pub use types::*;

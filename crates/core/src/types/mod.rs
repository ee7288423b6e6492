//! Core types for ShopEase.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod line_item;
pub mod price;

pub use email::{Email, EmailError};
pub use id::{ProductId, ProductIdError};
pub use line_item::{LineItem, Quantity, QuantityError};
pub use price::{CURRENCY_SYMBOL, Price, PriceError};

//! Page rendering.
//!
//! View models are derived from cart state and the shipping rules; askama
//! templates turn them into HTML. Nothing in here mutates the cart.

pub mod cart;
pub mod checkout;
pub mod home;

pub use cart::{CartContentsTemplate, CartCountTemplate, CartShowTemplate, CartView, SummaryView};
pub use checkout::{CheckoutFormView, CheckoutShowTemplate, CheckoutSummaryView};
pub use home::{HomeTemplate, ProductView};

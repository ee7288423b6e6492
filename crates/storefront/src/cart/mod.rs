//! Cart management.
//!
//! - [`storage`] - Fixed slot layout and the key/value surface it lives on
//! - [`store`] - Loading and saving the cart through the slots
//! - [`badge`] - Item-count notifications for cart badges
//! - [`actions`] - Add, update and remove operations
//! - [`session`] - Moving slots between the HTTP session and a store

pub mod actions;
pub mod badge;
pub mod session;
pub mod storage;
pub mod store;

pub use badge::{BadgeBroadcaster, BadgeSync, BadgeUpdate, CartListener};
pub use session::SessionCart;
pub use storage::{MemoryStorage, SlotLayout, SlotStorage};
pub use store::{CartStore, CartStoreError};

//! Cart mutations triggered from the storefront pages.
//!
//! Each action loads the cart, changes it and saves it back through the
//! store, so badge listeners see every change.

use shopease_core::{LineItem, ProductId, Quantity};

use super::storage::SlotStorage;
use super::store::{CartStore, CartStoreError};

/// Add a product, merging quantity into an existing line.
///
/// # Errors
///
/// Returns [`CartStoreError::CapacityExceeded`] if the product is new and
/// every slot is taken. The stored cart is unchanged in that case.
pub fn add_item<S: SlotStorage>(
    store: &mut CartStore<S>,
    item: LineItem,
) -> Result<(), CartStoreError> {
    let mut cart = store.load();
    cart.add(item);
    store.save(&cart)
}

/// Set a line's quantity from raw user input.
///
/// The input is clamped with [`Quantity::parse_clamped`], so anything that
/// is not a positive number stores 1. Returns `false` without saving if the
/// product is not in the cart.
///
/// # Errors
///
/// Propagates store errors.
pub fn update_quantity<S: SlotStorage>(
    store: &mut CartStore<S>,
    id: &ProductId,
    raw_quantity: &str,
) -> Result<bool, CartStoreError> {
    let qty = Quantity::parse_clamped(raw_quantity);
    let mut cart = store.load();
    if !cart.set_quantity(id, qty) {
        return Ok(false);
    }
    store.save(&cart)?;
    Ok(true)
}

/// Remove a line.
///
/// The cart is saved even when the product was not present.
///
/// # Errors
///
/// Propagates store errors.
pub fn remove_item<S: SlotStorage>(
    store: &mut CartStore<S>,
    id: &ProductId,
) -> Result<bool, CartStoreError> {
    let mut cart = store.load();
    let removed = cart.remove(id).is_some();
    store.save(&cart)?;
    Ok(removed)
}

//! Cart store: the only writer of persisted cart state.

use std::sync::Arc;

use shopease_core::{Cart, LineItem};
use thiserror::Error;

use super::badge::{BadgeSync, CartListener};
use super::storage::{SlotLayout, SlotStorage};

/// Errors returned by [`CartStore::save`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartStoreError {
    /// The cart has more distinct products than there are slots.
    #[error("cart holds {len} products but only {capacity} fit")]
    CapacityExceeded { len: usize, capacity: usize },
    /// A line could not be encoded.
    #[error("failed to encode cart line: {0}")]
    Encode(String),
}

/// Bounded repository of one session's cart.
///
/// Each line item lives in its own slot (see [`SlotLayout`]). Loading reads
/// the slots in index order; saving rewrites all of them and then notifies
/// the attached [`BadgeSync`].
#[derive(Debug)]
pub struct CartStore<S> {
    storage: S,
    layout: SlotLayout,
    badges: BadgeSync,
}

impl<S: SlotStorage> CartStore<S> {
    /// Create a store over `storage`.
    #[must_use]
    pub fn new(storage: S, layout: SlotLayout) -> Self {
        Self {
            storage,
            layout,
            badges: BadgeSync::new(),
        }
    }

    /// Attach a badge listener, notified after every save.
    pub fn subscribe(&mut self, listener: Arc<dyn CartListener>) {
        self.badges.subscribe(listener);
    }

    /// Slot layout of this store.
    #[must_use]
    pub const fn layout(&self) -> &SlotLayout {
        &self.layout
    }

    /// Underlying storage.
    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Consume the store and return its storage.
    #[must_use]
    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Reconstruct the cart from the slots.
    ///
    /// Empty slots are skipped. A slot that does not decode to a valid line
    /// item is logged and ignored. When two slots hold the same product id
    /// the later slot wins.
    #[must_use]
    pub fn load(&self) -> Cart {
        let mut cart = Cart::new();
        for key in self.layout.keys() {
            let Some(raw) = self.storage.get(&key) else {
                continue;
            };
            if raw.is_empty() {
                continue;
            }
            match serde_json::from_str::<LineItem>(&raw) {
                Ok(item) => {
                    let id = item.id.clone();
                    if cart.insert(item).is_some() {
                        tracing::debug!(slot = %key, product_id = %id, "Duplicate cart slot replaced earlier entry");
                    }
                }
                Err(e) => {
                    tracing::warn!(slot = %key, error = %e, "Ignoring unreadable cart slot");
                }
            }
        }
        cart
    }

    /// Persist `cart`, replacing whatever the slots held.
    ///
    /// Every slot is cleared first, then lines are written to consecutive
    /// slots from index 0 in cart order. Badge listeners receive the item
    /// count read back from storage.
    ///
    /// # Errors
    ///
    /// Returns [`CartStoreError::CapacityExceeded`] if the cart has more
    /// lines than slots. Nothing is written in that case.
    pub fn save(&mut self, cart: &Cart) -> Result<(), CartStoreError> {
        let capacity = self.layout.capacity();
        if cart.len() > capacity {
            return Err(CartStoreError::CapacityExceeded {
                len: cart.len(),
                capacity,
            });
        }

        let encoded = cart
            .iter()
            .map(serde_json::to_string)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| CartStoreError::Encode(e.to_string()))?;

        for key in self.layout.keys() {
            self.storage.remove(&key);
        }
        for (index, value) in encoded.into_iter().enumerate() {
            self.storage.set(&self.layout.key(index), value);
        }

        self.badges.publish(self.item_count());
        Ok(())
    }

    /// Empty the cart. Used when an order is placed.
    pub fn clear(&mut self) {
        if let Err(e) = self.save(&Cart::new()) {
            // An empty cart always fits.
            tracing::error!(error = %e, "Failed to clear cart");
        }
    }

    /// Total quantity across stored lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.load().total_quantity()
    }
}

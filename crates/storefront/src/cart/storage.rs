//! Slot storage backing the cart store.
//!
//! The cart is persisted as a fixed number of string slots rather than one
//! blob. [`SlotLayout`] names the slots; [`SlotStorage`] is the key/value
//! surface they are written to.

use std::collections::HashMap;

/// Default slot key prefix.
pub const DEFAULT_SLOT_PREFIX: &str = "shopease_cart";

/// Default number of slots (the maximum number of distinct products).
pub const DEFAULT_SLOT_CAPACITY: usize = 50;

/// Synchronous string key/value storage, scoped to one browsing session.
pub trait SlotStorage {
    /// Read the value stored under `key`.
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: String);

    /// Delete the value stored under `key`.
    fn remove(&mut self, key: &str);
}

/// In-memory [`SlotStorage`].
///
/// Used as the per-request snapshot of the session's slots and as the
/// storage for tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    /// Create empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SlotStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.entries.insert(key.to_owned(), value);
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

/// Names and count of the fixed cart slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotLayout {
    prefix: String,
    capacity: usize,
}

impl SlotLayout {
    /// Create a layout with `capacity` slots named `{prefix}_{index}`.
    #[must_use]
    pub fn new(prefix: impl Into<String>, capacity: usize) -> Self {
        Self {
            prefix: prefix.into(),
            capacity,
        }
    }

    /// Number of slots, i.e. the maximum number of distinct products.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Key prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Key of the slot at `index`.
    #[must_use]
    pub fn key(&self, index: usize) -> String {
        format!("{}_{index}", self.prefix)
    }

    /// Keys of every slot, in index order.
    pub fn keys(&self) -> impl Iterator<Item = String> + '_ {
        (0..self.capacity).map(|index| self.key(index))
    }
}

impl Default for SlotLayout {
    fn default() -> Self {
        Self::new(DEFAULT_SLOT_PREFIX, DEFAULT_SLOT_CAPACITY)
    }
}

//! The shopper's cart: an ordered mapping from product id to line item.

use crate::types::{LineItem, ProductId, Quantity};

/// Line items keyed by product id, in insertion order.
///
/// No two lines share an id. Iteration order is the order lines were first
/// inserted, which is also the order the cart store writes them back.
/// Replacing an existing line keeps its position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the cart holds no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up a line by product id.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&LineItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Returns `true` if the product is in the cart.
    #[must_use]
    pub fn contains(&self, id: &ProductId) -> bool {
        self.get(id).is_some()
    }

    /// Iterate over lines in display order.
    pub fn iter(&self) -> std::slice::Iter<'_, LineItem> {
        self.items.iter()
    }

    /// Insert a line, replacing any line with the same id in place.
    ///
    /// Returns the replaced line.
    pub fn insert(&mut self, item: LineItem) -> Option<LineItem> {
        match self.items.iter_mut().find(|existing| existing.id == item.id) {
            Some(existing) => Some(std::mem::replace(existing, item)),
            None => {
                self.items.push(item);
                None
            }
        }
    }

    /// Add a product to the cart.
    ///
    /// If the product is already present its quantity grows by `item.qty`
    /// and the stored name and price are kept. Otherwise the line is
    /// appended.
    pub fn add(&mut self, item: LineItem) {
        match self.items.iter_mut().find(|existing| existing.id == item.id) {
            Some(existing) => existing.qty = existing.qty.saturating_add(item.qty),
            None => self.items.push(item),
        }
    }

    /// Set the quantity of an existing line.
    ///
    /// Returns `false` if the product is not in the cart.
    pub fn set_quantity(&mut self, id: &ProductId, qty: Quantity) -> bool {
        match self.items.iter_mut().find(|item| &item.id == id) {
            Some(item) => {
                item.qty = qty;
                true
            }
            None => false,
        }
    }

    /// Remove a line by product id.
    pub fn remove(&mut self, id: &ProductId) -> Option<LineItem> {
        let index = self.items.iter().position(|item| &item.id == id)?;
        Some(self.items.remove(index))
    }

    /// Total units across all lines (the badge count).
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.qty.get())).sum()
    }
}

impl FromIterator<LineItem> for Cart {
    /// Later lines with a repeated id replace earlier ones.
    fn from_iter<I: IntoIterator<Item = LineItem>>(iter: I) -> Self {
        let mut cart = Self::new();
        for item in iter {
            cart.insert(item);
        }
        cart
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a LineItem;
    type IntoIter = std::slice::Iter<'a, LineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

//! Application state shared across handlers.

use std::sync::Arc;

use shopease_core::ShippingPolicy;

use crate::cart::{BadgeBroadcaster, SlotLayout};
use crate::config::StorefrontConfig;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// configuration and the cross-tab badge channel.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    slot_layout: SlotLayout,
    badges: BadgeBroadcaster,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let slot_layout = config.cart.slot_layout();
        Self {
            inner: Arc::new(AppStateInner {
                config,
                slot_layout,
                badges: BadgeBroadcaster::new(),
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Slot layout of every session's cart.
    #[must_use]
    pub fn slot_layout(&self) -> &SlotLayout {
        &self.inner.slot_layout
    }

    /// Shipping rules.
    #[must_use]
    pub fn shipping(&self) -> &ShippingPolicy {
        &self.inner.config.cart.shipping
    }

    /// Cross-tab badge update channel.
    #[must_use]
    pub fn badges(&self) -> &BadgeBroadcaster {
        &self.inner.badges
    }
}

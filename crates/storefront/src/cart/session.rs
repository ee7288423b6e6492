//! Cart slots kept in the HTTP session.
//!
//! The session is the browsing-session scope: each slot key of the
//! [`SlotLayout`] is a session key. A request copies the slots into a
//! [`MemoryStorage`] snapshot, works on it synchronously through the
//! [`CartStore`], and writes the snapshot back before responding.

use std::sync::{Arc, Mutex, PoisonError};

use tower_sessions::Session;
use tower_sessions::session::Error as SessionError;

use super::badge::{BadgeBroadcaster, BadgeUpdate, CartListener};
use super::storage::{MemoryStorage, SlotLayout, SlotStorage};
use super::store::CartStore;

/// Copy the cart slots out of the session.
///
/// A slot whose session value is not a string is logged and left empty.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn read_slots(
    session: &Session,
    layout: &SlotLayout,
) -> Result<MemoryStorage, SessionError> {
    let mut storage = MemoryStorage::new();
    for key in layout.keys() {
        match session.get::<String>(&key).await {
            Ok(Some(value)) => storage.set(&key, value),
            Ok(None) => {}
            Err(SessionError::SerdeJson(e)) => {
                tracing::warn!(slot = %key, error = %e, "Ignoring malformed session slot");
            }
            Err(e) => return Err(e),
        }
    }
    Ok(storage)
}

/// Write the cart slots back into the session.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn write_slots(
    session: &Session,
    layout: &SlotLayout,
    storage: &MemoryStorage,
) -> Result<(), SessionError> {
    for key in layout.keys() {
        match storage.get(&key) {
            Some(value) => session.insert(&key, value).await?,
            None => {
                session.remove_value(&key).await?;
            }
        }
    }
    Ok(())
}

/// Identifier used to route badge updates to a session's other tabs.
///
/// `None` until the session has been saved once.
#[must_use]
pub fn badge_key(session: &Session) -> Option<String> {
    session.id().map(|id| id.to_string())
}

/// Latest count published by the store, held until the session is written.
#[derive(Default)]
struct PendingBadge {
    count: Mutex<Option<u64>>,
}

impl PendingBadge {
    fn take(&self) -> Option<u64> {
        self.count
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}

impl CartListener for PendingBadge {
    fn cart_changed(&self, item_count: u64) {
        *self.count.lock().unwrap_or_else(PoisonError::into_inner) = Some(item_count);
    }
}

/// Where a session's badge counts go once committed.
struct BadgeRoute {
    key: String,
    pending: Arc<PendingBadge>,
    badges: BadgeBroadcaster,
}

/// A cart store opened on the current request's session.
pub struct SessionCart {
    session: Session,
    store: CartStore<MemoryStorage>,
    badge: Option<BadgeRoute>,
}

impl SessionCart {
    /// Load the session's slots and attach the cross-tab badge listener.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn open(
        session: Session,
        layout: &SlotLayout,
        badges: &BadgeBroadcaster,
    ) -> Result<Self, SessionError> {
        let storage = read_slots(&session, layout).await?;
        let mut store = CartStore::new(storage, layout.clone());
        let badge = badge_key(&session).map(|key| {
            let pending = Arc::new(PendingBadge::default());
            store.subscribe(pending.clone());
            BadgeRoute {
                key,
                pending,
                badges: badges.clone(),
            }
        });
        Ok(Self {
            session,
            store,
            badge,
        })
    }

    /// The store for reading.
    #[must_use]
    pub const fn store(&self) -> &CartStore<MemoryStorage> {
        &self.store
    }

    /// The store for mutation.
    pub fn store_mut(&mut self) -> &mut CartStore<MemoryStorage> {
        &mut self.store
    }

    /// Write the slots back into the session, then tell the session's other
    /// tabs the new badge count.
    ///
    /// Nothing is broadcast if the write fails.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn commit(&self) -> Result<(), SessionError> {
        write_slots(&self.session, self.store.layout(), self.store.storage()).await?;
        if let Some(route) = &self.badge {
            if let Some(count) = route.pending.take() {
                route.badges.send(BadgeUpdate {
                    session: route.key.clone(),
                    count,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use shopease_core::{LineItem, Price, ProductId, Quantity};
    use tower_sessions::MemoryStore;

    use super::*;
    use crate::cart::actions;

    fn session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    #[tokio::test]
    async fn test_slots_round_trip_through_session() {
        let session = session();
        let layout = SlotLayout::new("shopease_cart", 3);
        let badges = BadgeBroadcaster::new();

        let mut cart = SessionCart::open(session.clone(), &layout, &badges)
            .await
            .unwrap();
        actions::add_item(
            cart.store_mut(),
            LineItem::new(
                ProductId::parse("p1").unwrap(),
                "Widget",
                Price::new(1000),
                Quantity::new(2).unwrap(),
            ),
        )
        .unwrap();
        cart.commit().await.unwrap();

        assert!(session.get::<String>("shopease_cart_0").await.unwrap().is_some());

        let reopened = SessionCart::open(session, &layout, &badges).await.unwrap();
        assert_eq!(reopened.store().item_count(), 2);
    }

    #[tokio::test]
    async fn test_write_slots_removes_cleared_keys() {
        let session = session();
        let layout = SlotLayout::new("shopease_cart", 2);
        session
            .insert("shopease_cart_1", "stale".to_string())
            .await
            .unwrap();

        write_slots(&session, &layout, &MemoryStorage::new())
            .await
            .unwrap();

        assert!(session.get::<String>("shopease_cart_1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_non_string_slot_is_skipped() {
        let session = session();
        let layout = SlotLayout::new("shopease_cart", 2);
        session.insert("shopease_cart_0", 42_u32).await.unwrap();

        let storage = read_slots(&session, &layout).await.unwrap();
        assert!(storage.is_empty());
    }

    async fn saved_session(store: &Arc<MemoryStore>) -> Session {
        let session = Session::new(None, store.clone(), None);
        session.insert("visited", true).await.unwrap();
        session.save().await.unwrap();
        Session::new(session.id(), store.clone(), None)
    }

    fn widget(qty: u32) -> LineItem {
        LineItem::new(
            ProductId::parse("p1").unwrap(),
            "Widget",
            Price::new(1000),
            Quantity::new(qty).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_badge_sent_only_after_commit() {
        let store = Arc::new(MemoryStore::default());
        let session = saved_session(&store).await;
        let layout = SlotLayout::new("shopease_cart", 3);
        let badges = BadgeBroadcaster::new();
        let mut rx = badges.subscribe();

        let mut cart = SessionCart::open(session.clone(), &layout, &badges)
            .await
            .unwrap();
        actions::add_item(cart.store_mut(), widget(3)).unwrap();
        assert!(rx.try_recv().is_err());

        cart.commit().await.unwrap();
        let update = rx.try_recv().unwrap();
        assert_eq!(update.count, 3);
        assert_eq!(Some(update.session), badge_key(&session));
    }

    #[tokio::test]
    async fn test_commit_without_changes_sends_nothing() {
        let store = Arc::new(MemoryStore::default());
        let session = saved_session(&store).await;
        let layout = SlotLayout::new("shopease_cart", 3);
        let badges = BadgeBroadcaster::new();
        let mut rx = badges.subscribe();

        let cart = SessionCart::open(session, &layout, &badges).await.unwrap();
        cart.commit().await.unwrap();

        assert!(rx.try_recv().is_err());
    }
}

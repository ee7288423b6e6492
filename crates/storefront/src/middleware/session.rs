//! Session middleware configuration.
//!
//! Sets up in-memory, browser-session-scoped sessions using tower-sessions.
//! The cookie carries no expiry, so the cart disappears when the browser
//! session ends. Records live in a bounded [`SessionCache`] and are evicted
//! after sitting idle, so closed browsers do not pin memory.

use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use tower_sessions::session::{Id, Record};
use tower_sessions::session_store;
use tower_sessions::{Expiry, SessionManagerLayer, SessionStore};

use crate::config::{SessionConfig, StorefrontConfig};

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "shopease_session";

/// In-memory session store with a size bound and an idle timeout.
#[derive(Debug, Clone)]
pub struct SessionCache {
    cache: Cache<Id, Record>,
}

impl SessionCache {
    /// Create a cache holding at most `capacity` sessions, each dropped after
    /// `idle_timeout` without a request.
    #[must_use]
    pub fn new(capacity: u64, idle_timeout: Duration) -> Self {
        Self {
            cache: Cache::builder()
                .max_capacity(capacity)
                .time_to_idle(idle_timeout)
                .build(),
        }
    }

    /// Create a cache from the session configuration.
    #[must_use]
    pub fn from_config(config: &SessionConfig) -> Self {
        Self::new(config.capacity, config.idle_timeout)
    }
}

#[async_trait]
impl SessionStore for SessionCache {
    async fn create(&self, record: &mut Record) -> session_store::Result<()> {
        while self.cache.contains_key(&record.id) {
            record.id = Id::default();
        }
        self.cache.insert(record.id, record.clone()).await;
        Ok(())
    }

    async fn save(&self, record: &Record) -> session_store::Result<()> {
        self.cache.insert(record.id, record.clone()).await;
        Ok(())
    }

    async fn load(&self, session_id: &Id) -> session_store::Result<Option<Record>> {
        Ok(self.cache.get(session_id).await)
    }

    async fn delete(&self, session_id: &Id) -> session_store::Result<()> {
        self.cache.invalidate(session_id).await;
        Ok(())
    }
}

/// Create the session layer backed by a [`SessionCache`].
///
/// # Arguments
///
/// * `config` - Storefront configuration (for cookie security and cache bounds)
#[must_use]
pub fn create_session_layer(config: &StorefrontConfig) -> SessionManagerLayer<SessionCache> {
    let store = SessionCache::from_config(&config.session);

    // Determine if we're in production (HTTPS)
    let is_secure = config.base_url.starts_with("https://");

    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnSessionEnd)
        .with_secure(is_secure)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::Session;

    use super::*;

    async fn saved_session(store: &SessionCache) -> Id {
        let session = Session::new(None, Arc::new(store.clone()), None);
        session.insert("shopease_cart_0", "line".to_string()).await.unwrap();
        session.save().await.unwrap();
        session.id().unwrap()
    }

    async fn slot(store: &SessionCache, id: Id) -> Option<String> {
        Session::new(Some(id), Arc::new(store.clone()), None)
            .get::<String>("shopease_cart_0")
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_saved_session_reloads() {
        let store = SessionCache::new(10, Duration::from_secs(60));
        let id = saved_session(&store).await;
        assert_eq!(slot(&store, id).await.as_deref(), Some("line"));
    }

    #[tokio::test]
    async fn test_capacity_bounds_records() {
        let store = SessionCache::new(2, Duration::from_secs(60));
        for _ in 0..6 {
            saved_session(&store).await;
        }

        store.cache.run_pending_tasks().await;
        assert!(store.cache.entry_count() <= 2);
    }

    #[tokio::test]
    async fn test_idle_session_dropped() {
        let store = SessionCache::new(10, Duration::from_millis(50));
        let id = saved_session(&store).await;

        tokio::time::sleep(Duration::from_millis(150)).await;

        assert!(slot(&store, id).await.is_none());
    }

    #[tokio::test]
    async fn test_delete_removes_record() {
        let store = SessionCache::new(10, Duration::from_secs(60));
        let id = saved_session(&store).await;

        store.delete(&id).await.unwrap();

        assert!(slot(&store, id).await.is_none());
    }

    #[test]
    fn test_layer_from_default_config() {
        let _layer = create_session_layer(&StorefrontConfig::default());
    }
}

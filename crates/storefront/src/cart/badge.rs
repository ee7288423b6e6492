//! Cart badge sync.
//!
//! The cart store publishes the recomputed item count to every subscribed
//! [`CartListener`] after each save. [`BadgeBroadcaster`] carries those
//! counts to other browsing contexts (tabs) of the same session, which only
//! refresh their badges, never the cart view.

use std::fmt;
use std::sync::Arc;

use futures::Stream;
use tokio::sync::broadcast;

/// Buffered badge updates per subscriber before older ones are skipped.
const BROADCAST_CAPACITY: usize = 64;

/// Observer notified whenever the stored cart changes.
pub trait CartListener: Send + Sync {
    /// Called with the total quantity across all stored lines.
    fn cart_changed(&self, item_count: u64);
}

/// The set of listeners attached to one cart store.
#[derive(Clone, Default)]
pub struct BadgeSync {
    listeners: Vec<Arc<dyn CartListener>>,
}

impl BadgeSync {
    /// Create a sync with no listeners.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a listener.
    pub fn subscribe(&mut self, listener: Arc<dyn CartListener>) {
        self.listeners.push(listener);
    }

    /// Number of attached listeners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Returns `true` if no listener is attached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Notify every listener of the new item count.
    pub fn publish(&self, item_count: u64) {
        for listener in &self.listeners {
            listener.cart_changed(item_count);
        }
    }
}

impl fmt::Debug for BadgeSync {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BadgeSync")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// A badge count change for one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadgeUpdate {
    /// Session the cart belongs to.
    pub session: String,
    /// New total quantity.
    pub count: u64,
}

/// Fan-out of badge updates across browsing contexts.
///
/// Cheaply cloneable; all clones share one channel.
#[derive(Debug, Clone)]
pub struct BadgeBroadcaster {
    tx: broadcast::Sender<BadgeUpdate>,
}

impl Default for BadgeBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

impl BadgeBroadcaster {
    /// Create a broadcaster.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self { tx }
    }

    /// Publish an update. Dropped silently when nobody is listening.
    pub fn send(&self, update: BadgeUpdate) {
        if self.tx.send(update).is_err() {
            tracing::trace!("No badge subscribers");
        }
    }

    /// Subscribe to every update.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<BadgeUpdate> {
        self.tx.subscribe()
    }

    /// Stream of counts for one session.
    ///
    /// A subscriber that falls behind skips to the most recent updates. The
    /// stream ends when every broadcaster clone is dropped.
    pub fn updates_for(&self, session: String) -> impl Stream<Item = u64> + Send + 'static {
        futures::stream::unfold(
            (self.subscribe(), session),
            |(mut rx, session)| async move {
                loop {
                    match rx.recv().await {
                        Ok(update) if update.session == session => {
                            return Some((update.count, (rx, session)));
                        }
                        Ok(_) => {}
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            tracing::debug!(skipped, "Badge subscriber lagged");
                        }
                        Err(broadcast::error::RecvError::Closed) => return None,
                    }
                }
            },
        )
    }
}

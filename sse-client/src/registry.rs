//! In-memory registry of open subscriptions, scoped to one node instance.

use crate::error::Error;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use log::*;
use tokio::task::JoinHandle;

/// One open event-stream subscription.
///
/// The spawned stream task is the connection's owner: aborting the task
/// drops the underlying client, which closes the connection.
#[derive(Debug)]
pub struct Subscription {
    id: String,
    url: String,
    handle: JoinHandle<()>,
}

impl Subscription {
    pub fn new(id: impl Into<String>, url: impl Into<String>, handle: JoinHandle<()>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            handle,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Close the underlying connection by aborting the stream task.
    ///
    /// A no-op when the task has already finished on its own.
    pub fn close(&self) {
        debug!("closing event stream to {}", self.url);
        self.handle.abort();
    }
}

/// Map from caller-supplied id to open subscription.
///
/// Invariant: at most one subscription per id. Mutations arrive from the
/// node's input handler and from stream tasks; `DashMap` keeps each entry
/// operation atomic without a lock around the whole registry.
pub struct SubscriptionRegistry {
    subscriptions: DashMap<String, Subscription>,
}

impl SubscriptionRegistry {
    pub fn new() -> Self {
        Self {
            subscriptions: DashMap::new(),
        }
    }

    /// Register a subscription under its id.
    ///
    /// On a duplicate id the offered subscription is closed and an error
    /// returned; the existing entry is left untouched.
    pub fn insert(&self, subscription: Subscription) -> Result<(), Error> {
        match self.subscriptions.entry(subscription.id.clone()) {
            Entry::Occupied(_) => {
                let err = Error::duplicate(&subscription.id);
                subscription.close();
                Err(err)
            }
            Entry::Vacant(entry) => {
                entry.insert(subscription);
                Ok(())
            }
        }
    }

    /// Remove an entry without closing it.
    ///
    /// Used by the stream-error path, where the stream task removes itself
    /// and then winds down on its own.
    pub fn remove(&self, id: &str) -> Option<Subscription> {
        self.subscriptions.remove(id).map(|(_, subscription)| subscription)
    }

    /// Close the connection for `id` and remove it.
    ///
    /// Returns `false` when no such subscription is open.
    pub fn close(&self, id: &str) -> bool {
        match self.remove(id) {
            Some(subscription) => {
                subscription.close();
                true
            }
            None => false,
        }
    }

    /// Close and remove every open subscription. Invoked on node teardown so
    /// redeploying a flow does not leak connections.
    pub fn close_all(&self) {
        let ids: Vec<String> = self
            .subscriptions
            .iter()
            .map(|entry| entry.key().clone())
            .collect();
        for id in ids {
            self.close(&id);
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.subscriptions.contains_key(id)
    }

    pub fn count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Derived status text; never stored.
    pub fn status_text(&self) -> String {
        format!("active clients: {}", self.count())
    }
}

impl Default for SubscriptionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn open_subscription(id: &str) -> Subscription {
        Subscription::new(
            id,
            "http://localhost/stream",
            tokio::spawn(std::future::pending::<()>()),
        )
    }

    #[tokio::test]
    async fn test_count_tracks_inserts() {
        let registry = SubscriptionRegistry::new();
        assert_eq!(registry.count(), 0);
        assert_eq!(registry.status_text(), "active clients: 0");

        registry.insert(open_subscription("a")).unwrap();
        registry.insert(open_subscription("b")).unwrap();
        registry.insert(open_subscription("c")).unwrap();

        assert_eq!(registry.count(), 3);
        assert_eq!(registry.status_text(), "active clients: 3");
    }

    #[tokio::test]
    async fn test_duplicate_id_rejected_and_existing_untouched() {
        let registry = SubscriptionRegistry::new();
        registry.insert(open_subscription("a")).unwrap();

        let err = registry.insert(open_subscription("a")).unwrap_err();
        assert_eq!(err.kind, ErrorKind::DuplicateSubscription("a".to_string()));
        assert!(registry.contains("a"));
        assert_eq!(registry.count(), 1);
    }

    #[tokio::test]
    async fn test_id_free_for_reuse_after_removal() {
        let registry = SubscriptionRegistry::new();
        registry.insert(open_subscription("a")).unwrap();

        let removed = registry.remove("a").unwrap();
        assert_eq!(removed.id(), "a");
        assert!(!registry.contains("a"));

        registry.insert(open_subscription("a")).unwrap();
        assert_eq!(registry.count(), 1);
    }

    #[tokio::test]
    async fn test_close_unknown_id_is_noop() {
        let registry = SubscriptionRegistry::new();
        assert!(!registry.close("missing"));
        assert_eq!(registry.count(), 0);
    }

    #[tokio::test]
    async fn test_close_all_empties_registry() {
        let registry = SubscriptionRegistry::new();
        registry.insert(open_subscription("a")).unwrap();
        registry.insert(open_subscription("b")).unwrap();

        registry.close_all();

        assert_eq!(registry.count(), 0);
        assert_eq!(registry.status_text(), "active clients: 0");
    }
}

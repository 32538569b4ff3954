//! Live product-list synchronization.
//!
//! A [`ProductListSynchronizer`] owns one collection subscription and
//! keeps a sorted snapshot current: on every change notification it
//! re-derives the full document set, sorts it newest-first, and replaces
//! the published snapshot atomically. Consumers watch [`CatalogState`]
//! and never observe a partially-updated list.
//!
//! Each listing view owns its own synchronizer; two views over the same
//! collection run two independent subscriptions with no shared cache.

use tokio::sync::watch;
use tokio::task::JoinHandle;

use parts_pro_core::Product;

use crate::providers::{ChangeFeed, FeedState, SubscriptionError};

/// The published state of a synchronized product list.
///
/// `Failed` is terminal and distinct from `Ready` with an empty snapshot;
/// a broken subscription must never render as "no products".
#[derive(Debug, Clone)]
pub enum CatalogState {
    /// No notification observed yet.
    Loading,
    /// The current snapshot, sorted by creation timestamp descending.
    Ready(Vec<Product>),
    /// The subscription broke; a new synchronizer is required to recover.
    Failed(SubscriptionError),
}

impl CatalogState {
    /// The snapshot, when one is available.
    #[must_use]
    pub fn products(&self) -> Option<&[Product]> {
        match self {
            Self::Ready(products) => Some(products),
            _ => None,
        }
    }
}

/// Sort newest-first by creation timestamp. Documents without a creation
/// timestamp compare below every stamped document, so they sort to the
/// end. The sort is stable, preserving arrival order among ties.
fn sort_newest_first(products: &mut [Product]) {
    products.sort_by(|a, b| b.fields.created_at.cmp(&a.fields.created_at));
}

/// A background task maintaining an always-current sorted snapshot of one
/// product collection.
#[derive(Debug)]
pub struct ProductListSynchronizer {
    state: watch::Receiver<CatalogState>,
    task: JoinHandle<()>,
}

impl ProductListSynchronizer {
    /// Take ownership of an open feed and start synchronizing.
    #[must_use]
    pub fn spawn(feed: ChangeFeed) -> Self {
        let (tx, rx) = watch::channel(CatalogState::Loading);
        let task = tokio::spawn(run(feed, tx));
        Self { state: rx, task }
    }

    /// A handle for observing snapshot updates.
    #[must_use]
    pub fn state(&self) -> watch::Receiver<CatalogState> {
        self.state.clone()
    }

    /// The latest published state.
    #[must_use]
    pub fn current(&self) -> CatalogState {
        self.state.borrow().clone()
    }

    /// Stop synchronizing and release the subscription.
    ///
    /// Completes only after the task is gone, so a notification racing in
    /// during teardown can no longer be observed and a replacement
    /// synchronizer never overlaps with this one's subscription.
    pub async fn shutdown(mut self) {
        self.task.abort();
        let _ = (&mut self.task).await;
    }
}

impl Drop for ProductListSynchronizer {
    fn drop(&mut self) {
        // Last-resort teardown for the non-shutdown exit paths.
        self.task.abort();
    }
}

async fn run(mut feed: ChangeFeed, tx: watch::Sender<CatalogState>) {
    loop {
        match feed.latest() {
            FeedState::Documents(mut products) => {
                sort_newest_first(&mut products);
                tx.send_replace(CatalogState::Ready(products));
            }
            FeedState::Failed(err) => {
                tracing::error!(error = %err, "product subscription failed");
                tx.send_replace(CatalogState::Failed(err));
                return;
            }
        }
        if feed.changed().await.is_err() {
            // Publisher went away without a failure notification.
            return;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use chrono::{TimeZone, Utc};

    use parts_pro_core::{Price, ProductFields, ProductId, UserId};

    use crate::providers::memory::MemoryCollection;
    use crate::providers::{CollectionClient, CollectionPath};

    fn fields(name: &str, ts: Option<i64>) -> ProductFields {
        ProductFields {
            name: name.to_owned(),
            description: "desc".to_owned(),
            price: Price::parse("10.00").unwrap(),
            image_url: None,
            created_at: ts.map(|secs| Utc.timestamp_opt(secs, 0).unwrap()),
            added_by: Some(UserId::new("admin")),
            updated_at: None,
            updated_by: None,
        }
    }

    async fn wait_for<F: Fn(&CatalogState) -> bool>(
        rx: &mut watch::Receiver<CatalogState>,
        pred: F,
    ) -> CatalogState {
        loop {
            {
                let state = rx.borrow_and_update();
                if pred(&state) {
                    return state.clone();
                }
            }
            rx.changed().await.unwrap();
        }
    }

    fn names(state: &CatalogState) -> Vec<String> {
        state
            .products()
            .unwrap_or_default()
            .iter()
            .map(|p| p.fields.name.clone())
            .collect()
    }

    #[test]
    fn test_sort_missing_timestamps_last() {
        let mut products = vec![
            Product {
                id: ProductId::new("c"),
                fields: fields("no-ts", None),
            },
            Product {
                id: ProductId::new("a"),
                fields: fields("old", Some(1)),
            },
            Product {
                id: ProductId::new("b"),
                fields: fields("new", Some(2)),
            },
        ];
        sort_newest_first(&mut products);
        let order: Vec<_> = products.iter().map(|p| p.fields.name.as_str()).collect();
        assert_eq!(order, ["new", "old", "no-ts"]);
    }

    #[tokio::test]
    async fn test_back_to_back_notifications_end_sorted() {
        let collection = MemoryCollection::new();
        let path = CollectionPath::products("t");

        collection.seed(&path, "a", fields("A", Some(1)));
        let sync = ProductListSynchronizer::spawn(collection.subscribe(&path));
        let mut rx = sync.state();

        wait_for(&mut rx, |s| names(s) == ["A"]).await;

        collection.seed(&path, "b", fields("B", Some(2)));
        let state = wait_for(&mut rx, |s| names(s).len() == 2).await;
        assert_eq!(names(&state), ["B", "A"]);

        sync.shutdown().await;
    }

    #[tokio::test]
    async fn test_empty_collection_is_ready_not_failed() {
        let collection = MemoryCollection::new();
        let path = CollectionPath::products("t");

        let sync = ProductListSynchronizer::spawn(collection.subscribe(&path));
        let mut rx = sync.state();
        let state = wait_for(&mut rx, |s| !matches!(s, CatalogState::Loading)).await;
        assert!(matches!(state, CatalogState::Ready(ref p) if p.is_empty()));

        sync.shutdown().await;
    }

    #[tokio::test]
    async fn test_subscription_failure_is_terminal() {
        let collection = MemoryCollection::new();
        let path = CollectionPath::products("t");

        let sync = ProductListSynchronizer::spawn(collection.subscribe(&path));
        let mut rx = sync.state();
        wait_for(&mut rx, |s| !matches!(s, CatalogState::Loading)).await;

        collection.fail_subscriptions(&path, "service unreachable");
        let state = wait_for(&mut rx, |s| matches!(s, CatalogState::Failed(_))).await;
        assert!(matches!(state, CatalogState::Failed(_)));

        sync.shutdown().await;
    }

    #[tokio::test]
    async fn test_shutdown_releases_subscription() {
        let collection = MemoryCollection::new();
        let path = CollectionPath::products("t");

        let sync = ProductListSynchronizer::spawn(collection.subscribe(&path));
        assert_eq!(collection.subscriber_count(&path), 1);

        let rx = sync.state();
        sync.shutdown().await;
        assert_eq!(collection.subscriber_count(&path), 0);

        // Mutations after teardown never reach the stale receiver.
        collection.seed(&path, "late", fields("late", Some(9)));
        assert!(matches!(
            &*rx.borrow(),
            CatalogState::Loading | CatalogState::Ready(_)
        ));
        assert!(rx.borrow().products().is_none_or(|p| p.is_empty()));
    }

    #[tokio::test]
    async fn test_two_instances_have_independent_subscriptions() {
        let collection = MemoryCollection::new();
        let path = CollectionPath::products("t");

        let catalog = ProductListSynchronizer::spawn(collection.subscribe(&path));
        let manage = ProductListSynchronizer::spawn(collection.subscribe(&path));
        assert_eq!(collection.subscriber_count(&path), 2);

        collection.seed(&path, "a", fields("A", Some(1)));
        let mut catalog_rx = catalog.state();
        let mut manage_rx = manage.state();
        wait_for(&mut catalog_rx, |s| names(s) == ["A"]).await;
        wait_for(&mut manage_rx, |s| names(s) == ["A"]).await;

        // Tearing one down leaves the other live.
        manage.shutdown().await;
        assert_eq!(collection.subscriber_count(&path), 1);

        collection.seed(&path, "b", fields("B", Some(2)));
        let state = wait_for(&mut catalog_rx, |s| names(s).len() == 2).await;
        assert_eq!(names(&state), ["B", "A"]);

        catalog.shutdown().await;
    }
}

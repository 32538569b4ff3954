//! In-memory implementations of the capability traits.
//!
//! These stand in for the hosted services the same way a repository wraps
//! a database: the rest of the store is written against the traits and
//! cannot tell the difference. Tests lean on the extra instrumentation
//! (call counters, raw seeding, fault injection) to assert properties like
//! "validation failure issues zero storage calls".

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::watch;
use uuid::Uuid;

use parts_pro_core::{
    Email, Product, ProductFields, ProductId, ProductPatch, Session, UserId,
};

use super::{
    ChangeFeed, CollectionClient, CollectionError, CollectionPath, CredentialError, FeedState,
    SessionProvider, SubscriptionError, SubscriptionGuard,
};

// =============================================================================
// Sessions
// =============================================================================

struct Account {
    email: Email,
    password: String,
    uid: UserId,
}

/// An in-memory session provider backed by a fixed account table.
pub struct MemorySessions {
    accounts: Mutex<Vec<Account>>,
    tx: watch::Sender<Session>,
    rate_limited: AtomicBool,
    fail_sign_out: AtomicBool,
}

impl MemorySessions {
    /// A provider with no accounts, reporting `Anonymous`.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Session::Anonymous);
        Self {
            accounts: Mutex::new(Vec::new()),
            tx,
            rate_limited: AtomicBool::new(false),
            fail_sign_out: AtomicBool::new(false),
        }
    }

    /// Register an account the provider will accept.
    ///
    /// # Panics
    ///
    /// Panics if `email` is not a well-formed address; accounts are test
    /// fixtures, not user input.
    pub fn register(&self, email: &str, password: &str, uid: impl Into<UserId>) {
        let email = Email::parse(email).expect("fixture email must be valid");
        self.accounts
            .lock()
            .expect("account table lock poisoned")
            .push(Account {
                email,
                password: password.to_owned(),
                uid: uid.into(),
            });
    }

    /// Make subsequent sign-in attempts fail with `RateLimited`.
    pub fn set_rate_limited(&self, limited: bool) {
        self.rate_limited.store(limited, Ordering::SeqCst);
    }

    /// Make subsequent sign-out attempts fail without ending the session.
    pub fn set_sign_out_failure(&self, fail: bool) {
        self.fail_sign_out.store(fail, Ordering::SeqCst);
    }

    /// Push a session state as if it changed provider-side (another tab,
    /// token expiry).
    pub fn force_session(&self, session: Session) {
        self.tx.send_replace(session);
    }
}

impl Default for MemorySessions {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionProvider for MemorySessions {
    async fn sign_in(&self, email: &str, password: &str) -> Result<UserId, CredentialError> {
        if self.rate_limited.load(Ordering::SeqCst) {
            return Err(CredentialError::RateLimited);
        }

        let email = Email::parse(email).map_err(|_| CredentialError::InvalidEmail)?;

        let uid = {
            let accounts = self
                .accounts
                .lock()
                .map_err(|_| CredentialError::Unknown("account table lock poisoned".to_owned()))?;
            accounts
                .iter()
                .find(|account| account.email == email && account.password == password)
                .map(|account| account.uid.clone())
                .ok_or(CredentialError::InvalidCredentials)?
        };

        self.tx.send_replace(Session::Identified(uid.clone()));
        Ok(uid)
    }

    async fn sign_out(&self) -> Result<(), CredentialError> {
        if self.fail_sign_out.load(Ordering::SeqCst) {
            return Err(CredentialError::Unknown("sign-out rejected".to_owned()));
        }
        self.tx.send_replace(Session::Anonymous);
        Ok(())
    }

    fn sessions(&self) -> watch::Receiver<Session> {
        self.tx.subscribe()
    }
}

// =============================================================================
// Collection
// =============================================================================

struct PathState {
    docs: BTreeMap<ProductId, ProductFields>,
    tx: watch::Sender<FeedState>,
    subscribers: Arc<AtomicUsize>,
}

impl PathState {
    fn new() -> Self {
        let (tx, _rx) = watch::channel(FeedState::Documents(Vec::new()));
        Self {
            docs: BTreeMap::new(),
            tx,
            subscribers: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn snapshot(&self) -> Vec<Product> {
        self.docs
            .iter()
            .map(|(id, fields)| Product {
                id: id.clone(),
                fields: fields.clone(),
            })
            .collect()
    }

    fn publish(&self) {
        self.tx.send_replace(FeedState::Documents(self.snapshot()));
    }
}

/// An in-memory document collection with watch-channel change feeds.
pub struct MemoryCollection {
    paths: Mutex<HashMap<String, PathState>>,
    insert_calls: AtomicUsize,
    update_calls: AtomicUsize,
    remove_calls: AtomicUsize,
}

impl MemoryCollection {
    /// An empty collection service.
    #[must_use]
    pub fn new() -> Self {
        Self {
            paths: Mutex::new(HashMap::new()),
            insert_calls: AtomicUsize::new(0),
            update_calls: AtomicUsize::new(0),
            remove_calls: AtomicUsize::new(0),
        }
    }

    fn with_path<T>(&self, path: &CollectionPath, f: impl FnOnce(&mut PathState) -> T) -> T {
        let mut paths = self.paths.lock().expect("collection lock poisoned");
        let state = paths
            .entry(path.as_str().to_owned())
            .or_insert_with(PathState::new);
        f(state)
    }

    /// Seed a document with a caller-chosen identifier, bypassing the
    /// workflow layer. Useful for modeling writes from foreign clients
    /// (e.g. documents without audit fields).
    pub fn seed(&self, path: &CollectionPath, id: impl Into<ProductId>, fields: ProductFields) {
        self.with_path(path, |state| {
            state.docs.insert(id.into(), fields);
            state.publish();
        });
    }

    /// Break every feed on this path with a terminal subscription error.
    pub fn fail_subscriptions(&self, path: &CollectionPath, message: &str) {
        self.with_path(path, |state| {
            state
                .tx
                .send_replace(FeedState::Failed(SubscriptionError(message.to_owned())));
        });
    }

    /// Number of currently open subscriptions on a path.
    #[must_use]
    pub fn subscriber_count(&self, path: &CollectionPath) -> usize {
        self.with_path(path, |state| state.subscribers.load(Ordering::SeqCst))
    }

    /// Total mutation calls accepted (insert + update + remove).
    #[must_use]
    pub fn storage_calls(&self) -> usize {
        self.insert_calls.load(Ordering::SeqCst)
            + self.update_calls.load(Ordering::SeqCst)
            + self.remove_calls.load(Ordering::SeqCst)
    }

    /// Number of insert calls received.
    #[must_use]
    pub fn insert_calls(&self) -> usize {
        self.insert_calls.load(Ordering::SeqCst)
    }

    /// The current fields of a document, if present.
    #[must_use]
    pub fn get(&self, path: &CollectionPath, id: &ProductId) -> Option<ProductFields> {
        self.with_path(path, |state| state.docs.get(id).cloned())
    }
}

impl Default for MemoryCollection {
    fn default() -> Self {
        Self::new()
    }
}

impl CollectionClient for MemoryCollection {
    async fn insert(
        &self,
        path: &CollectionPath,
        fields: ProductFields,
    ) -> Result<ProductId, CollectionError> {
        self.insert_calls.fetch_add(1, Ordering::SeqCst);
        let id = ProductId::new(Uuid::new_v4().to_string());
        self.with_path(path, |state| {
            state.docs.insert(id.clone(), fields);
            state.publish();
        });
        Ok(id)
    }

    async fn update(
        &self,
        path: &CollectionPath,
        id: &ProductId,
        patch: ProductPatch,
    ) -> Result<(), CollectionError> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        self.with_path(path, |state| {
            let fields = state.docs.get_mut(id).ok_or(CollectionError::NotFound)?;
            fields.name = patch.name;
            fields.description = patch.description;
            fields.price = patch.price;
            fields.image_url = patch.image_url;
            fields.updated_at = Some(patch.updated_at);
            fields.updated_by = Some(patch.updated_by);
            state.publish();
            Ok(())
        })
    }

    async fn remove(&self, path: &CollectionPath, id: &ProductId) -> Result<(), CollectionError> {
        self.remove_calls.fetch_add(1, Ordering::SeqCst);
        self.with_path(path, |state| {
            state
                .docs
                .remove(id)
                .map(|_| ())
                .ok_or(CollectionError::NotFound)?;
            state.publish();
            Ok(())
        })
    }

    fn subscribe(&self, path: &CollectionPath) -> ChangeFeed {
        self.with_path(path, |state| {
            state.subscribers.fetch_add(1, Ordering::SeqCst);
            let subscribers = Arc::clone(&state.subscribers);
            let guard = SubscriptionGuard::new(move || {
                subscribers.fetch_sub(1, Ordering::SeqCst);
            });
            // A fresh receiver treats the current value as unseen via
            // mark_changed, so a new subscriber observes the current set
            // without waiting for the next mutation.
            let mut rx = state.tx.subscribe();
            rx.mark_changed();
            ChangeFeed::new(rx, guard)
        })
    }
}

//! Capability traits for the two hosted services the store consumes.
//!
//! The store never talks to a wire protocol directly; it depends on a
//! session provider (authenticate, sign out, observe session transitions)
//! and a remote collection client (mutate documents, subscribe to change
//! notifications). Both are traits so the core stays testable with the
//! in-memory implementations in [`memory`].

pub mod memory;

use core::fmt;

use tokio::sync::watch;

use parts_pro_core::{Product, ProductFields, ProductId, ProductPatch, Session, UserId};

/// A logical collection path scoping one document collection inside the
/// hosted service.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CollectionPath(String);

impl CollectionPath {
    /// The product collection for one store instance.
    #[must_use]
    pub fn products(app_id: &str) -> Self {
        Self(format!("artifacts/{app_id}/public/data/products"))
    }

    /// The path as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Errors from the session provider's credential operations.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CredentialError {
    /// Wrong email/password combination, or no such account.
    #[error("invalid credentials")]
    InvalidCredentials,
    /// The email is not a well-formed address.
    #[error("invalid email format")]
    InvalidEmail,
    /// Too many attempts in a short window.
    #[error("too many attempts")]
    RateLimited,
    /// Anything the provider reports that we don't recognize.
    #[error("session provider error: {0}")]
    Unknown(String),
}

impl CredentialError {
    /// The fixed user-facing message for this error subtype.
    ///
    /// Unrecognized subtypes get the default message; provider internals
    /// are never shown to the user.
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => "Invalid email or password.",
            Self::InvalidEmail => "Please enter a valid email address.",
            Self::RateLimited => "Too many login attempts. Please try again later.",
            Self::Unknown(_) => "Login failed. Please try again.",
        }
    }
}

/// The hosted authentication service.
///
/// The session feed always holds the current state, so a new observer
/// learns the session without waiting for the next transition. Session
/// transitions flow only through the feed: `sign_in` returning an identity
/// does not by itself change what the feed reports.
pub trait SessionProvider: Send + Sync {
    /// Authenticate with email and password.
    ///
    /// # Errors
    ///
    /// Returns a [`CredentialError`] subtype describing why the attempt
    /// was rejected.
    fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<UserId, CredentialError>> + Send;

    /// End the current session.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::Unknown`] if the provider rejects the
    /// sign-out; the session feed is unchanged in that case.
    fn sign_out(&self) -> impl Future<Output = Result<(), CredentialError>> + Send;

    /// Observe session transitions. The receiver's current value is the
    /// provider's current state.
    fn sessions(&self) -> watch::Receiver<Session>;
}

/// Errors from individual collection round-trips.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CollectionError {
    /// The target document does not exist.
    #[error("document not found")]
    NotFound,
    /// The service rejected or could not complete the call.
    #[error("collection service unavailable: {0}")]
    Unavailable(String),
}

/// A broken change-notification stream. Terminal for the subscription:
/// there is no automatic retry.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("subscription failed: {0}")]
pub struct SubscriptionError(pub String);

/// One delivery on a change feed.
///
/// Notifications carry the full current document set, not a diff. A failed
/// feed is distinct from an empty document set and stays failed.
#[derive(Debug, Clone)]
pub enum FeedState {
    /// The full current document set.
    Documents(Vec<Product>),
    /// The subscription broke.
    Failed(SubscriptionError),
}

/// A teardown handle that releases a subscription exactly once, on
/// explicit [`release`](Self::release) or on drop, whichever comes first.
pub struct SubscriptionGuard(Option<Box<dyn FnOnce() + Send>>);

impl SubscriptionGuard {
    /// Wrap a teardown closure.
    #[must_use]
    pub fn new(teardown: impl FnOnce() + Send + 'static) -> Self {
        Self(Some(Box::new(teardown)))
    }

    /// A guard with no teardown work.
    #[must_use]
    pub const fn noop() -> Self {
        Self(None)
    }

    /// Release the subscription now.
    pub fn release(mut self) {
        if let Some(teardown) = self.0.take() {
            teardown();
        }
    }
}

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        if let Some(teardown) = self.0.take() {
            teardown();
        }
    }
}

impl fmt::Debug for SubscriptionGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SubscriptionGuard")
            .field(&self.0.as_ref().map(|_| "..."))
            .finish()
    }
}

/// An open subscription to one collection.
///
/// Dropping the feed releases the subscription; no notification is
/// delivered afterward.
#[derive(Debug)]
pub struct ChangeFeed {
    rx: watch::Receiver<FeedState>,
    _guard: SubscriptionGuard,
}

impl ChangeFeed {
    /// Build a feed from a watch receiver and its teardown guard.
    #[must_use]
    pub const fn new(rx: watch::Receiver<FeedState>, guard: SubscriptionGuard) -> Self {
        Self { rx, _guard: guard }
    }

    /// The latest delivery, marking it seen.
    #[must_use]
    pub fn latest(&mut self) -> FeedState {
        self.rx.borrow_and_update().clone()
    }

    /// Wait for the next delivery after the last one seen.
    ///
    /// # Errors
    ///
    /// Returns an error when the publishing side has gone away.
    pub async fn changed(&mut self) -> Result<(), watch::error::RecvError> {
        self.rx.changed().await
    }
}

/// The hosted document collection service, parameterized by logical path.
pub trait CollectionClient: Send + Sync {
    /// Insert a new document; the service assigns the identifier.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::Unavailable`] if the write was not
    /// accepted.
    fn insert(
        &self,
        path: &CollectionPath,
        fields: ProductFields,
    ) -> impl Future<Output = Result<ProductId, CollectionError>> + Send;

    /// Merge a patch onto an existing document.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::NotFound`] if the identifier does not
    /// exist.
    fn update(
        &self,
        path: &CollectionPath,
        id: &ProductId,
        patch: ProductPatch,
    ) -> impl Future<Output = Result<(), CollectionError>> + Send;

    /// Delete a document.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::NotFound`] if the identifier does not
    /// exist.
    fn remove(
        &self,
        path: &CollectionPath,
        id: &ProductId,
    ) -> impl Future<Output = Result<(), CollectionError>> + Send;

    /// Open a change-notification subscription on a collection.
    ///
    /// The feed's current value is the current document set; every
    /// subsequent mutation delivers the full set again. Stream failures
    /// arrive as [`FeedState::Failed`].
    fn subscribe(&self, path: &CollectionPath) -> ChangeFeed;
}

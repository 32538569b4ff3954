//! Unified error handling for the store.
//!
//! Propagation policy: validation and authorization errors are resolved
//! inline where they occur and are never logged as system failures.
//! Subscription and collection errors are logged and surfaced as
//! read-only failure text. No operation is retried automatically; every
//! failure is terminal for that attempt.

use thiserror::Error;

use parts_pro_core::{ProductId, ValidationError};

use crate::providers::{CollectionError, CredentialError, SubscriptionError};

/// Application-level error type for the store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AppError {
    /// Bad form input; re-shown inline next to the form.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// An admin workflow was invoked with the gate closed. Refused before
    /// any network call.
    #[error("not authorized to manage products")]
    Unauthorized,

    /// The target document vanished between list-render and action. The
    /// list re-syncs on the next change notification.
    #[error("product not found: {0}")]
    NotFound(ProductId),

    /// The collection change stream broke; shown as a page-level error.
    #[error(transparent)]
    Subscription(#[from] SubscriptionError),

    /// Login failure; mapped to a fixed user-facing message by subtype.
    #[error(transparent)]
    Credential(#[from] CredentialError),

    /// A collection round-trip failed for a reason other than a missing
    /// document.
    #[error(transparent)]
    Collection(CollectionError),
}

impl AppError {
    /// Lift a round-trip error, attaching the target identifier to
    /// `NotFound` so the surfaced message names the vanished product.
    #[must_use]
    pub fn from_collection(err: CollectionError, id: &ProductId) -> Self {
        match err {
            CollectionError::NotFound => Self::NotFound(id.clone()),
            other => Self::Collection(other),
        }
    }
}

/// Result type alias for [`AppError`].
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_names_the_product() {
        let err = AppError::from_collection(CollectionError::NotFound, &ProductId::new("p-9"));
        assert_eq!(err, AppError::NotFound(ProductId::new("p-9")));
        assert_eq!(err.to_string(), "product not found: p-9");
    }

    #[test]
    fn test_other_collection_errors_pass_through() {
        let err = AppError::from_collection(
            CollectionError::Unavailable("down".to_owned()),
            &ProductId::new("p-9"),
        );
        assert_eq!(
            err,
            AppError::Collection(CollectionError::Unavailable("down".to_owned()))
        );
    }

    #[test]
    fn test_validation_error_message() {
        let err = AppError::from(ValidationError::MissingName);
        assert_eq!(err.to_string(), "validation failed: product name is required");
    }
}

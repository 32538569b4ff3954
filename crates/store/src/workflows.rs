//! Admin product management workflows.
//!
//! Every operation checks the gate first, validates second, and only then
//! issues its single storage round-trip. Success means the storage layer
//! accepted the write; the live snapshot catches up when the change
//! notification arrives, and no workflow waits for that.
//!
//! Concurrent edits to the same product from two sessions are
//! last-write-wins: there is no version field and no
//! optimistic-concurrency check. Accepted behavior, not a defect.

use std::sync::Arc;

use chrono::Utc;

use parts_pro_core::{
    AdminAccess, Product, ProductDraft, ProductFields, ProductId, ProductPatch, UserId,
};

use crate::error::{AppError, Result};
use crate::providers::{CollectionClient, CollectionPath};

/// Create, update, and delete operations over one product collection.
#[derive(Debug, Clone)]
pub struct ProductWorkflows<C> {
    client: Arc<C>,
    path: CollectionPath,
}

impl<C: CollectionClient> ProductWorkflows<C> {
    /// Workflows over the collection at `path`.
    #[must_use]
    pub const fn new(client: Arc<C>, path: CollectionPath) -> Self {
        Self { client, path }
    }

    fn require_admin(access: &AdminAccess) -> Result<UserId> {
        access
            .granted_user()
            .cloned()
            .ok_or(AppError::Unauthorized)
    }

    /// Create a product from form input.
    ///
    /// # Errors
    ///
    /// `Unauthorized` with the gate closed (no storage call), `Validation`
    /// for bad input (no storage call), or the storage layer's rejection.
    pub async fn create(&self, access: &AdminAccess, draft: &ProductDraft) -> Result<ProductId> {
        let actor = Self::require_admin(access)?;
        let valid = draft.validate()?;

        let fields = ProductFields {
            name: valid.name,
            description: valid.description,
            price: valid.price,
            image_url: valid.image_url,
            created_at: Some(Utc::now()),
            added_by: Some(actor),
            updated_at: None,
            updated_by: None,
        };

        self.client
            .insert(&self.path, fields)
            .await
            .map_err(AppError::Collection)
    }

    /// Replace a product's user-editable fields.
    ///
    /// # Errors
    ///
    /// As [`create`](Self::create), plus `NotFound` if the identifier
    /// vanished between list-render and this call (surfaced unchanged
    /// from the storage layer).
    pub async fn update(
        &self,
        access: &AdminAccess,
        id: &ProductId,
        draft: &ProductDraft,
    ) -> Result<()> {
        let actor = Self::require_admin(access)?;
        let valid = draft.validate()?;

        let patch = ProductPatch {
            name: valid.name,
            description: valid.description,
            price: valid.price,
            image_url: valid.image_url,
            updated_at: Utc::now(),
            updated_by: actor,
        };

        self.client
            .update(&self.path, id, patch)
            .await
            .map_err(|err| AppError::from_collection(err, id))
    }

    /// Delete a product. Only reachable through [`PendingDelete::confirm`];
    /// the two-phase confirmation is the sole path to this destructive
    /// call.
    async fn remove(&self, access: &AdminAccess, id: &ProductId) -> Result<()> {
        Self::require_admin(access)?;
        self.client
            .remove(&self.path, id)
            .await
            .map_err(|err| AppError::from_collection(err, id))
    }
}

/// Two-phase delete confirmation.
///
/// `request` marks a target, `confirm` performs the storage call, and
/// `cancel` clears the target with no side effects. A failed confirm
/// keeps the target pending so the user can retry or cancel.
#[derive(Debug, Default)]
pub struct PendingDelete {
    target: Option<Product>,
}

impl PendingDelete {
    /// No deletion pending.
    #[must_use]
    pub const fn new() -> Self {
        Self { target: None }
    }

    /// Mark a product for deletion, replacing any previous target.
    pub fn request(&mut self, product: Product) {
        self.target = Some(product);
    }

    /// The product awaiting confirmation, if any.
    #[must_use]
    pub const fn target(&self) -> Option<&Product> {
        self.target.as_ref()
    }

    /// Abandon the pending deletion. Performs no storage calls.
    pub fn cancel(&mut self) {
        self.target = None;
    }

    /// Issue the destructive call for the pending target.
    ///
    /// A no-op when nothing is pending. The target is cleared only on
    /// success.
    ///
    /// # Errors
    ///
    /// `Unauthorized` with the gate closed, `NotFound` if the product
    /// vanished, or the storage layer's rejection.
    pub async fn confirm<C: CollectionClient>(
        &mut self,
        workflows: &ProductWorkflows<C>,
        access: &AdminAccess,
    ) -> Result<()> {
        let Some(id) = self.target.as_ref().map(|p| p.id.clone()) else {
            return Ok(());
        };
        workflows.remove(access, &id).await?;
        self.target = None;
        Ok(())
    }
}

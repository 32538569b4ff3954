//! The product document model and form validation.
//!
//! A product's canonical copy lives in the remote collection; everything
//! here is either the document shape (`Product`, [`ProductFields`],
//! [`ProductPatch`]) or the untrusted form input that precedes it
//! ([`ProductDraft`]). Validation happens at the workflow boundary, before
//! any storage call.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Price, PriceError, ProductId, UserId};

/// The stored fields of a product document.
///
/// `created_at` and `added_by` are stamped once at creation and never
/// touched again; `updated_at`/`updated_by` are stamped on every edit.
/// Documents written by foreign clients may lack any of the audit fields,
/// which is why all four are optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductFields {
    pub name: String,
    pub description: String,
    pub price: Price,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub added_by: Option<UserId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<UserId>,
}

/// A product document: storage-assigned identifier plus fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    #[serde(flatten)]
    pub fields: ProductFields,
}

impl Product {
    /// The image URL to render, falling back to a generated placeholder
    /// when the product has none.
    #[must_use]
    pub fn image_or_placeholder(&self) -> String {
        self.fields.image_url.clone().unwrap_or_else(|| {
            format!(
                "https://placehold.co/400x300/e0e0e0/555555?text={}",
                urlencoding::encode(&self.fields.name)
            )
        })
    }
}

/// The fields carried by an update call.
///
/// Updates merge onto the existing document: the creation audit fields are
/// never part of a patch, so an edit cannot change a product's position in
/// the newest-first ordering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPatch {
    pub name: String,
    pub description: String,
    pub price: Price,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub updated_at: DateTime<Utc>,
    pub updated_by: UserId,
}

/// Errors produced by [`ProductDraft::validate`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The name field is empty.
    #[error("product name is required")]
    MissingName,
    /// The description field is empty.
    #[error("product description is required")]
    MissingDescription,
    /// The price field is empty, non-numeric, or negative.
    #[error("invalid price: {0}")]
    Price(#[from] PriceError),
}

/// Raw, untrusted form input for creating or editing a product.
///
/// The price is kept as the text the user typed; [`validate`] is the only
/// path from a draft to storable fields.
///
/// [`validate`]: ProductDraft::validate
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub price: String,
    pub image_url: String,
}

/// A draft that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidProduct {
    pub name: String,
    pub description: String,
    pub price: Price,
    pub image_url: Option<String>,
}

impl ProductDraft {
    /// Validate the draft: name and description must be non-empty after
    /// trimming, and the price must parse as a non-negative number. An
    /// empty image URL becomes "no image" (the placeholder policy applies
    /// at render time).
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] encountered, in field order.
    pub fn validate(&self) -> Result<ValidProduct, ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::MissingName);
        }

        let description = self.description.trim();
        if description.is_empty() {
            return Err(ValidationError::MissingDescription);
        }

        let price = Price::parse(&self.price)?;

        let image_url = Some(self.image_url.trim())
            .filter(|url| !url.is_empty())
            .map(str::to_owned);

        Ok(ValidProduct {
            name: name.to_owned(),
            description: description.to_owned(),
            price,
            image_url,
        })
    }
}

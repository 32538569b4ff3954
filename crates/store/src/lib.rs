//! Parts Pro storefront core.
//!
//! This crate implements the stateful core of the Parts Pro single-page
//! storefront: a session-gated view router, a live product-list
//! synchronizer, and admin-gated product management workflows. The two
//! hosted services the store depends on (authentication and the document
//! collection) are expressed as the [`providers`] traits; in-memory
//! implementations live in [`providers::memory`].
//!
//! # Architecture
//!
//! - The session provider pushes session transitions; the [`router`]
//!   observes them and derives the three-way admin gate.
//! - Navigation is never blocked; gating happens when a page is rendered
//!   and when a workflow executes.
//! - Each view that lists products owns a [`sync::ProductListSynchronizer`]
//!   holding one collection subscription and one sorted snapshot.
//! - [`workflows`] mutate the collection; the synchronizer observes the
//!   resulting change notification. Workflow success means the storage
//!   layer accepted the write, not that the snapshot has caught up.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod login;
pub mod providers;
pub mod router;
pub mod sync;
pub mod telemetry;
pub mod workflows;

pub use config::AppConfig;
pub use error::{AppError, Result};
pub use router::{Page, Router, View};
pub use sync::{CatalogState, ProductListSynchronizer};
pub use workflows::{PendingDelete, ProductWorkflows};

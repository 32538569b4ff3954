//! Parts Pro Core - Shared types library.
//!
//! This crate provides the domain types used across all Parts Pro
//! components:
//! - `store` - The storefront application core (router, synchronizer,
//!   product management workflows)
//! - `integration-tests` - End-to-end scenario tests
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no network clients, no
//! async runtime. This keeps it lightweight and allows it to be used
//! anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, and emails
//! - [`product`] - The product document model and form validation
//! - [`session`] - Session state and the three-way admin access gate

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod product;
pub mod session;
pub mod types;

pub use product::*;
pub use session::*;
pub use types::*;

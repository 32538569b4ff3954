//! Integration tests for Parts Pro.
//!
//! These tests exercise the whole storefront core - router, synchronizer,
//! and workflows - against the in-memory providers, end to end. No hosted
//! service is required.
//!
//! # Test Categories
//!
//! - `admin_session` - Login, gating, and logout lifecycle
//! - `catalog_sync` - Live product list behavior across views

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use secrecy::SecretString;

use parts_pro_core::UserId;
use parts_pro_store::config::ServiceConfig;
use parts_pro_store::providers::{CollectionPath, SessionProvider};
use parts_pro_store::providers::memory::{MemoryCollection, MemorySessions};
use parts_pro_store::{AppConfig, ProductWorkflows, Router};

/// Everything a scenario needs, wired the way the application wires it.
pub struct TestContext {
    pub sessions: Arc<MemorySessions>,
    pub collection: Arc<MemoryCollection>,
    pub workflows: ProductWorkflows<MemoryCollection>,
    pub router: Router,
    pub path: CollectionPath,
}

impl TestContext {
    /// A store instance with administrator "U1" and one admin account.
    #[must_use]
    pub fn new() -> Self {
        parts_pro_store::telemetry::init();

        let config = AppConfig {
            app_id: "test-store".to_owned(),
            admin_uid: UserId::new("U1"),
            service: ServiceConfig {
                endpoint: "https://svc.invalid".to_owned(),
                api_key: SecretString::from("test-key"),
            },
        };

        let sessions = Arc::new(MemorySessions::new());
        sessions.register("admin@example.com", "hunter2", "U1");
        sessions.register("customer@example.com", "pw", "U2");

        let collection = Arc::new(MemoryCollection::new());
        let path = config.products_path();
        let workflows = ProductWorkflows::new(Arc::clone(&collection), path.clone());
        let router = Router::new(config.admin_uid.clone());

        Self {
            sessions,
            collection,
            workflows,
            router,
            path,
        }
    }

    /// Apply the provider's current session report to the router, the way
    /// the application's session listener does.
    pub fn pump_session(&mut self) {
        let session = self.sessions.sessions().borrow().clone();
        self.router.on_session(session);
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

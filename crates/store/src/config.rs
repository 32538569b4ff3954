//! Store configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `PARTS_PRO_ADMIN_UID` - The single administrator identity
//! - `PARTS_PRO_SERVICE_ENDPOINT` - Hosted service endpoint URL
//! - `PARTS_PRO_SERVICE_API_KEY` - Hosted service API key
//!
//! ## Optional
//! - `PARTS_PRO_APP_ID` - Store instance id scoping the collection path
//!   (default: `default-app-id`)
//!
//! The administrator identity is deliberately configuration, not a
//! compiled-in constant, so the gate stays testable with synthetic
//! identities.

use secrecy::SecretString;
use thiserror::Error;

use parts_pro_core::UserId;

use crate::providers::CollectionPath;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Connection details for the hosted auth/collection service. Opaque to
/// the store core; only the provider implementations consume it.
#[derive(Clone)]
pub struct ServiceConfig {
    /// Service endpoint URL.
    pub endpoint: String,
    /// API key for the service (secret).
    pub api_key: SecretString,
}

impl std::fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

/// Store application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Store instance id; scopes the product collection path.
    pub app_id: String,
    /// The administrator identity the manage gate checks against.
    pub admin_uid: UserId,
    /// Hosted service connection bundle.
    pub service: ServiceConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a required variable is missing or empty.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let app_id = get_env_or_default("PARTS_PRO_APP_ID", "default-app-id");
        let admin_uid = get_required_env("PARTS_PRO_ADMIN_UID")?;
        if admin_uid.trim().is_empty() {
            return Err(ConfigError::InvalidEnvVar(
                "PARTS_PRO_ADMIN_UID".to_owned(),
                "must not be empty".to_owned(),
            ));
        }

        let service = ServiceConfig {
            endpoint: get_required_env("PARTS_PRO_SERVICE_ENDPOINT")?,
            api_key: SecretString::from(get_required_env("PARTS_PRO_SERVICE_API_KEY")?),
        };

        Ok(Self {
            app_id,
            admin_uid: UserId::new(admin_uid),
            service,
        })
    }

    /// The logical path of this store's product collection.
    #[must_use]
    pub fn products_path(&self) -> CollectionPath {
        CollectionPath::products(&self.app_id)
    }
}

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, unsafe_code)]
mod tests {
    use super::*;

    // One test function mutates the process environment sequentially so
    // parallel test threads never race on the same variables.
    #[test]
    fn test_from_env() {
        unsafe {
            std::env::remove_var("PARTS_PRO_APP_ID");
            std::env::remove_var("PARTS_PRO_ADMIN_UID");
            std::env::set_var("PARTS_PRO_SERVICE_ENDPOINT", "https://svc.example.com");
            std::env::set_var("PARTS_PRO_SERVICE_API_KEY", "k-3y");
        }

        // Missing admin uid
        assert!(matches!(
            AppConfig::from_env(),
            Err(ConfigError::MissingEnvVar(var)) if var == "PARTS_PRO_ADMIN_UID"
        ));

        // Empty admin uid
        unsafe { std::env::set_var("PARTS_PRO_ADMIN_UID", "  ") };
        assert!(matches!(
            AppConfig::from_env(),
            Err(ConfigError::InvalidEnvVar(..))
        ));

        // Complete configuration, app id defaulted
        unsafe { std::env::set_var("PARTS_PRO_ADMIN_UID", "U1") };
        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.admin_uid, UserId::new("U1"));
        assert_eq!(config.app_id, "default-app-id");
        assert_eq!(
            config.products_path().as_str(),
            "artifacts/default-app-id/public/data/products"
        );

        // Explicit app id
        unsafe { std::env::set_var("PARTS_PRO_APP_ID", "store-7") };
        let config = AppConfig::from_env().unwrap();
        assert_eq!(
            config.products_path().as_str(),
            "artifacts/store-7/public/data/products"
        );
    }

    #[test]
    fn test_service_config_debug_redacts_api_key() {
        let service = ServiceConfig {
            endpoint: "https://svc.example.com".to_owned(),
            api_key: SecretString::from("super-secret"),
        };
        let debug = format!("{service:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("super-secret"));
    }
}

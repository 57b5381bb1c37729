//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `STOREFRONT_API_URL` - Base URL of the product/order API (default: `http://127.0.0.1:8080`)
//! - `STOREFRONT_USER_ID` - User ID sent with orders (default: 1)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag (e.g., `staging`)

use poom_store_core::UserId;
use thiserror::Error;
use url::Url;

const DEFAULT_API_URL: &str = "http://127.0.0.1:8080";
const DEFAULT_USER_ID: &str = "1";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Base URL of the product/order API, always ending in `/`
    pub api_url: Url,
    /// User ID attached to submitted orders.
    ///
    /// Stands in for real authentication; every order is placed as this user.
    pub user_id: UserId,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag
    pub sentry_environment: Option<String>,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_url = parse_api_url(
            "STOREFRONT_API_URL",
            &lookup("STOREFRONT_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
        )?;
        let user_id = lookup("STOREFRONT_USER_ID")
            .unwrap_or_else(|| DEFAULT_USER_ID.to_string())
            .parse::<UserId>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_USER_ID".to_string(), e.to_string())
            })?;

        Ok(Self {
            api_url,
            user_id,
            sentry_dsn: lookup("SENTRY_DSN").filter(|v| !v.is_empty()),
            sentry_environment: lookup("SENTRY_ENVIRONMENT").filter(|v| !v.is_empty()),
        })
    }

    /// Replace the API base URL (e.g., from a command-line flag).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if `raw` is not an http(s) URL.
    pub fn with_api_url(mut self, raw: &str) -> Result<Self, ConfigError> {
        self.api_url = parse_api_url("--api-url", raw)?;
        Ok(self)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse an http(s) base URL and make sure it ends in `/` so that joining
/// endpoint paths keeps any path prefix.
fn parse_api_url(source: &str, raw: &str) -> Result<Url, ConfigError> {
    let mut url = Url::parse(raw.trim())
        .map_err(|e| ConfigError::InvalidEnvVar(source.to_string(), e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            source.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        StorefrontConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.api_url.as_str(), "http://127.0.0.1:8080/");
        assert_eq!(config.user_id, UserId::new(1));
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_api_url_keeps_path_prefix() {
        let config = load(&[("STOREFRONT_API_URL", "https://shop.example.com/backend")]).unwrap();
        assert_eq!(config.api_url.as_str(), "https://shop.example.com/backend/");
        assert_eq!(
            config.api_url.join("api/products").unwrap().as_str(),
            "https://shop.example.com/backend/api/products"
        );
    }

    #[test]
    fn test_api_url_rejects_other_schemes() {
        let err = load(&[("STOREFRONT_API_URL", "ftp://example.com")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "STOREFRONT_API_URL"));
    }

    #[test]
    fn test_api_url_rejects_garbage() {
        assert!(load(&[("STOREFRONT_API_URL", "not a url")]).is_err());
    }

    #[test]
    fn test_user_id_parsed() {
        let config = load(&[("STOREFRONT_USER_ID", "42")]).unwrap();
        assert_eq!(config.user_id, UserId::new(42));

        assert!(load(&[("STOREFRONT_USER_ID", "abc")]).is_err());
    }

    #[test]
    fn test_empty_sentry_dsn_is_unset() {
        let config = load(&[("SENTRY_DSN", "")]).unwrap();
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_with_api_url_override() {
        let config = load(&[])
            .unwrap()
            .with_api_url("http://localhost:9999")
            .unwrap();
        assert_eq!(config.api_url.as_str(), "http://localhost:9999/");
    }
}

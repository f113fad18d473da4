//! Configuration Management
//!
//! Credentials and target store for the provider. Values come from the
//! command line, the environment or a JSON file, in that order of
//! precedence.

use crate::shopify::client::{store_url, ShopifyClient};
use crate::shopify::errors::ShopifyError;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use url::Url;

pub const DOMAIN_ENV: &str = "SHOPIFY_DOMAIN";
pub const ACCESS_TOKEN_ENV: &str = "SHOPIFY_ACCESS_TOKEN";
pub const API_VERSION_ENV: &str = "SHOPIFY_API_VERSION";
pub const ENDPOINT_ENV: &str = "SHOPIFY_ENDPOINT";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Please specify both 'domain' and 'access_token'")]
    MissingCredentials,

    #[error("invalid endpoint '{endpoint}': {error}")]
    InvalidEndpoint {
        endpoint: String,
        error: url::ParseError,
    },

    #[error("unsupported endpoint scheme '{0}', expected http or https")]
    UnsupportedScheme(String),
}

/// Partially specified settings, as found in one source
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub api_version: Option<String>,
    #[serde(default)]
    pub endpoint: Option<String>,
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("shopify-webhooks").join("config.json"))
    }

    /// Load configuration from the default location
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load configuration from disk, falling back to defaults on any failure
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring malformed config file {:?}: {}", path, e);
                Self::default()
            }),
            Err(e) => {
                tracing::warn!("Could not read config file {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Settings from `SHOPIFY_*` environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());
        Self {
            domain: get(DOMAIN_ENV),
            access_token: get(ACCESS_TOKEN_ENV),
            api_version: get(API_VERSION_ENV),
            endpoint: get(ENDPOINT_ENV),
        }
    }

    /// Fill every unset value from `fallback`
    pub fn or(self, fallback: Config) -> Config {
        Config {
            domain: self.domain.or(fallback.domain),
            access_token: self.access_token.or(fallback.access_token),
            api_version: self.api_version.or(fallback.api_version),
            endpoint: self.endpoint.or(fallback.endpoint),
        }
    }

    /// Resolve into provider settings, without validating them
    pub fn into_provider(self) -> ProviderConfig {
        ProviderConfig {
            domain: self.domain.unwrap_or_default(),
            access_token: self.access_token.unwrap_or_default(),
            api_version: self.api_version.filter(|v| !v.is_empty()),
            endpoint: self.endpoint.filter(|v| !v.is_empty()),
        }
    }
}

/// Credentials and target of one reconciliation session
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ProviderConfig {
    pub domain: String,
    pub access_token: String,
    pub api_version: Option<String>,
    /// Overrides `https://<domain>.myshopify.com/`
    pub endpoint: Option<String>,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("domain", &self.domain)
            .field("access_token", &"<redacted>")
            .field("api_version", &self.api_version)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl ProviderConfig {
    pub fn new(domain: &str, access_token: &str, api_version: Option<&str>) -> Self {
        Self {
            domain: domain.to_string(),
            access_token: access_token.to_string(),
            api_version: api_version.map(|v| v.to_string()),
            endpoint: None,
        }
    }

    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = Some(endpoint.to_string());
        self
    }

    /// Check that a client can be built from these settings.
    /// A domain is not needed when an explicit endpoint is set.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.access_token.is_empty() || (self.domain.is_empty() && self.endpoint.is_none()) {
            return Err(ConfigError::MissingCredentials);
        }

        if let Some(endpoint) = &self.endpoint {
            let url = Url::parse(endpoint).map_err(|error| ConfigError::InvalidEndpoint {
                endpoint: endpoint.clone(),
                error,
            })?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(ConfigError::UnsupportedScheme(url.scheme().to_string()));
            }
        }

        Ok(())
    }

    /// Effective base endpoint
    pub fn base_url(&self) -> String {
        self.endpoint
            .clone()
            .unwrap_or_else(|| store_url(&self.domain))
    }

    /// Build a fresh client; nothing is shared between calls
    pub fn new_client(&self) -> Result<ShopifyClient, ShopifyError> {
        ShopifyClient::with_endpoint(
            &self.base_url(),
            &self.access_token,
            self.api_version.as_deref(),
        )
    }
}

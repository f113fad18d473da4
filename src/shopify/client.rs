//! Shopify Client
//!
//! Authenticated request template for one store: it knows the base endpoint,
//! the access token and the API version, and hands out scoped services.

use super::errors::ShopifyError;
use super::http::{ApiResponse, ShopifyHttpClient};
use super::webhooks::WebhookService;
use reqwest::Method;
use serde::Serialize;

/// Main Shopify client
#[derive(Clone)]
pub struct ShopifyClient {
    pub http: ShopifyHttpClient,
    base_url: String,
    access_token: String,
    api_version: Option<String>,
}

impl std::fmt::Debug for ShopifyClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopifyClient")
            .field("base_url", &self.base_url)
            .field("access_token", &"<redacted>")
            .field("api_version", &self.api_version)
            .finish()
    }
}

impl ShopifyClient {
    /// Create a client for `https://<domain>.myshopify.com/`.
    /// The domain is not validated.
    pub fn new(
        domain: &str,
        access_token: &str,
        api_version: Option<&str>,
    ) -> Result<Self, ShopifyError> {
        Self::with_endpoint(&store_url(domain), access_token, api_version)
    }

    /// Create a client against an explicit base endpoint (proxies, mock servers)
    pub fn with_endpoint(
        endpoint: &str,
        access_token: &str,
        api_version: Option<&str>,
    ) -> Result<Self, ShopifyError> {
        let mut base_url = endpoint.to_string();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        Ok(Self {
            http: ShopifyHttpClient::new()?,
            base_url,
            access_token: access_token.to_string(),
            api_version: api_version
                .filter(|v| !v.is_empty())
                .map(|v| v.to_string()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_version(&self) -> Option<&str> {
        self.api_version.as_deref()
    }

    /// Webhook collection service
    pub fn webhooks(&self) -> WebhookService<'_> {
        WebhookService::new(self)
    }

    // =========================================================================
    // Admin API URL helpers
    // =========================================================================

    /// Build Admin API URL, versioned when an API version is configured
    pub fn admin_url(&self, path: &str) -> String {
        match &self.api_version {
            Some(version) => format!("{}admin/api/{}/{}", self.base_url, version, path),
            None => format!("{}admin/{}", self.base_url, path),
        }
    }

    /// Build webhook collection URL (trailing slash included)
    pub fn webhooks_url(&self) -> String {
        self.admin_url("webhooks/")
    }

    /// Send a request carrying this client's credentials
    pub async fn send<B>(
        &self,
        method: Method,
        url: &str,
        body: Option<&B>,
    ) -> Result<ApiResponse, ShopifyError>
    where
        B: Serialize + ?Sized,
    {
        self.http.send(method, url, &self.access_token, body).await
    }
}

/// Base endpoint of a store on the myshopify.com domain
pub fn store_url(domain: &str) -> String {
    format!("https://{}.myshopify.com/", domain)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_url() {
        assert_eq!(store_url("acme"), "https://acme.myshopify.com/");
    }

    #[test]
    fn test_webhooks_url_unversioned() {
        let client = ShopifyClient::new("acme", "token", None).unwrap();
        assert_eq!(
            client.webhooks_url(),
            "https://acme.myshopify.com/admin/webhooks/"
        );
    }

    #[test]
    fn test_webhooks_url_versioned() {
        let client = ShopifyClient::new("acme", "token", Some("2023-10")).unwrap();
        assert_eq!(
            client.webhooks_url(),
            "https://acme.myshopify.com/admin/api/2023-10/webhooks/"
        );
    }

    #[test]
    fn test_empty_api_version_is_ignored() {
        let client = ShopifyClient::new("acme", "token", Some("")).unwrap();
        assert_eq!(client.api_version(), None);
    }

    #[test]
    fn test_endpoint_gets_trailing_slash() {
        let client = ShopifyClient::with_endpoint("http://127.0.0.1:8080", "token", None).unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:8080/");
        assert_eq!(client.webhooks_url(), "http://127.0.0.1:8080/admin/webhooks/");
    }

    #[test]
    fn test_debug_redacts_token() {
        let client = ShopifyClient::new("acme", "shpat_secret", None).unwrap();
        let debug = format!("{:?}", client);
        assert!(!debug.contains("shpat_secret"));
    }
}

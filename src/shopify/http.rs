//! HTTP utilities for Shopify REST API calls

use super::errors::ShopifyError;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method, StatusCode};
use serde::Serialize;

/// Header carrying the Admin API access token
pub const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Access-Token";

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Sanitize response body for logging
/// Truncates long responses and strips non-printable characters
pub fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let mut end = MAX_LOG_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... [truncated, {} bytes total]", &body[..end], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// A received response: status plus raw body, not yet judged
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: String,
}

/// HTTP client wrapper for Shopify API calls
#[derive(Clone)]
pub struct ShopifyHttpClient {
    client: Client,
}

impl ShopifyHttpClient {
    /// Create a new HTTP client
    pub fn new() -> Result<Self, ShopifyError> {
        let client = Client::builder()
            .user_agent(concat!("shopify-webhooks/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client })
    }

    /// Issue one request and return whatever the server answered.
    ///
    /// Only transport failures are errors here; status codes are left to
    /// the caller.
    pub async fn send<B>(
        &self,
        method: Method,
        url: &str,
        token: &str,
        body: Option<&B>,
    ) -> Result<ApiResponse, ShopifyError>
    where
        B: Serialize + ?Sized,
    {
        tracing::debug!("request to Shopify: {} {}", method, url);

        let mut request = self
            .client
            .request(method, url)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .header(ACCESS_TOKEN_HEADER, token);

        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status == StatusCode::NOT_FOUND {
            tracing::debug!("API returned {} for {}", status, url);
        } else if !status.is_success() {
            // Security: Only log sanitized/truncated error body to avoid leaking sensitive data
            tracing::error!("API error: {} - {}", status, sanitize_for_log(&body));
        }

        Ok(ApiResponse { status, body })
    }
}

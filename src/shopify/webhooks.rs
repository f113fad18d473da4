//! Webhook subscriptions
//!
//! CRUD against `admin/webhooks/`. Every response goes through
//! [`relevant_error`] before it is decoded, so callers only ever see a
//! decoded webhook or one normalized [`ShopifyError`].

use super::client::ShopifyClient;
use super::errors::{relevant_error, ShopifyError};
use super::http::ApiResponse;
use reqwest::{Method, StatusCode};
use serde::{Deserialize, Deserializer, Serialize};

// -----------------------------------------------------------------------------
// Input
// -----------------------------------------------------------------------------

/// Writable webhook fields, as sent on create and update
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookInput {
    pub topic: String,
    pub address: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub format: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub fields: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub metafield_namespaces: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub private_metafield_namespaces: Vec<String>,
}

#[derive(Debug, Serialize)]
struct WebhookInputBody<'a> {
    webhook: &'a WebhookInput,
}

// -----------------------------------------------------------------------------
// Responses
// -----------------------------------------------------------------------------

/// A webhook as stored by Shopify
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Webhook {
    // Read-only fields
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub api_version: Option<String>,

    #[serde(flatten)]
    pub input: WebhookInput,
}

#[derive(Debug, Deserialize)]
struct WebhookResponse {
    webhook: Webhook,
}

/// Result of a lookup by id. A missing webhook is data, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    Found(Webhook),
    Absent,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Shopify sends numeric ids; they are kept as opaque strings
fn id_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(u64),
        Text(String),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Number(id) => id.to_string(),
        RawId::Text(id) => id,
    })
}

/// Percent-encode an id for use as a single path segment
pub fn escape_id(id: &str) -> String {
    urlencoding::encode(id).into_owned()
}

// -----------------------------------------------------------------------------
// CRUD
// -----------------------------------------------------------------------------

/// Webhook collection of one store
pub struct WebhookService<'a> {
    client: &'a ShopifyClient,
}

impl<'a> WebhookService<'a> {
    pub fn new(client: &'a ShopifyClient) -> Self {
        Self { client }
    }

    /// URL of a single webhook
    pub fn webhook_url(&self, id: &str) -> String {
        format!("{}{}", self.client.webhooks_url(), escape_id(id))
    }

    pub async fn create(&self, params: &WebhookInput) -> Result<Webhook, ShopifyError> {
        let payload = WebhookInputBody { webhook: params };
        let response = self
            .client
            .send(Method::POST, &self.client.webhooks_url(), Some(&payload))
            .await?;

        decode_webhook(response)
    }

    /// Look a webhook up by id. A 404 is reported as [`ReadOutcome::Absent`]
    /// whatever the body says.
    pub async fn read(&self, id: &str) -> Result<ReadOutcome, ShopifyError> {
        let response = self
            .client
            .send::<()>(Method::GET, &self.webhook_url(id), None)
            .await?;

        if response.status == StatusCode::NOT_FOUND {
            return Ok(ReadOutcome::Absent);
        }

        decode_webhook(response).map(ReadOutcome::Found)
    }

    /// Full replacement of the writable fields
    pub async fn update(&self, id: &str, params: &WebhookInput) -> Result<Webhook, ShopifyError> {
        let payload = WebhookInputBody { webhook: params };
        let response = self
            .client
            .send(Method::PUT, &self.webhook_url(id), Some(&payload))
            .await?;

        decode_webhook(response)
    }

    pub async fn delete(&self, id: &str) -> Result<(), ShopifyError> {
        let response = self
            .client
            .send::<()>(Method::DELETE, &self.webhook_url(id), None)
            .await?;

        relevant_error(response.status, &response.body)
    }
}

fn decode_webhook(response: ApiResponse) -> Result<Webhook, ShopifyError> {
    relevant_error(response.status, &response.body)?;

    serde_json::from_str::<WebhookResponse>(&response.body)
        .map(|envelope| envelope.webhook)
        .map_err(|error| ShopifyError::Decode {
            status: response.status,
            error,
        })
}

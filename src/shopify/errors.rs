//! Shopify error normalization
//!
//! The Admin API reports validation failures with error shapes that vary per
//! endpoint: sometimes a bare string, sometimes an object of per-field
//! message arrays. Everything is folded into one diagnostic string here.

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Tag prefixed to every consolidated error message
pub const SOURCE_TAG: &str = "Shopify:";

/// Errors returned by the Shopify service layer
#[derive(Debug, Error)]
pub enum ShopifyError {
    /// No response was received (DNS, connection refused, timeout)
    #[error("request to Shopify failed: {0}")]
    Transport(reqwest::Error),

    /// Shopify answered with a structured error body
    #[error("{message}")]
    Api { status: StatusCode, message: String },

    /// Shopify answered with an error status and no usable error body
    #[error("Shopify: request failed with status {status}")]
    Status { status: StatusCode },

    /// The response envelope could not be decoded
    #[error("Shopify: could not decode response (status {status}): {error}")]
    Decode {
        status: StatusCode,
        error: serde_json::Error,
    },
}

// Messages embed the underlying error, so none of them is chained as a source.
impl From<reqwest::Error> for ShopifyError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err)
    }
}

impl ShopifyError {
    /// HTTP status of the response, when one was received
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Transport(err) => err.status(),
            Self::Api { status, .. } | Self::Status { status } | Self::Decode { status, .. } => {
                Some(*status)
            }
        }
    }
}

/// One or more messages attached to a field
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Messages {
    One(String),
    Many(Vec<String>),
}

impl Messages {
    fn joined(&self) -> String {
        match self {
            Self::One(message) => message.clone(),
            Self::Many(messages) => messages.join(" "),
        }
    }
}

/// Per-field and whole-resource messages from an `errors` object.
/// Any subset may be present; all absent means "no error".
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct WebhookErrorMessage {
    pub webhook: Option<Messages>,

    pub topic: Option<Messages>,
    pub address: Option<Messages>,
    pub format: Option<Messages>,

    pub fields: Option<Messages>,
    pub metafield_namespaces: Option<Messages>,
    pub private_metafield_namespaces: Option<Messages>,
}

impl WebhookErrorMessage {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Render every present field in a fixed order, prefixed with
    /// [`SOURCE_TAG`]. Returns an empty string when nothing is present.
    pub fn render(&self) -> String {
        if self.is_empty() {
            return String::new();
        }

        let tagged = [
            ("topic", &self.topic),
            ("address", &self.address),
            ("format", &self.format),
            ("fields", &self.fields),
            ("metafield_namespaces", &self.metafield_namespaces),
            ("private_metafield_namespaces", &self.private_metafield_namespaces),
        ];

        let mut parts = vec![SOURCE_TAG.to_string()];
        if let Some(webhook) = &self.webhook {
            parts.push(webhook.joined());
        }
        parts.extend(tagged.iter().filter_map(|(name, messages)| {
            messages
                .as_ref()
                .map(|m| format!("{}: [{}]", name, m.joined()))
        }));

        parts.join(" ")
    }
}

/// The `errors` value is a bare message, a list of messages, or an object
/// of fields. `List` must come before `Fields`: serde would otherwise fill
/// the struct from the array by position.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum ErrorPayload {
    Message(String),
    List(Vec<String>),
    Fields(WebhookErrorMessage),
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    errors: Option<ErrorPayload>,
}

/// Decode the structured error carried by a response body.
/// Empty, absent, null or undecodable bodies yield an empty message.
pub fn decode_errors(body: &str) -> WebhookErrorMessage {
    if body.trim().is_empty() {
        return WebhookErrorMessage::default();
    }

    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(ErrorEnvelope {
            errors: Some(ErrorPayload::Fields(fields)),
        }) => fields,
        Ok(ErrorEnvelope {
            errors: Some(ErrorPayload::Message(message)),
        }) => WebhookErrorMessage {
            webhook: Some(Messages::One(message)),
            ..Default::default()
        },
        Ok(ErrorEnvelope {
            errors: Some(ErrorPayload::List(messages)),
        }) if !messages.is_empty() => WebhookErrorMessage {
            webhook: Some(Messages::Many(messages)),
            ..Default::default()
        },
        Ok(ErrorEnvelope {
            errors: Some(ErrorPayload::List(_)),
        })
        | Ok(ErrorEnvelope { errors: None }) | Err(_) => WebhookErrorMessage::default(),
    }
}

/// Decide whether a received response is a failure.
///
/// A non-empty structured error always fails, whatever the status. Without
/// one, only a non-success status fails, reported with the status alone.
pub fn relevant_error(status: StatusCode, body: &str) -> Result<(), ShopifyError> {
    let errors = decode_errors(body);
    if !errors.is_empty() {
        return Err(ShopifyError::Api {
            status,
            message: errors.render(),
        });
    }

    if !status.is_success() {
        return Err(ShopifyError::Status { status });
    }

    Ok(())
}

//! Webhook resource state
//!
//! The record the hosting engine keeps for one webhook: the writable fields
//! (desired on the way in, observed on the way out), the external identifier
//! and the read-only attributes Shopify assigns.

use crate::shopify::webhooks::{Webhook, WebhookInput};
use serde::{Deserialize, Serialize};

/// Writable webhook fields as declared by the caller.
///
/// Optional sequences stay `None` when the declaration omits them; they are
/// sent as empty lists. No default is applied to `format` here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookSpec {
    pub topic: String,
    pub address: String,

    #[serde(default)]
    pub format: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metafield_namespaces: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_metafield_namespaces: Option<Vec<String>>,
}

impl WebhookSpec {
    /// Wire input for create and update
    pub fn to_input(&self) -> WebhookInput {
        WebhookInput {
            topic: self.topic.clone(),
            address: self.address.clone(),
            format: self.format.clone(),
            fields: self.fields.clone().unwrap_or_default(),
            metafield_namespaces: self.metafield_namespaces.clone().unwrap_or_default(),
            private_metafield_namespaces: self
                .private_metafield_namespaces
                .clone()
                .unwrap_or_default(),
        }
    }
}

impl From<&WebhookInput> for WebhookSpec {
    fn from(input: &WebhookInput) -> Self {
        Self {
            topic: input.topic.clone(),
            address: input.address.clone(),
            format: input.format.clone(),
            fields: Some(input.fields.clone()),
            metafield_namespaces: Some(input.metafield_namespaces.clone()),
            private_metafield_namespaces: Some(input.private_metafield_namespaces.clone()),
        }
    }
}

/// Whether the remote object backing a record still exists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Present,
    Absent,
}

/// State record of one webhook resource
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookRecord {
    /// External identifier; `None` marks the record as absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(flatten)]
    pub spec: WebhookSpec,

    // Read-only, assigned by Shopify
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,
}

impl WebhookRecord {
    /// A record that exists only as desired state
    pub fn new(spec: WebhookSpec) -> Self {
        Self {
            spec,
            ..Default::default()
        }
    }

    /// A record carrying nothing but an operator-supplied id
    pub fn imported(id: &str) -> Self {
        Self {
            id: Some(id.to_string()),
            ..Default::default()
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }

    pub fn is_absent(&self) -> bool {
        self.id().is_none()
    }

    pub fn set_id(&mut self, id: &str) {
        self.id = Some(id.to_string());
    }

    pub fn clear_id(&mut self) {
        self.id = None;
    }

    /// Copy every field Shopify returned into observed state. The id is left
    /// alone: it is only ever assigned on create.
    pub fn apply(&mut self, webhook: &Webhook) {
        self.spec = WebhookSpec::from(&webhook.input);
        self.created_at = webhook.created_at.clone();
        self.updated_at = webhook.updated_at.clone();
        self.api_version = webhook.api_version.clone();
    }
}

//! Webhook resource lifecycle
//!
//! Entry points invoked by the hosting engine. Each one builds its own
//! client from the passed-in [`ProviderConfig`], so concurrent calls on
//! different records share nothing.

use super::state::{Presence, WebhookRecord};
use crate::config::ProviderConfig;
use crate::shopify::errors::ShopifyError;
use crate::shopify::webhooks::ReadOutcome;
use thiserror::Error;

/// Failure of a lifecycle operation, prefixed with what was attempted.
/// Each message already carries the service error, so none is chained as a source.
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("could not create Shopify webhook: {0}")]
    Create(ShopifyError),

    #[error("could not retrieve Shopify webhook details: {0}")]
    Read(ShopifyError),

    #[error("could not update Shopify webhook: {0}")]
    Update(ShopifyError),

    #[error("could not delete Shopify webhook: {0}")]
    Delete(ShopifyError),

    #[error("cannot {operation} Shopify webhook: the record has no id")]
    MissingId { operation: &'static str },

    #[error("created Shopify webhook '{0}' but it could not be read back")]
    NotConfirmed(String),

    #[error("cannot import non-existent remote object: webhook '{0}' was not found")]
    ImportNotFound(String),
}

impl ReconcileError {
    /// The service error behind this failure, if any
    pub fn shopify_error(&self) -> Option<&ShopifyError> {
        match self {
            Self::Create(err) | Self::Read(err) | Self::Update(err) | Self::Delete(err) => {
                Some(err)
            }
            Self::MissingId { .. } | Self::NotConfirmed(_) | Self::ImportNotFound(_) => None,
        }
    }
}

fn require_id(record: &WebhookRecord, operation: &'static str) -> Result<String, ReconcileError> {
    record
        .id()
        .map(|id| id.to_string())
        .ok_or(ReconcileError::MissingId { operation })
}

/// Create the webhook, adopt the id Shopify assigns and confirm with a read.
///
/// The record is left untouched when the create call fails. Once Shopify
/// has accepted it the record keeps the new id, even when the confirmatory
/// read fails or finds nothing, so the caller can persist it.
pub async fn create(
    config: &ProviderConfig,
    record: &mut WebhookRecord,
) -> Result<Presence, ReconcileError> {
    let params = record.spec.to_input();
    let client = config.new_client().map_err(ReconcileError::Create)?;

    let webhook = client
        .webhooks()
        .create(&params)
        .await
        .map_err(ReconcileError::Create)?;

    tracing::info!("Created webhook ID='{}' for topic '{}'", webhook.id, webhook.input.topic);

    record.set_id(&webhook.id);
    record.apply(&webhook);

    match read(config, record).await? {
        Presence::Present => Ok(Presence::Present),
        Presence::Absent => {
            tracing::warn!("Created webhook ID='{}' was not found on confirmation", webhook.id);
            record.set_id(&webhook.id);
            Err(ReconcileError::NotConfirmed(webhook.id))
        }
    }
}

/// Refresh observed state. A webhook that no longer exists is not an error:
/// the id is cleared and [`Presence::Absent`] returned.
pub async fn read(
    config: &ProviderConfig,
    record: &mut WebhookRecord,
) -> Result<Presence, ReconcileError> {
    let id = require_id(record, "read")?;
    let client = config.new_client().map_err(ReconcileError::Read)?;

    match client
        .webhooks()
        .read(&id)
        .await
        .map_err(ReconcileError::Read)?
    {
        ReadOutcome::Absent => {
            tracing::debug!(
                "Removing webhook ID='{}' from state because it no longer exists in Shopify",
                id
            );
            record.clear_id();
            Ok(Presence::Absent)
        }
        ReadOutcome::Found(webhook) => {
            record.apply(&webhook);
            Ok(Presence::Present)
        }
    }
}

/// Replace the writable fields of an existing webhook, then confirm with a read.
pub async fn update(
    config: &ProviderConfig,
    record: &mut WebhookRecord,
) -> Result<Presence, ReconcileError> {
    let id = require_id(record, "update")?;
    let params = record.spec.to_input();
    let client = config.new_client().map_err(ReconcileError::Update)?;

    let webhook = client
        .webhooks()
        .update(&id, &params)
        .await
        .map_err(ReconcileError::Update)?;

    tracing::info!("Updated webhook ID='{}'", id);

    record.apply(&webhook);

    read(config, record).await
}

/// Delete the webhook and mark the record absent
pub async fn delete(config: &ProviderConfig, record: &mut WebhookRecord) -> Result<(), ReconcileError> {
    let id = require_id(record, "delete")?;
    let client = config.new_client().map_err(ReconcileError::Delete)?;

    client
        .webhooks()
        .delete(&id)
        .await
        .map_err(ReconcileError::Delete)?;

    tracing::info!("Deleted webhook ID='{}'", id);

    record.clear_id();
    Ok(())
}

/// Adopt an existing webhook by id. The id is taken as-is; every other
/// field comes from the read that follows.
pub async fn import(config: &ProviderConfig, id: &str) -> Result<WebhookRecord, ReconcileError> {
    let mut record = WebhookRecord::imported(id);

    match read(config, &mut record).await? {
        Presence::Present => {
            tracing::info!("Imported webhook ID='{}'", id);
            Ok(record)
        }
        Presence::Absent => Err(ReconcileError::ImportNotFound(id.to_string())),
    }
}

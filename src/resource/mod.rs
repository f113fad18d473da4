//! Resource reconciliation layer
//!
//! This module is the integration point for the hosting engine. It maps a
//! desired-state record onto Shopify API calls and folds the responses back
//! into observed state.
//!
//! # Architecture
//!
//! - [`state`] - Desired/observed record of one webhook resource
//! - [`webhook`] - Lifecycle entry points: create, read, update, delete, import
//!
//! # Lifecycle
//!
//! ```text
//! absent --create--> present --update*--> present --delete--> absent
//! present --read (not found)--> absent
//! ```
//!
//! # Example
//!
//! ```ignore
//! use shopify_webhooks::config::ProviderConfig;
//! use shopify_webhooks::resource::{self, WebhookRecord, WebhookSpec};
//!
//! async fn provision(config: &ProviderConfig, spec: WebhookSpec) -> anyhow::Result<WebhookRecord> {
//!     let mut record = WebhookRecord::new(spec);
//!     resource::create(config, &mut record).await?;
//!     Ok(record)
//! }
//! ```

pub mod state;
pub mod webhook;

pub use state::{Presence, WebhookRecord, WebhookSpec};
pub use webhook::{create, delete, import, read, update, ReconcileError};

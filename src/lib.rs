//! Reconciliation of Shopify webhook subscriptions
//!
//! Translates a declared webhook into Admin REST API calls, detects webhooks
//! deleted behind the caller's back, and folds Shopify's error payloads into
//! a single diagnostic.
//!
//! - [`shopify`] - API client, error normalization and the webhook service
//! - [`resource`] - Lifecycle entry points for the hosting engine
//! - [`config`] - Credentials and target store

pub mod config;
pub mod resource;
pub mod shopify;

pub use config::{Config, ConfigError, ProviderConfig};
pub use resource::{Presence, ReconcileError, WebhookRecord, WebhookSpec};

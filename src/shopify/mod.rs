//! Shopify Admin API interaction module
//!
//! This module provides everything needed to talk to the webhook collection of
//! a single Shopify store: the authenticated request template, the HTTP
//! transport wrapper, error normalization and the webhook CRUD service.
//!
//! # Module Structure
//!
//! - [`client`] - Request template holding the store identity and credentials
//! - [`http`] - HTTP utilities for REST API calls
//! - [`errors`] - Normalization of Shopify error payloads into one diagnostic
//! - [`webhooks`] - Create/Read/Update/Delete for webhook subscriptions
//!
//! # Example
//!
//! ```ignore
//! use shopify_webhooks::shopify::client::ShopifyClient;
//!
//! async fn example() -> Result<(), shopify_webhooks::shopify::errors::ShopifyError> {
//!     let client = ShopifyClient::new("my-store", "shpat_xxx", Some("2023-10"))?;
//!     let outcome = client.webhooks().read("42").await?;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod errors;
pub mod http;
pub mod webhooks;

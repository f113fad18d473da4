//! Shared fixtures for integration tests
//!
//! `FakeShop` is a tiny in-memory webhook collection served through
//! wiremock, so lifecycle tests can run create/read/update/delete against
//! something that keeps state between calls.

#![allow(dead_code)]

use serde_json::{json, Value};
use shopify_webhooks::{ProviderConfig, WebhookSpec};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use wiremock::matchers::path_regex;
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

pub const TOKEN: &str = "test-token";
pub const COLLECTION: &str = "/admin/webhooks/";
pub const CREATED_AT: &str = "2023-10-01T12:00:00-04:00";
pub const API_VERSION: &str = "2023-10";

pub fn config_for(server: &MockServer) -> ProviderConfig {
    ProviderConfig::new("test-store", TOKEN, None).with_endpoint(&server.uri())
}

pub fn order_spec() -> WebhookSpec {
    WebhookSpec {
        topic: "orders/create".to_string(),
        address: "https://example.com/hook".to_string(),
        format: "json".to_string(),
        ..Default::default()
    }
}

#[derive(Clone, Default)]
pub struct FakeShop {
    webhooks: Arc<Mutex<HashMap<String, Value>>>,
    next_id: Arc<AtomicU64>,
}

impl FakeShop {
    pub async fn mount(server: &MockServer) -> Self {
        let shop = Self {
            next_id: Arc::new(AtomicU64::new(1000)),
            ..Default::default()
        };
        Mock::given(path_regex(r"^/admin/webhooks/.*$"))
            .respond_with(shop.clone())
            .mount(server)
            .await;
        shop
    }

    /// Remove a webhook behind the client's back
    pub fn forget(&self, id: &str) {
        self.webhooks.lock().unwrap().remove(id);
    }

    pub fn contains(&self, id: &str) -> bool {
        self.webhooks.lock().unwrap().contains_key(id)
    }

    pub fn insert(&self, id: &str, webhook: Value) {
        self.webhooks.lock().unwrap().insert(id.to_string(), webhook);
    }

    fn writable(input: &Value) -> Result<Value, ResponseTemplate> {
        let address = input["address"].as_str().unwrap_or_default();
        if !address.starts_with("https://") {
            return Err(ResponseTemplate::new(422)
                .set_body_json(json!({"errors": {"address": ["is invalid"]}})));
        }
        Ok(json!({
            "topic": input["topic"],
            "address": input["address"],
            "format": input["format"],
            "fields": input["fields"],
            "metafield_namespaces": input["metafield_namespaces"],
            "private_metafield_namespaces": input["private_metafield_namespaces"],
        }))
    }

    fn not_found() -> ResponseTemplate {
        ResponseTemplate::new(404).set_body_json(json!({"errors": "Not Found"}))
    }
}

impl Respond for FakeShop {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let id = request
            .url
            .path()
            .strip_prefix(COLLECTION)
            .unwrap_or_default()
            .to_string();
        let body: Value = serde_json::from_slice(&request.body).unwrap_or(Value::Null);
        let mut webhooks = self.webhooks.lock().unwrap();

        match (request.method.as_str(), id.is_empty()) {
            ("POST", true) => {
                let mut webhook = match Self::writable(&body["webhook"]) {
                    Ok(webhook) => webhook,
                    Err(rejection) => return rejection,
                };
                let id = self.next_id.fetch_add(1, Ordering::SeqCst);
                webhook["id"] = json!(id);
                webhook["created_at"] = json!(CREATED_AT);
                webhook["updated_at"] = json!(CREATED_AT);
                webhook["api_version"] = json!(API_VERSION);
                webhooks.insert(id.to_string(), webhook.clone());
                ResponseTemplate::new(201).set_body_json(json!({ "webhook": webhook }))
            }
            ("GET", false) => match webhooks.get(&id) {
                Some(webhook) => {
                    ResponseTemplate::new(200).set_body_json(json!({ "webhook": webhook }))
                }
                None => Self::not_found(),
            },
            ("PUT", false) => {
                let Some(existing) = webhooks.get(&id).cloned() else {
                    return Self::not_found();
                };
                let mut webhook = match Self::writable(&body["webhook"]) {
                    Ok(webhook) => webhook,
                    Err(rejection) => return rejection,
                };
                for key in ["id", "created_at", "updated_at", "api_version"] {
                    webhook[key] = existing[key].clone();
                }
                webhooks.insert(id, webhook.clone());
                ResponseTemplate::new(200).set_body_json(json!({ "webhook": webhook }))
            }
            ("DELETE", false) => match webhooks.remove(&id) {
                Some(_) => ResponseTemplate::new(200).set_body_json(json!({})),
                None => Self::not_found(),
            },
            _ => ResponseTemplate::new(405),
        }
    }
}

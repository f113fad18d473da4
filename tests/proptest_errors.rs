//! Property-based tests using proptest
//!
//! These tests check the error normalizer, id escaping and the mapping
//! between declared fields and the wire input over randomized inputs.

use proptest::prelude::*;
use serde_json::{Map, Value};
use shopify_webhooks::shopify::client::ShopifyClient;
use shopify_webhooks::shopify::errors::{decode_errors, relevant_error};
use shopify_webhooks::shopify::webhooks::escape_id;
use shopify_webhooks::WebhookSpec;

const FIELD_TAGS: [&str; 6] = [
    "topic",
    "address",
    "format",
    "fields",
    "metafield_namespaces",
    "private_metafield_namespaces",
];

/// Messages without colons or brackets, so they never look like a tag
fn arb_messages() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z][a-z ]{0,12}", 1..4)
}

/// An `errors` object with a random subset of field arrays present
fn arb_error_fields() -> impl Strategy<Value = Vec<Option<Vec<String>>>> {
    prop::collection::vec(prop::option::of(arb_messages()), FIELD_TAGS.len())
}

fn errors_body(fields: &[Option<Vec<String>>]) -> String {
    let mut errors = Map::new();
    for (tag, messages) in FIELD_TAGS.iter().zip(fields) {
        if let Some(messages) = messages {
            errors.insert(tag.to_string(), Value::from(messages.clone()));
        }
    }
    serde_json::json!({ "errors": errors }).to_string()
}

fn arb_strings() -> impl Strategy<Value = Option<Vec<String>>> {
    prop::option::of(prop::collection::vec("[a-z_/]{1,10}", 0..5))
}

proptest! {
    /// Exactly the present fields show up, each as `<tag>: [...]`, in fixed order
    #[test]
    fn rendered_tags_match_present_fields(fields in arb_error_fields()) {
        let message = decode_errors(&errors_body(&fields)).render();

        if fields.iter().all(Option::is_none) {
            prop_assert_eq!(message, "");
            return Ok(());
        }

        prop_assert!(message.starts_with("Shopify: "));
        let mut last_position = 0;
        for (tag, messages) in FIELD_TAGS.iter().zip(&fields) {
            let needle = format!(" {}: [", tag);
            match messages {
                Some(messages) => {
                    let expected = format!(" {}: [{}]", tag, messages.join(" "));
                    let position = message.find(&expected);
                    prop_assert!(position.is_some(), "{} missing from {}", expected, message);
                    let position = position.unwrap_or_default();
                    prop_assert!(position >= last_position);
                    last_position = position;
                }
                None => prop_assert!(!message.contains(&needle), "{} unexpected in {}", needle, message),
            }
        }
    }

    /// A success status with no structured error is never a failure
    #[test]
    fn success_without_errors_is_ok(body in prop_oneof![
        Just(String::new()),
        Just("{}".to_string()),
        Just(r#"{"errors":null}"#.to_string()),
        "[a-z ]{0,20}",
    ]) {
        prop_assert!(relevant_error(reqwest::StatusCode::OK, &body).is_ok());
    }

    /// Escaped ids are a single segment under the collection, the same for every verb
    #[test]
    fn escaped_id_is_single_segment(id in "[a-zA-Z0-9/?# %&]{1,20}") {
        let client = ShopifyClient::new("acme", "token", None).unwrap();
        let url = client.webhooks().webhook_url(&id);
        let escaped = escape_id(&id);
        let segment = url.strip_prefix("https://acme.myshopify.com/admin/webhooks/");

        prop_assert_eq!(segment, Some(escaped.as_str()));
        prop_assert!(!escaped.contains(|c: char| matches!(c, '/' | '?' | '#' | ' ')));
    }

    /// Declared fields reach the wire unchanged; omitted sequences become empty
    #[test]
    fn spec_maps_onto_input(
        fields in arb_strings(),
        metafield_namespaces in arb_strings(),
        private_metafield_namespaces in arb_strings(),
    ) {
        let spec = WebhookSpec {
            topic: "orders/create".to_string(),
            address: "https://example.com/hook".to_string(),
            format: "json".to_string(),
            fields: fields.clone(),
            metafield_namespaces: metafield_namespaces.clone(),
            private_metafield_namespaces: private_metafield_namespaces.clone(),
        };
        let input = spec.to_input();

        prop_assert_eq!(input.fields, fields.unwrap_or_default());
        prop_assert_eq!(input.metafield_namespaces, metafield_namespaces.unwrap_or_default());
        prop_assert_eq!(
            input.private_metafield_namespaces,
            private_metafield_namespaces.unwrap_or_default()
        );
    }
}

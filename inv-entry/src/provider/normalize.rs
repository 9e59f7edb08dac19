//! Response-shape normalization for the HTTP suggestion service
//!
//! Accepted option payloads:
//! - `["a", "b"]`
//! - `[{"name": "a"}, {"label": "b"}, {"id": 3}]` - name, then label, then id;
//!   objects with none of them become their JSON text
//! - `{"data": ["a", {"name": "b"}]}` - items are strings or objects with
//!   name/label
//!
//! Accepted identifier payloads: an object carrying `uuid`, `id` or `serial`.
//!
//! Everything else is malformed (`None`).

use serde_json::{Map, Value};

/// Normalize an option-list payload
pub fn normalize_options(payload: &Value) -> Option<Vec<String>> {
    match payload {
        Value::Array(items) => items.iter().map(top_level_item).collect(),
        Value::Object(map) => match map.get("data") {
            Some(Value::Array(items)) => items.iter().map(wrapped_item).collect(),
            _ => None,
        },
        _ => None,
    }
}

/// Normalize an identifier payload
pub fn normalize_identifier(payload: &Value) -> Option<String> {
    let map = payload.as_object()?;
    ["uuid", "id", "serial"]
        .iter()
        .find_map(|field| scalar_text(map.get(*field)?).filter(|id| !id.trim().is_empty()))
}

fn top_level_item(item: &Value) -> Option<String> {
    match item {
        Value::String(s) => Some(s.clone()),
        Value::Object(map) => {
            Some(named_field(map, &["name", "label", "id"]).unwrap_or_else(|| item.to_string()))
        }
        _ => None,
    }
}

fn wrapped_item(item: &Value) -> Option<String> {
    match item {
        Value::String(s) => Some(s.clone()),
        Value::Object(map) => named_field(map, &["name", "label"]),
        _ => None,
    }
}

fn named_field(map: &Map<String, Value>, fields: &[&str]) -> Option<String> {
    fields
        .iter()
        .find_map(|field| map.get(*field).and_then(scalar_text).filter(|text| !text.is_empty()))
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_string_list() {
        let out = normalize_options(&json!(["Samsung", "Apple", "Samsung"])).unwrap();
        // Duplicates are preserved
        assert_eq!(out, vec!["Samsung", "Apple", "Samsung"]);
    }

    #[test]
    fn test_empty_list_is_valid() {
        assert_eq!(normalize_options(&json!([])), Some(vec![]));
    }

    #[test]
    fn test_object_list_field_priority() {
        let out = normalize_options(&json!([
            {"name": "Phones", "label": "ignored"},
            {"label": "Audio"},
            {"id": 42},
            {"other": true}
        ]))
        .unwrap();
        assert_eq!(out, vec!["Phones", "Audio", "42", r#"{"other":true}"#]);
    }

    #[test]
    fn test_wrapped_data() {
        let out = normalize_options(&json!({"data": ["Red", {"name": "Blue"}, {"label": "Green"}]}))
            .unwrap();
        assert_eq!(out, vec!["Red", "Blue", "Green"]);
    }

    #[test]
    fn test_wrapped_item_without_name_is_malformed() {
        assert!(normalize_options(&json!({"data": [{"id": 1}]})).is_none());
    }

    #[test]
    fn test_malformed_shapes() {
        assert!(normalize_options(&json!("Samsung")).is_none());
        assert!(normalize_options(&json!(42)).is_none());
        assert!(normalize_options(&json!({"items": ["a"]})).is_none());
        assert!(normalize_options(&json!({"data": "a"})).is_none());
        assert!(normalize_options(&json!([1, 2, 3])).is_none());
        assert!(normalize_options(&json!(["a", null])).is_none());
    }

    #[test]
    fn test_identifier_fields() {
        assert_eq!(normalize_identifier(&json!({"uuid": "U-1"})).as_deref(), Some("U-1"));
        assert_eq!(normalize_identifier(&json!({"id": "I-1", "serial": "S"})).as_deref(), Some("I-1"));
        assert_eq!(normalize_identifier(&json!({"serial": "S-9"})).as_deref(), Some("S-9"));
        assert_eq!(normalize_identifier(&json!({"id": 7})).as_deref(), Some("7"));
    }

    #[test]
    fn test_identifier_malformed() {
        assert!(normalize_identifier(&json!({})).is_none());
        assert!(normalize_identifier(&json!({"uuid": ""})).is_none());
        assert_eq!(normalize_identifier(&json!({"uuid": "", "serial": "S-1"})).as_deref(), Some("S-1"));
        assert!(normalize_identifier(&json!(["U-1"])).is_none());
        assert!(normalize_identifier(&json!("U-1")).is_none());
    }
}

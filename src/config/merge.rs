//! Decoding YAML config documents into option layers.
//!
//! A layer is merged key-wise into the store: top-level keys in the layer
//! replace the store's values, everything else is left alone. Nested
//! mappings are replaced entirely, never merged recursively.

use crate::options::{OptionStore, OptionValue};
use serde::Deserialize;
use serde_yaml::Value;
use std::collections::BTreeMap;

/// Parse a YAML document into an option layer.
///
/// - A top-level mapping contributes one option per key
/// - A `null` value means "not specified" and is dropped from the layer
/// - An empty document or a non-mapping document contributes nothing
pub fn parse_layer(content: &str) -> Result<OptionStore, serde_yaml::Error> {
    if content.trim().is_empty() {
        return Ok(OptionStore::new());
    }
    // Only the first document counts; later `---` documents are ignored.
    let Some(first) = serde_yaml::Deserializer::from_str(content).next() else {
        return Ok(OptionStore::new());
    };
    let document = Value::deserialize(first)?;
    Ok(layer_from_value(document))
}

/// Convert an already-decoded YAML value into an option layer.
pub fn layer_from_value(document: Value) -> OptionStore {
    let Value::Mapping(mapping) = document else {
        return OptionStore::new();
    };

    mapping
        .into_iter()
        .filter_map(|(key, value)| {
            let name = scalar_to_string(&key)?;
            let value = option_from_value(value)?;
            Some((name, value))
        })
        .collect()
}

fn option_from_value(value: Value) -> Option<OptionValue> {
    match value {
        Value::Null => None,
        Value::Bool(b) => Some(OptionValue::Bool(b)),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(OptionValue::Int(i))
            } else if n.as_u64().is_some() {
                // Beyond i64: keep the exact digits rather than a lossy float.
                Some(OptionValue::String(n.to_string()))
            } else {
                n.as_f64().map(OptionValue::Float)
            }
        }
        Value::String(s) => Some(OptionValue::String(s)),
        Value::Sequence(items) => Some(OptionValue::List(
            items.iter().map(nested_to_string).collect(),
        )),
        Value::Mapping(mapping) => {
            let map: BTreeMap<String, String> = mapping
                .iter()
                .filter_map(|(k, v)| Some((scalar_to_string(k)?, nested_to_string(v))))
                .collect();
            Some(OptionValue::Map(map))
        }
        Value::Tagged(tagged) => option_from_value(tagged.value),
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Stringify a value nested inside a sequence or mapping.
fn nested_to_string(value: &Value) -> String {
    if let Some(s) = scalar_to_string(value) {
        return s;
    }
    match value {
        Value::Null => String::new(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn merge(store: &mut OptionStore, content: &str) {
        store.merge(parse_layer(content).unwrap());
    }

    #[test]
    fn test_merge_simple_layers() {
        let mut store = OptionStore::new();
        merge(&mut store, "a: 1\nb: 2\n");
        merge(&mut store, "b: 3\nc: 4\n");

        assert_eq!(store.get("a"), Some(&OptionValue::Int(1)));
        assert_eq!(store.get("b"), Some(&OptionValue::Int(3)));
        assert_eq!(store.get("c"), Some(&OptionValue::Int(4)));
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_scalar_types() {
        let layer = parse_layer(
            r#"
endpoint: https://jira.example.com
max_results: 25
ratio: 0.5
noedit: true
"#,
        )
        .unwrap();

        assert_eq!(layer.get_str("endpoint"), Some("https://jira.example.com"));
        assert_eq!(layer.get("max_results"), Some(&OptionValue::Int(25)));
        assert_eq!(layer.get("ratio"), Some(&OptionValue::Float(0.5)));
        assert_eq!(layer.get_bool("noedit"), Some(true));
    }

    #[test]
    fn test_nested_mapping_replaced_not_merged() {
        let mut store = OptionStore::new();
        merge(&mut store, "overrides:\n  priority: High\n  labels: ops\n");
        merge(&mut store, "overrides:\n  priority: Low\n");

        let overrides = store.get("overrides").and_then(OptionValue::as_map).unwrap();
        assert_eq!(overrides.len(), 1);
        assert_eq!(overrides.get("priority").map(String::as_str), Some("Low"));
    }

    #[test]
    fn test_sequence_becomes_list() {
        let layer = parse_layer("watchers: [alice, bob, 3]\n").unwrap();
        assert_eq!(
            layer.get("watchers"),
            Some(&OptionValue::List(vec![
                "alice".to_string(),
                "bob".to_string(),
                "3".to_string()
            ]))
        );
    }

    #[test]
    fn test_null_preserves_prior_value() {
        let mut store = OptionStore::new();
        store.set("project", "ABC");
        merge(&mut store, "project:\nuser: bob\n");

        assert_eq!(store.get_str("project"), Some("ABC"));
        assert_eq!(store.get_str("user"), Some("bob"));
    }

    #[test]
    fn test_empty_and_non_mapping_documents_contribute_nothing() {
        assert!(parse_layer("").unwrap().is_empty());
        assert!(parse_layer("- a\n- b\n").unwrap().is_empty());
        assert!(parse_layer("just a string").unwrap().is_empty());
    }

    #[test]
    fn test_malformed_yaml_is_an_error() {
        assert!(parse_layer("a: [unclosed\n").is_err());
    }

    #[test]
    fn test_only_first_document_is_used() {
        let layer = parse_layer("---\nendpoint: https://a\n---\nproject: B\n").unwrap();
        assert_eq!(layer.get_str("endpoint"), Some("https://a"));
        assert!(!layer.contains("project"));
    }

    #[test]
    fn test_integer_beyond_i64_keeps_exact_digits() {
        let layer = parse_layer("id: 18446744073709551615\nsmall: -3\n").unwrap();
        assert_eq!(layer.get_str("id"), Some("18446744073709551615"));
        assert_eq!(layer.get("small"), Some(&OptionValue::Int(-3)));
    }
}

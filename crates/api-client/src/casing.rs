//! Response key normalization
//!
//! The API speaks snake_case; every successful payload is re-keyed to
//! camelCase before typed deserialization. Keys without an underscore pass
//! through untouched, which makes the conversion idempotent.

use serde_json::{Map, Value};
use std::borrow::Cow;

/// Convert one snake_case key to camelCase.
///
/// `"uptime_sli_30"` becomes `"uptimeSli30"`; empty segments from leading,
/// trailing or doubled underscores are dropped.
#[must_use]
pub fn to_camel_case(key: &str) -> Cow<'_, str> {
    if !key.contains('_') {
        return Cow::Borrowed(key);
    }

    let mut out = String::with_capacity(key.len());
    for segment in key.split('_').filter(|s| !s.is_empty()) {
        if out.is_empty() {
            out.push_str(segment);
            continue;
        }
        let mut chars = segment.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    Cow::Owned(out)
}

/// Recursively re-key every object in `value`
#[must_use]
pub fn normalize_keys(value: Value) -> Value {
    normalize_keys_with::<&str>(value, &[])
}

/// Recursively re-key every object in `value`, leaving the contents of any
/// key listed in `preserve` as received.
///
/// The preserved key itself is still converted; only what sits below it is
/// left alone. HTTP header maps are the usual reason to preserve.
#[must_use]
pub fn normalize_keys_with<S: AsRef<str>>(value: Value, preserve: &[S]) -> Value {
    match value {
        Value::Object(map) => Value::Object(normalize_map(map, preserve)),
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| normalize_keys_with(item, preserve))
                .collect(),
        ),
        other => other,
    }
}

fn normalize_map<S: AsRef<str>>(map: Map<String, Value>, preserve: &[S]) -> Map<String, Value> {
    map.into_iter()
        .map(|(key, value)| {
            let camel = to_camel_case(&key).into_owned();
            let keep = preserve
                .iter()
                .any(|p| p.as_ref() == key || p.as_ref() == camel);
            let value = if keep {
                value
            } else {
                normalize_keys_with(value, preserve)
            };
            (camel, value)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_camel_case_keys() {
        assert_eq!(to_camel_case("team_id"), "teamId");
        assert_eq!(to_camel_case("uptime_sli_30"), "uptimeSli30");
        assert_eq!(to_camel_case("_private__key_"), "privateKey");
        assert_eq!(to_camel_case("createdAt"), "createdAt");
        assert!(matches!(to_camel_case("name"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_nested_objects_and_arrays() {
        let input = json!({"team_id": "1", "nested": {"created_at": "x"}});
        assert_eq!(
            normalize_keys(input),
            json!({"teamId": "1", "nested": {"createdAt": "x"}})
        );

        let input = json!({"data": [{"monitor_id": "7", "incidents": [{"resolved_at": null}]}]});
        assert_eq!(
            normalize_keys(input),
            json!({"data": [{"monitorId": "7", "incidents": [{"resolvedAt": null}]}]})
        );
    }

    #[test]
    fn test_scalars_untouched() {
        assert_eq!(normalize_keys(json!("snake_case_value")), json!("snake_case_value"));
        assert_eq!(normalize_keys(Value::Null), Value::Null);
    }

    #[test]
    fn test_preserved_children() {
        let input = json!({
            "config": {"max_redirects": 3, "headers": {"X_Custom_Header": "a_b"}}
        });
        let out = normalize_keys_with(input, &["headers"]);
        assert_eq!(
            out,
            json!({"config": {"maxRedirects": 3, "headers": {"X_Custom_Header": "a_b"}}})
        );
    }

    fn snake_key() -> impl Strategy<Value = String> {
        prop::collection::vec("[a-z][a-z0-9]{0,6}", 1..4).prop_map(|parts| parts.join("_"))
    }

    fn json_tree() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            "[a-z_]{0,8}".prop_map(Value::String),
        ];
        leaf.prop_recursive(3, 24, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
                prop::collection::btree_map(snake_key(), inner, 0..4)
                    .prop_map(|m| Value::Object(m.into_iter().collect())),
            ]
        })
    }

    fn has_underscore_key(value: &Value) -> bool {
        match value {
            Value::Object(map) => map
                .iter()
                .any(|(k, v)| k.contains('_') || has_underscore_key(v)),
            Value::Array(items) => items.iter().any(has_underscore_key),
            _ => false,
        }
    }

    proptest! {
        #[test]
        fn normalization_is_idempotent(tree in json_tree()) {
            let once = normalize_keys(tree);
            prop_assert_eq!(normalize_keys(once.clone()), once);
        }

        #[test]
        fn normalized_keys_have_no_underscores(tree in json_tree()) {
            prop_assert!(!has_underscore_key(&normalize_keys(tree)));
        }
    }
}

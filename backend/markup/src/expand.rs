//! Nested JSON expansion.
//!
//! Tool outputs frequently carry JSON that was serialised into a string field,
//! sometimes several times over. Expansion walks a value and replaces every
//! string that strictly parses as a JSON object or array with an
//! [`ExpandedValue::NestedJson`] wrapper around the decoded document.
//!
//! Each step into a map, list or wrapper spends one unit of depth; at depth 0
//! the value is copied as-is, so expansion always terminates.

use serde_json::Value;
use tracing::trace;

use sampleview_core::ExpandedValue;

pub use sampleview_core::DEFAULT_MAX_DEPTH;

/// True for text that is `{…}` or `[…]` once trimmed.
pub fn looks_like_json(text: &str) -> bool {
    let trimmed = text.trim();
    (trimmed.starts_with('{') && trimmed.ends_with('}'))
        || (trimmed.starts_with('[') && trimmed.ends_with(']'))
}

/// Strictly parse JSON-shaped text, `None` otherwise.
fn parse_json_shaped(text: &str) -> Option<Value> {
    if !looks_like_json(text) {
        return None;
    }
    match serde_json::from_str(text.trim()) {
        Ok(value) => Some(value),
        Err(e) => {
            trace!(error = %e, "JSON-shaped string did not parse; keeping literal");
            None
        }
    }
}

/// Expand JSON-encoded strings inside `value`, up to `max_depth` levels.
pub fn expand_nested_json(value: &Value, max_depth: u32) -> ExpandedValue {
    if max_depth == 0 {
        return ExpandedValue::from(value);
    }
    let next = max_depth - 1;
    match value {
        Value::Object(map) => ExpandedValue::Map(
            map.iter()
                .map(|(k, v)| (k.clone(), expand_nested_json(v, next)))
                .collect(),
        ),
        Value::Array(items) => {
            ExpandedValue::List(items.iter().map(|v| expand_nested_json(v, next)).collect())
        }
        Value::String(s) => match parse_json_shaped(s) {
            Some(parsed) => ExpandedValue::NestedJson(Box::new(expand_nested_json(&parsed, next))),
            None => ExpandedValue::String(s.clone()),
        },
        Value::Null => ExpandedValue::Null,
        Value::Bool(b) => ExpandedValue::Bool(*b),
        Value::Number(n) => ExpandedValue::Number(n.clone()),
    }
}

/// Run expansion again over an already expanded value.
///
/// Wrappers spend depth exactly as the string they replaced did, so running
/// this with the budget of the first pass changes nothing.
pub fn expand_expanded(value: &ExpandedValue, max_depth: u32) -> ExpandedValue {
    if max_depth == 0 {
        return value.clone();
    }
    let next = max_depth - 1;
    match value {
        ExpandedValue::Map(entries) => ExpandedValue::Map(
            entries
                .iter()
                .map(|(k, v)| (k.clone(), expand_expanded(v, next)))
                .collect(),
        ),
        ExpandedValue::List(items) => {
            ExpandedValue::List(items.iter().map(|v| expand_expanded(v, next)).collect())
        }
        ExpandedValue::NestedJson(inner) => {
            ExpandedValue::NestedJson(Box::new(expand_expanded(inner, next)))
        }
        ExpandedValue::String(s) => match parse_json_shaped(s) {
            Some(parsed) => ExpandedValue::NestedJson(Box::new(expand_nested_json(&parsed, next))),
            None => value.clone(),
        },
        leaf => leaf.clone(),
    }
}

/// Parse a whole JSON document from text and expand the strings inside it.
///
/// This is the entry point for section bodies and tool outputs: the text
/// itself is the document, so the top level is not wrapped. Returns `None`
/// when the text is not a JSON object or array.
pub fn expand_json_text(text: &str, max_depth: u32) -> Option<ExpandedValue> {
    parse_json_shaped(text).map(|parsed| expand_nested_json(&parsed, max_depth))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn expand(value: Value) -> Value {
        expand_nested_json(&value, DEFAULT_MAX_DEPTH).to_json()
    }

    #[test]
    fn scalars_pass_through() {
        assert_eq!(expand(json!("Hello World")), json!("Hello World"));
        assert_eq!(expand(json!(42)), json!(42));
        assert_eq!(expand(json!(2.5)), json!(2.5));
        assert_eq!(expand(json!(true)), json!(true));
        assert_eq!(expand(Value::Null), Value::Null);
    }

    #[test]
    fn structures_without_json_strings_are_unchanged() {
        let data = json!({"key": "value", "number": 42, "list": ["a", "b", 1]});
        assert_eq!(expand(data.clone()), data);
    }

    #[test]
    fn json_string_in_map_is_wrapped() {
        let result = expand(json!({"output": "{\"inner\":5}"}));
        assert_eq!(
            result,
            json!({"output": {"isNestedJson": true, "content": {"inner": 5}}})
        );
    }

    #[test]
    fn json_array_string_is_wrapped() {
        let result = expand(json!({"items": "[\"a\", \"b\"]"}));
        assert_eq!(result["items"]["content"], json!(["a", "b"]));
    }

    #[test]
    fn deeply_nested_strings_expand_level_by_level() {
        let level3 = r#"{"level": 3, "data": "deep"}"#;
        let level2 = json!({"level": 2, "nested": level3}).to_string();
        let result = expand(json!({"level": 1, "nested": level2}));
        assert_eq!(result["nested"]["content"]["level"], json!(2));
        assert_eq!(result["nested"]["content"]["nested"]["isNestedJson"], json!(true));
        assert_eq!(result["nested"]["content"]["nested"]["content"]["data"], json!("deep"));
    }

    #[test]
    fn invalid_json_string_is_left_unchanged() {
        let data = json!({"output": "{not valid json}"});
        assert_eq!(expand(data.clone()), data);
    }

    #[test]
    fn json_scalars_in_strings_are_not_expanded() {
        let data = json!({"n": "42", "s": "\"quoted\"", "t": "true"});
        assert_eq!(expand(data.clone()), data);
    }

    #[test]
    fn surrounding_whitespace_is_tolerated() {
        let result = expand(json!({"o": "  {\"a\": 1}\n"}));
        assert_eq!(result["o"]["content"], json!({"a": 1}));
    }

    #[test]
    fn depth_budget_stops_expansion() {
        // map -> string -> parsed map -> inner string: four levels to reach it.
        let data = json!({"outer": json!({"inner": "{\"x\": 1}"}).to_string()});
        let shallow = expand_nested_json(&data, 3).to_json();
        assert_eq!(shallow["outer"]["content"]["inner"], json!("{\"x\": 1}"));
        let deep = expand_nested_json(&data, 4).to_json();
        assert_eq!(deep["outer"]["content"]["inner"]["content"], json!({"x": 1}));
    }

    #[test]
    fn top_level_string_document_is_wrapped() {
        let result = expand_nested_json(&json!("[1, 2]"), DEFAULT_MAX_DEPTH);
        assert!(matches!(result, ExpandedValue::NestedJson(_)));
    }

    #[test]
    fn json_text_entry_point_does_not_wrap_top_level() {
        let result = expand_json_text("{\"a\":1}", DEFAULT_MAX_DEPTH).unwrap();
        assert_eq!(result.to_json(), json!({"a": 1}));
        assert!(expand_json_text("not json", DEFAULT_MAX_DEPTH).is_none());
        assert!(expand_json_text("{broken", DEFAULT_MAX_DEPTH).is_none());
    }

    fn json_value() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i32>().prop_map(|n| json!(n)),
            "[a-z {}\\[\\]\":,0-9]{0,12}".prop_map(Value::String),
        ];
        leaf.prop_recursive(4, 32, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
                prop::collection::vec(("[a-z]{1,4}", inner.clone()), 0..4)
                    .prop_map(|entries| Value::Object(entries.into_iter().collect())),
                // A JSON document smuggled inside a string.
                inner.prop_map(|v| Value::String(v.to_string())),
            ]
        })
    }

    proptest! {
        #[test]
        fn prop_depth_zero_is_identity(value in json_value()) {
            prop_assert_eq!(expand_nested_json(&value, 0).to_json(), value);
        }

        #[test]
        fn prop_second_pass_is_noop(value in json_value()) {
            let once = expand_nested_json(&value, DEFAULT_MAX_DEPTH);
            let twice = expand_expanded(&once, DEFAULT_MAX_DEPTH);
            prop_assert_eq!(twice, once);
        }

        #[test]
        fn prop_non_json_strings_are_byte_identical(text in "[^\\[{]*") {
            let result = expand_nested_json(&Value::String(text.clone()), DEFAULT_MAX_DEPTH);
            prop_assert_eq!(result, ExpandedValue::String(text));
        }
    }
}

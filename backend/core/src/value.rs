//! Expanded JSON values.
//!
//! An [`ExpandedValue`] is an ordinary JSON tree in which some strings have been
//! replaced by the JSON document they encoded. The replacement is explicit: a
//! [`ExpandedValue::NestedJson`] node only ever stands where a string stood.

use serde_json::{Map, Number, Value};

/// Key set on the annotation map when a wrapper is converted back to JSON.
pub const NESTED_JSON_FLAG: &str = "isNestedJson";

/// Key carrying the decoded document inside the annotation map.
pub const NESTED_JSON_CONTENT: &str = "content";

#[derive(Debug, Clone, PartialEq)]
pub enum ExpandedValue {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    List(Vec<ExpandedValue>),
    /// Entries keep their source order.
    Map(Vec<(String, ExpandedValue)>),
    /// A string that decoded as JSON, holding the (further expanded) document.
    NestedJson(Box<ExpandedValue>),
}

impl ExpandedValue {
    /// Convert back to JSON, writing wrappers as
    /// `{"isNestedJson": true, "content": ...}`.
    pub fn to_json(&self) -> Value {
        self.convert(false)
    }

    /// Convert back to JSON with every wrapper replaced by its bare content.
    pub fn to_inline_json(&self) -> Value {
        self.convert(true)
    }

    /// Two-space indented JSON text.
    pub fn to_pretty_string(&self, inline: bool) -> String {
        let value = self.convert(inline);
        serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string())
    }

    fn convert(&self, inline: bool) -> Value {
        match self {
            ExpandedValue::Null => Value::Null,
            ExpandedValue::Bool(b) => Value::Bool(*b),
            ExpandedValue::Number(n) => Value::Number(n.clone()),
            ExpandedValue::String(s) => Value::String(s.clone()),
            ExpandedValue::List(items) => {
                Value::Array(items.iter().map(|item| item.convert(inline)).collect())
            }
            ExpandedValue::Map(entries) => {
                let mut map = Map::new();
                for (k, v) in entries {
                    map.insert(k.clone(), v.convert(inline));
                }
                Value::Object(map)
            }
            ExpandedValue::NestedJson(inner) if inline => inner.convert(inline),
            ExpandedValue::NestedJson(inner) => {
                let mut map = Map::new();
                map.insert(NESTED_JSON_FLAG.to_string(), Value::Bool(true));
                map.insert(NESTED_JSON_CONTENT.to_string(), inner.convert(inline));
                Value::Object(map)
            }
        }
    }
}

/// Structural copy without any expansion.
impl From<&Value> for ExpandedValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => ExpandedValue::Null,
            Value::Bool(b) => ExpandedValue::Bool(*b),
            Value::Number(n) => ExpandedValue::Number(n.clone()),
            Value::String(s) => ExpandedValue::String(s.clone()),
            Value::Array(items) => ExpandedValue::List(items.iter().map(Self::from).collect()),
            Value::Object(map) => ExpandedValue::Map(
                map.iter()
                    .map(|(k, v)| (k.clone(), Self::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<Value> for ExpandedValue {
    fn from(value: Value) -> Self {
        Self::from(&value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn plain_copy_round_trips() {
        let value = json!({"b": [1, "two", null], "a": {"c": true}});
        let expanded = ExpandedValue::from(&value);
        assert_eq!(expanded.to_json(), value);
    }

    #[test]
    fn map_order_is_preserved() {
        let value = json!({"zeta": 1, "alpha": 2, "mid": 3});
        let expanded = ExpandedValue::from(&value);
        let ExpandedValue::Map(entries) = expanded else {
            panic!("expected map");
        };
        let keys: Vec<_> = entries.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn wrapper_serializes_with_annotation_keys() {
        let wrapped = ExpandedValue::NestedJson(Box::new(ExpandedValue::from(json!({"inner": 5}))));
        assert_eq!(wrapped.to_json(), json!({"isNestedJson": true, "content": {"inner": 5}}));
        assert_eq!(wrapped.to_inline_json(), json!({"inner": 5}));
    }

    #[test]
    fn pretty_string_uses_two_space_indent() {
        let expanded = ExpandedValue::from(json!({"a": 1}));
        assert_eq!(expanded.to_pretty_string(false), "{\n  \"a\": 1\n}");
    }
}

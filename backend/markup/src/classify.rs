//! Content classifier: markup text vs. plain JSON display.

use serde_json::Value;

use sampleview_core::ClassifierOptions;

/// True when `text` is long enough and contains one of the indicators.
pub fn is_markup_text(text: &str, options: &ClassifierOptions) -> bool {
    text.chars().count() > options.min_chars
        && options.indicators.iter().any(|indicator| text.contains(indicator.as_str()))
}

/// True when any string in the tree is markup.
pub fn looks_like_markup(value: &Value, options: &ClassifierOptions) -> bool {
    match value {
        Value::String(s) => is_markup_text(s, options),
        Value::Object(map) => map.values().any(|v| looks_like_markup(v, options)),
        Value::Array(items) => items.iter().any(|v| looks_like_markup(v, options)),
        Value::Null | Value::Bool(_) | Value::Number(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn long(text: &str) -> String {
        format!("{}{}", "x".repeat(100), text)
    }

    #[test]
    fn short_strings_are_never_markup() {
        let options = ClassifierOptions::default();
        assert!(!looks_like_markup(&json!("## Heading"), &options));
        assert!(!is_markup_text(&"#".repeat(100), &options));
    }

    #[test]
    fn long_string_with_indicator_is_markup() {
        let options = ClassifierOptions::default();
        for indicator in ["##", "```", "**", "- ", "\n#", "<|"] {
            assert!(looks_like_markup(&json!(long(indicator)), &options), "{indicator:?}");
        }
        assert!(!looks_like_markup(&json!(long("plain")), &options));
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        let options = ClassifierOptions::default();
        let text = format!("{}**", "é".repeat(60));
        assert!(text.len() > 100);
        assert!(!is_markup_text(&text, &options));
    }

    #[test]
    fn nested_structures_are_searched() {
        let options = ClassifierOptions::default();
        let value = json!({"a": 1, "b": [null, {"c": long("<|USER_TOKEN|>")}]});
        assert!(looks_like_markup(&value, &options));
        assert!(!looks_like_markup(&json!({"a": [1, true, null]}), &options));
    }

    #[test]
    fn options_change_threshold_and_indicators() {
        let options = ClassifierOptions {
            min_chars: 3,
            indicators: vec!["@@".to_string()],
        };
        assert!(is_markup_text("a @@ b", &options));
        assert!(!is_markup_text("a ## b", &options));
    }
}

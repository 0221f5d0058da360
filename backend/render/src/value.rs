//! Payload viewer for arbitrary sample fields (outputs, inputs, metrics, ...).
//!
//! Two views: the JSON view is a pretty dump of the value as recorded; the
//! markup view walks the value and renders long text fields through the
//! markup renderer, which is what makes prompt-sized strings readable.

use serde_json::Value;

use sampleview_core::{display_scalar, RenderOptions};
use sampleview_markup::{expand_json_text, is_markup_text, looks_like_json, looks_like_markup};

use crate::node::{RenderNode, Tone};
use crate::text::render_markup;

/// Which view to use for a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadView {
    Json,
    /// Markup view when the payload has markup in it, JSON view otherwise.
    Auto,
}

/// Render an optional payload with the requested view.
pub fn render_payload(value: Option<&Value>, view: PayloadView, options: &RenderOptions) -> Vec<RenderNode> {
    let Some(value) = value.filter(|v| !v.is_null()) else {
        return vec![RenderNode::paragraph("No data", Tone::Dim)];
    };
    match value {
        Value::Object(_) | Value::Array(_) => {
            if view == PayloadView::Auto && looks_like_markup(value, &options.classifier) {
                render_value_tree(value, options)
            } else {
                vec![render_json_view(value)]
            }
        }
        scalar => vec![RenderNode::paragraph(display_scalar(scalar), Tone::Default)],
    }
}

/// The value as recorded, pretty-printed.
pub fn render_json_view(value: &Value) -> RenderNode {
    let text = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
    RenderNode::code("json", text)
}

/// Markup view: one heading per top-level key, then the rendered value.
pub fn render_value_tree(value: &Value, options: &RenderOptions) -> Vec<RenderNode> {
    match value {
        Value::Object(map) => map
            .iter()
            .flat_map(|(key, v)| {
                let mut nodes = vec![RenderNode::heading(2, format!("━━ {key}"), Tone::Accent)];
                nodes.extend(render_value(v, options));
                nodes
            })
            .collect(),
        other => render_value(other, options),
    }
}

/// Render one value of the markup view.
pub fn render_value(value: &Value, options: &RenderOptions) -> Vec<RenderNode> {
    match value {
        Value::Null => vec![RenderNode::paragraph("null", Tone::Dim)],
        Value::String(s) => {
            if s.chars().count() > options.classifier.min_chars {
                if is_markup_text(s, &options.classifier) {
                    return render_markup(s, options);
                }
                if looks_like_json(s) {
                    if let Some(expanded) = expand_json_text(s, options.max_depth) {
                        return vec![RenderNode::json(&expanded, options.inline_nested_json)];
                    }
                }
            }
            vec![RenderNode::paragraph(s.clone(), Tone::Default)]
        }
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| RenderNode::block(k.clone(), Tone::Accent, render_value(v, options)))
            .collect(),
        Value::Array(items) => {
            let all_scalar = items
                .iter()
                .all(|item| matches!(item, Value::String(_) | Value::Number(_) | Value::Bool(_)));
            if all_scalar {
                vec![render_json_view(value)]
            } else {
                items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| RenderNode::block(format!("[{i}]"), Tone::Dim, render_value(item, options)))
                    .collect()
            }
        }
        Value::Bool(_) | Value::Number(_) => vec![RenderNode::paragraph(value.to_string(), Tone::Literal)],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn markup_prompt() -> String {
        format!("## Task\n\nDo the thing.{}", " Carefully.".repeat(12))
    }

    #[test]
    fn missing_payload_says_no_data() {
        let options = RenderOptions::default();
        assert_eq!(
            render_payload(None, PayloadView::Auto, &options),
            [RenderNode::paragraph("No data", Tone::Dim)]
        );
        assert_eq!(
            render_payload(Some(&Value::Null), PayloadView::Json, &options),
            [RenderNode::paragraph("No data", Tone::Dim)]
        );
    }

    #[test]
    fn json_view_is_pretty_dump() {
        let value = json!({"a": [1, 2]});
        let nodes = render_payload(Some(&value), PayloadView::Json, &RenderOptions::default());
        assert_eq!(nodes, [RenderNode::code("json", "{\n  \"a\": [\n    1,\n    2\n  ]\n}")]);
    }

    #[test]
    fn auto_view_without_markup_stays_json() {
        let value = json!({"short": "text"});
        let nodes = render_payload(Some(&value), PayloadView::Auto, &RenderOptions::default());
        assert!(matches!(nodes[0], RenderNode::CodeBlock { .. }));
    }

    #[test]
    fn auto_view_with_markup_renders_tree() {
        let value = json!({"prompt": markup_prompt(), "score": 0.5});
        let nodes = render_payload(Some(&value), PayloadView::Auto, &RenderOptions::default());
        assert_eq!(nodes[0], RenderNode::heading(2, "━━ prompt", Tone::Accent));
        assert_eq!(nodes[1], RenderNode::heading(2, "Task", Tone::Accent));
        assert!(nodes.contains(&RenderNode::heading(2, "━━ score", Tone::Accent)));
        assert_eq!(nodes.last(), Some(&RenderNode::paragraph("0.5", Tone::Literal)));
    }

    #[test]
    fn scalar_lists_are_shown_as_json() {
        let nodes = render_value(&json!(["a", 1, true]), &RenderOptions::default());
        assert_eq!(nodes.len(), 1);
        assert!(matches!(nodes[0], RenderNode::CodeBlock { .. }));
    }

    #[test]
    fn mixed_lists_are_indexed() {
        let nodes = render_value(&json!([{"k": null}, "x"]), &RenderOptions::default());
        assert_eq!(
            nodes[0],
            RenderNode::block(
                "[0]",
                Tone::Dim,
                vec![RenderNode::block("k", Tone::Accent, vec![RenderNode::paragraph("null", Tone::Dim)])]
            )
        );
        assert_eq!(
            nodes[1],
            RenderNode::block("[1]", Tone::Dim, vec![RenderNode::paragraph("x", Tone::Default)])
        );
    }

    #[test]
    fn long_json_strings_are_expanded() {
        let inner = json!({"payload": "x".repeat(120)}).to_string();
        let nodes = render_value(&Value::String(inner), &RenderOptions::default());
        let RenderNode::CodeBlock { language, code } = &nodes[0] else {
            panic!("expected json block, got {nodes:?}");
        };
        assert_eq!(language, "json");
        assert!(code.starts_with("{\n  \"payload\""));
    }
}

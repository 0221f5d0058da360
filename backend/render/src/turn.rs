//! Turn renderer.
//!
//! Maps each conversation turn to a [`RenderNode::Panel`]. Dispatch is on the
//! turn's role; a role outside the known set falls back to a raw dump of the
//! record. Rendering reads the turn and never changes it, and no input makes
//! it fail: anything that does not decode is shown as text.

use tracing::debug;

use sampleview_core::{RenderOptions, Role, ToolOutput, ToolResult, Turn};
use sampleview_markup::{expand_json_text, expand_nested_json, looks_like_json};

use crate::node::{RenderNode, Tone};
use crate::text::render_text;

pub const TRUNCATION_NOTICE: &str = "\n\n... [truncated, full content available in raw data]";

/// Render a turn with default options.
pub fn render_turn(turn: &Turn, index: usize) -> RenderNode {
    TurnRenderer::new(&RenderOptions::default()).render_turn(turn, index)
}

/// Render every turn, in order.
pub fn render_conversation(turns: &[Turn], options: &RenderOptions) -> Vec<RenderNode> {
    if turns.is_empty() {
        return vec![RenderNode::paragraph("No conversation data", Tone::Dim)];
    }
    let renderer = TurnRenderer::new(options);
    turns
        .iter()
        .enumerate()
        .map(|(i, turn)| renderer.render_turn(turn, i))
        .collect()
}

pub struct TurnRenderer<'a> {
    options: &'a RenderOptions,
}

impl<'a> TurnRenderer<'a> {
    pub fn new(options: &'a RenderOptions) -> Self {
        Self { options }
    }

    pub fn render_turn(&self, turn: &Turn, index: usize) -> RenderNode {
        let (title, tone, children) = match &turn.role {
            Role::System => ("System", Tone::System, self.system(turn)),
            Role::User => ("User", Tone::User, self.user(turn)),
            Role::Chatbot => ("Chatbot", Tone::Chatbot, self.chatbot(turn)),
            Role::Tool => ("Tool Results", Tone::Tool, self.tool(turn)),
            Role::Other(role) => {
                debug!(role = %role, index, "Unrecognised turn role; dumping raw record");
                ("Unknown Turn Type", Tone::Error, self.unknown(turn))
            }
        };
        RenderNode::Panel {
            title: title.to_string(),
            subtitle: Some(format!("(Turn {index})")),
            tone,
            children,
        }
    }

    fn system(&self, turn: &Turn) -> Vec<RenderNode> {
        let content = turn.content_text();
        let limit = self.options.system_truncate_chars;
        let text = match content.char_indices().nth(limit) {
            Some((cut, _)) => format!("{}{TRUNCATION_NOTICE}", &content[..cut]),
            None => content,
        };
        vec![RenderNode::paragraph(text, Tone::Dim)]
    }

    fn user(&self, turn: &Turn) -> Vec<RenderNode> {
        vec![RenderNode::paragraph(turn.content_text(), Tone::User)]
    }

    fn chatbot(&self, turn: &Turn) -> Vec<RenderNode> {
        let mut blocks = Vec::new();

        if let Some(rationale) = &turn.rationale {
            blocks.push(RenderNode::block(
                "Thinking",
                Tone::Thinking,
                render_text(rationale, Tone::Dim, self.options),
            ));
        }

        for call in &turn.tool_calls {
            let name = call.name.as_deref().unwrap_or("unknown");
            let mut children = Vec::new();
            if call.has_parameters() {
                let expanded = expand_nested_json(&call.parameters, self.options.max_depth);
                children.push(RenderNode::json(&expanded, self.options.inline_nested_json));
            }
            blocks.push(RenderNode::block(format!("Tool Call: {name}"), Tone::Action, children));
        }

        let content = turn.content_text();
        if !content.is_empty() {
            blocks.push(RenderNode::block(
                "Response",
                Tone::Response,
                render_text(&content, Tone::Response, self.options),
            ));
        }

        if blocks.is_empty() {
            blocks.push(RenderNode::paragraph("[No content]", Tone::Dim));
        }
        blocks
    }

    fn tool(&self, turn: &Turn) -> Vec<RenderNode> {
        if turn.tool_results.is_empty() {
            return vec![RenderNode::paragraph("[No tool results]", Tone::Dim)];
        }
        turn.tool_results.iter().map(|result| self.tool_result(result)).collect()
    }

    fn tool_result(&self, result: &ToolResult) -> RenderNode {
        let id = result.tool_call_id.as_deref().unwrap_or("unknown");
        let children = result.outputs.iter().map(|output| self.tool_output(output)).collect();
        RenderNode::block(format!("Result for: {id}"), Tone::Tool, children)
    }

    fn tool_output(&self, output: &ToolOutput) -> RenderNode {
        match output.text.as_deref() {
            Some(text) if !text.is_empty() => {
                if looks_like_json(text) {
                    if let Some(expanded) = expand_json_text(text, self.options.max_depth) {
                        return RenderNode::json(&expanded, self.options.inline_nested_json);
                    }
                    debug!("Tool output looked like JSON but did not parse; showing text");
                }
                RenderNode::paragraph(text, Tone::Tool)
            }
            _ => {
                let expanded = expand_nested_json(&output.raw, self.options.max_depth);
                RenderNode::json(&expanded, self.options.inline_nested_json)
            }
        }
    }

    fn unknown(&self, turn: &Turn) -> Vec<RenderNode> {
        let dump = serde_json::to_string_pretty(&turn.raw).unwrap_or_else(|_| turn.raw.to_string());
        vec![RenderNode::code("json", dump)]
    }
}

//! Rendering of free text fields.
//!
//! Short or unadorned text becomes a single paragraph. Text the classifier
//! flags as markup is decoded into marker sections; each section is then
//! either shown as expanded JSON (action and tool-result bodies) or split into
//! prose and fenced code.

use tracing::trace;

use sampleview_core::RenderOptions;
use sampleview_markup::{
    decode_markup, expand_json_text, is_markup_text, parse_prose, split_code_fences, ProseBlock,
    SectionKind, Segment,
};

use crate::node::{RenderNode, Tone};

pub fn tone_for_section(kind: SectionKind) -> Tone {
    match kind {
        SectionKind::System => Tone::System,
        SectionKind::User => Tone::User,
        SectionKind::Chatbot => Tone::Chatbot,
        SectionKind::Thinking => Tone::Thinking,
        SectionKind::Action => Tone::Action,
        SectionKind::Response => Tone::Response,
        SectionKind::ToolResult => Tone::Tool,
        SectionKind::Plain | SectionKind::TurnBoundary | SectionKind::Unknown => Tone::Default,
    }
}

/// Render a text field, decoding markup when the classifier says so.
pub fn render_text(text: &str, tone: Tone, options: &RenderOptions) -> Vec<RenderNode> {
    if is_markup_text(text, &options.classifier) {
        render_markup(text, options)
    } else {
        vec![RenderNode::paragraph(text, tone)]
    }
}

/// Decode a marker-annotated payload into labelled blocks.
pub fn render_markup(text: &str, options: &RenderOptions) -> Vec<RenderNode> {
    let mut nodes = Vec::new();

    for section in decode_markup(text) {
        let json = if section.kind.carries_json() {
            let expanded = expand_json_text(&section.content, options.max_depth);
            if expanded.is_none() && section.content.trim_start().starts_with(['{', '[']) {
                trace!(kind = ?section.kind, "Section body is not a single JSON document; showing as text");
            }
            expanded
        } else {
            None
        };
        let children = match json {
            Some(expanded) => vec![RenderNode::json(&expanded, options.inline_nested_json)],
            None => render_segments(&section.content),
        };

        match section.kind.label() {
            Some(label) => nodes.push(RenderNode::block(label, tone_for_section(section.kind), children)),
            None => nodes.extend(children),
        }
    }

    nodes
}

/// Prose and fenced code, in order.
pub fn render_segments(text: &str) -> Vec<RenderNode> {
    split_code_fences(text)
        .into_iter()
        .flat_map(|segment| match segment {
            Segment::Prose { text } => prose_nodes(parse_prose(&text)),
            Segment::Code { language, text } => vec![RenderNode::code(language, text)],
        })
        .collect()
}

fn prose_nodes(blocks: Vec<ProseBlock>) -> Vec<RenderNode> {
    blocks.into_iter().map(prose_node).collect()
}

fn prose_node(block: ProseBlock) -> RenderNode {
    match block {
        ProseBlock::Heading { level, text } => RenderNode::heading(level, text, Tone::Accent),
        ProseBlock::Paragraph { text } => RenderNode::paragraph(text, Tone::Default),
        ProseBlock::List { start, items } => RenderNode::List {
            start,
            items: items.into_iter().map(prose_nodes).collect(),
        },
        ProseBlock::Quote { blocks } => RenderNode::Quote {
            children: prose_nodes(blocks),
        },
        ProseBlock::Code { language, text } => RenderNode::code(language, text),
        ProseBlock::Rule => RenderNode::Rule,
    }
}

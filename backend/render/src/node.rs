//! Render tree.
//!
//! The display surface consumes these nodes; nothing here knows about
//! terminals or widgets. [`Tone`] is a semantic colour hint, mapped to actual
//! styles by whoever draws the tree.

use serde::Serialize;

use sampleview_core::ExpandedValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Default,
    Dim,
    Accent,
    System,
    User,
    Chatbot,
    Thinking,
    Action,
    Response,
    Tool,
    /// Bare numbers and booleans.
    Literal,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RenderNode {
    /// A framed group, one per conversation turn.
    Panel {
        title: String,
        subtitle: Option<String>,
        tone: Tone,
        children: Vec<RenderNode>,
    },
    /// A labelled group inside a panel (thinking, a tool call, a decoded section).
    Block {
        label: String,
        tone: Tone,
        children: Vec<RenderNode>,
    },
    Heading {
        level: u8,
        text: String,
        tone: Tone,
    },
    Paragraph {
        text: String,
        tone: Tone,
    },
    CodeBlock {
        language: String,
        code: String,
    },
    /// `start` numbers an ordered list; `None` is a bullet list.
    List {
        start: Option<u64>,
        items: Vec<Vec<RenderNode>>,
    },
    Quote {
        children: Vec<RenderNode>,
    },
    KeyValueTable {
        rows: Vec<(String, String)>,
    },
    /// Column table; short rows are padded with empty cells.
    Table {
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    Rule,
}

impl RenderNode {
    pub fn paragraph(text: impl Into<String>, tone: Tone) -> Self {
        RenderNode::Paragraph {
            text: text.into(),
            tone,
        }
    }

    pub fn heading(level: u8, text: impl Into<String>, tone: Tone) -> Self {
        RenderNode::Heading {
            level,
            text: text.into(),
            tone,
        }
    }

    pub fn block(label: impl Into<String>, tone: Tone, children: Vec<RenderNode>) -> Self {
        RenderNode::Block {
            label: label.into(),
            tone,
            children,
        }
    }

    pub fn code(language: impl Into<String>, code: impl Into<String>) -> Self {
        RenderNode::CodeBlock {
            language: language.into(),
            code: code.into(),
        }
    }

    /// Pretty-printed JSON code block for an expanded value.
    pub fn json(value: &ExpandedValue, inline_nested: bool) -> Self {
        Self::code("json", value.to_pretty_string(inline_nested))
    }

    /// Child nodes of a container; empty for leaves.
    pub fn children(&self) -> &[RenderNode] {
        match self {
            RenderNode::Panel { children, .. }
            | RenderNode::Block { children, .. }
            | RenderNode::Quote { children } => children,
            _ => &[],
        }
    }
}

//! The closed set of inline `<|NAME|>` markers and what each one means.

use serde::Serialize;

/// Semantic kind of a decoded section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    /// Text outside every section.
    Plain,
    System,
    User,
    Chatbot,
    Thinking,
    Action,
    Response,
    ToolResult,
    TurnBoundary,
    Unknown,
}

impl SectionKind {
    /// Stable slug for logs and CLI output.
    pub fn slug(self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::System => "system",
            Self::User => "user",
            Self::Chatbot => "chatbot",
            Self::Thinking => "thinking",
            Self::Action => "action",
            Self::Response => "response",
            Self::ToolResult => "tool_result",
            Self::TurnBoundary => "turn",
            Self::Unknown => "unknown",
        }
    }

    /// Heading shown above a section of this kind, if it gets one.
    pub fn label(self) -> Option<&'static str> {
        match self {
            Self::System => Some("SYSTEM"),
            Self::User => Some("USER"),
            Self::Chatbot => Some("ASSISTANT"),
            Self::Thinking => Some("THINKING"),
            Self::Action => Some("ACTION"),
            Self::Response => Some("RESPONSE"),
            Self::ToolResult => Some("TOOL RESULT"),
            Self::Plain | Self::TurnBoundary | Self::Unknown => None,
        }
    }

    /// Sections whose body is normally a JSON document.
    pub fn carries_json(self) -> bool {
        matches!(self, Self::Action | Self::ToolResult)
    }
}

/// How a marker affects the open-section stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerRole {
    Start,
    End,
    /// Role markers: open a top-level section that runs to the next role marker.
    Standalone,
    /// Turn delimiters; structural only.
    Boundary,
    /// Marker-shaped text outside the grammar.
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerSpec {
    pub text: &'static str,
    pub kind: SectionKind,
    pub role: MarkerRole,
}

const fn marker(text: &'static str, kind: SectionKind, role: MarkerRole) -> MarkerSpec {
    MarkerSpec { text, kind, role }
}

pub static MARKERS: &[MarkerSpec] = &[
    marker("<|SYSTEM_TOKEN|>", SectionKind::System, MarkerRole::Standalone),
    marker("<|USER_TOKEN|>", SectionKind::User, MarkerRole::Standalone),
    marker("<|CHATBOT_TOKEN|>", SectionKind::Chatbot, MarkerRole::Standalone),
    marker("<|START_THINKING|>", SectionKind::Thinking, MarkerRole::Start),
    marker("<|END_THINKING|>", SectionKind::Thinking, MarkerRole::End),
    marker("<|START_ACTION|>", SectionKind::Action, MarkerRole::Start),
    marker("<|END_ACTION|>", SectionKind::Action, MarkerRole::End),
    marker("<|START_RESPONSE|>", SectionKind::Response, MarkerRole::Start),
    marker("<|END_RESPONSE|>", SectionKind::Response, MarkerRole::End),
    marker("<|START_TOOL_RESULT|>", SectionKind::ToolResult, MarkerRole::Start),
    marker("<|END_TOOL_RESULT|>", SectionKind::ToolResult, MarkerRole::End),
    marker("<|START_OF_TURN_TOKEN|>", SectionKind::TurnBoundary, MarkerRole::Boundary),
    marker("<|END_OF_TURN_TOKEN|>", SectionKind::TurnBoundary, MarkerRole::Boundary),
];

pub fn lookup(text: &str) -> Option<&'static MarkerSpec> {
    MARKERS.iter().find(|m| m.text == text)
}

//! Evaluation sample and conversation schema.
//!
//! Records come from heterogeneous model output, so every type here is built
//! leniently from a [`serde_json::Value`]: a field with an unexpected shape is
//! treated as absent instead of failing the whole record. Field names are
//! accepted in both snake_case and camelCase.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Look up the first present key among `names`.
fn field<'a>(obj: &'a Map<String, Value>, names: &[&str]) -> Option<&'a Value> {
    names.iter().find_map(|name| obj.get(*name))
}

/// A non-empty string field. Empty strings count as absent.
fn text_field(obj: &Map<String, Value>, names: &[&str]) -> Option<String> {
    match field(obj, names) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

/// Render a scalar for display (`"abc"` → `abc`, `3` → `3`).
pub fn display_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Turns
// ---------------------------------------------------------------------------

/// Who produced a turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Role {
    System,
    User,
    Chatbot,
    Tool,
    /// Any role string outside the known set, kept verbatim.
    Other(String),
}

impl Role {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "System" => Role::System,
            "User" => Role::User,
            "Chatbot" => Role::Chatbot,
            "Tool" => Role::Tool,
            other => Role::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Role::System => "System",
            Role::User => "User",
            Role::Chatbot => "Chatbot",
            Role::Tool => "Tool",
            Role::Other(s) => s,
        }
    }
}

/// One entry of a list-shaped `content` field.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentBlock {
    pub text: Option<String>,
    pub content_type: Option<String>,
}

/// The `content` field of a turn.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnContent {
    Text(String),
    Blocks(Vec<ContentBlock>),
    /// Some other JSON shape; displayed through its text form.
    Other(Value),
}

impl TurnContent {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => Some(TurnContent::Text(s.clone())),
            Value::Array(items) if items.is_empty() => None,
            Value::Array(items) => Some(TurnContent::Blocks(
                items
                    .iter()
                    .map(|item| match item {
                        Value::String(s) => ContentBlock {
                            text: Some(s.clone()),
                            content_type: None,
                        },
                        Value::Object(obj) => ContentBlock {
                            text: text_field(obj, &["text"]),
                            content_type: text_field(obj, &["content_type", "contentType", "type"]),
                        },
                        _ => ContentBlock {
                            text: None,
                            content_type: None,
                        },
                    })
                    .collect(),
            )),
            other => Some(TurnContent::Other(other.clone())),
        }
    }

    /// Flatten to display text: block texts are joined with newlines, and a
    /// map falls back to its `text` key.
    pub fn to_text(&self) -> String {
        match self {
            TurnContent::Text(s) => s.clone(),
            TurnContent::Blocks(blocks) => blocks
                .iter()
                .filter_map(|b| b.text.as_deref())
                .collect::<Vec<_>>()
                .join("\n"),
            TurnContent::Other(Value::Object(obj)) => match obj.get("text") {
                Some(Value::String(s)) => s.clone(),
                _ => Value::Object(obj.clone()).to_string(),
            },
            TurnContent::Other(other) => display_scalar(other),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ToolCall {
    pub name: Option<String>,
    /// Arbitrary JSON; `Null` when the call carried no parameters.
    pub parameters: Value,
    pub id: Option<String>,
}

impl ToolCall {
    fn from_value(value: &Value) -> Self {
        let Value::Object(obj) = value else {
            return ToolCall {
                name: None,
                parameters: Value::Null,
                id: None,
            };
        };
        ToolCall {
            name: text_field(obj, &["name"]),
            parameters: field(obj, &["parameters", "arguments"]).cloned().unwrap_or(Value::Null),
            id: text_field(obj, &["id", "tool_call_id", "toolCallId"]),
        }
    }

    /// True when there is nothing worth printing under the call header.
    pub fn has_parameters(&self) -> bool {
        match &self.parameters {
            Value::Null => false,
            Value::Object(map) => !map.is_empty(),
            Value::Array(items) => !items.is_empty(),
            Value::String(s) => !s.is_empty(),
            _ => true,
        }
    }
}

/// One output of a tool result.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolOutput {
    /// The `text` field, if the output had one (it may be empty).
    pub text: Option<String>,
    pub output_type: Option<String>,
    /// The output exactly as recorded.
    pub raw: Value,
}

impl ToolOutput {
    fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(obj) => ToolOutput {
                text: match obj.get("text") {
                    Some(Value::String(s)) => Some(s.clone()),
                    _ => None,
                },
                output_type: text_field(obj, &["type"]),
                raw: value.clone(),
            },
            Value::String(s) => ToolOutput {
                text: Some(s.clone()),
                output_type: None,
                raw: value.clone(),
            },
            other => ToolOutput {
                text: None,
                output_type: None,
                raw: other.clone(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ToolResult {
    pub tool_call_id: Option<String>,
    pub outputs: Vec<ToolOutput>,
}

impl ToolResult {
    fn from_value(value: &Value) -> Self {
        let Value::Object(obj) = value else {
            return ToolResult {
                tool_call_id: None,
                outputs: vec![ToolOutput::from_value(value)],
            };
        };
        ToolResult {
            tool_call_id: text_field(obj, &["tool_call_id", "toolCallId", "id"]),
            outputs: match obj.get("outputs") {
                Some(Value::Array(items)) => items.iter().map(ToolOutput::from_value).collect(),
                _ => Vec::new(),
            },
        }
    }
}

/// One message or event of a conversation. Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(from = "Value", into = "Value")]
pub struct Turn {
    pub role: Role,
    pub content: Option<TurnContent>,
    pub rationale: Option<String>,
    pub tool_calls: Vec<ToolCall>,
    pub tool_results: Vec<ToolResult>,
    /// The record as read, used for the fallback dump.
    pub raw: Value,
}

impl Turn {
    pub fn from_value(value: &Value) -> Self {
        let empty = Map::new();
        let obj = value.as_object().unwrap_or(&empty);
        let role = match obj.get("role") {
            Some(Value::String(s)) => Role::parse(s),
            _ => Role::Other("Unknown".to_string()),
        };
        let list = |names: &[&str]| match field(obj, names) {
            Some(Value::Array(items)) => items.clone(),
            _ => Vec::new(),
        };
        Turn {
            role,
            content: field(obj, &["content"]).and_then(TurnContent::from_value),
            rationale: text_field(obj, &["rationale", "thinking"]),
            tool_calls: list(&["tool_calls", "toolCalls"])
                .iter()
                .map(ToolCall::from_value)
                .collect(),
            tool_results: list(&["tool_results", "toolResults"])
                .iter()
                .map(ToolResult::from_value)
                .collect(),
            raw: value.clone(),
        }
    }

    /// Content flattened to text; empty when absent.
    pub fn content_text(&self) -> String {
        self.content.as_ref().map(TurnContent::to_text).unwrap_or_default()
    }
}

impl From<Value> for Turn {
    fn from(value: Value) -> Self {
        Turn::from_value(&value)
    }
}

impl From<Turn> for Value {
    fn from(turn: Turn) -> Self {
        turn.raw
    }
}

// ---------------------------------------------------------------------------
// Samples
// ---------------------------------------------------------------------------

/// One evaluation record (one line of a JSONL export).
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(from = "Value", into = "Value")]
pub struct Sample {
    pub sample_id: Option<String>,
    pub task_name: Option<String>,
    pub created_at: Option<String>,
    pub outputs: Option<Value>,
    pub metrics: Map<String, Value>,
    pub debug_info: Option<Value>,
    pub inputs: Option<Value>,
    pub raw: Value,
}

impl Sample {
    pub fn from_value(value: &Value) -> Self {
        let empty = Map::new();
        let obj = value.as_object().unwrap_or(&empty);
        let present = |names: &[&str]| field(obj, names).filter(|v| !v.is_null()).cloned();
        let scalar = |names: &[&str]| present(names).map(|v| display_scalar(&v));
        Sample {
            sample_id: scalar(&["sample_id", "sampleId"]),
            task_name: scalar(&["task_name", "taskName"]),
            created_at: scalar(&["created_at", "createdAt"]),
            outputs: present(&["outputs"]),
            metrics: match field(obj, &["metrics"]) {
                Some(Value::Object(map)) => map.clone(),
                _ => Map::new(),
            },
            debug_info: present(&["debug_info", "debugInfo"]),
            inputs: present(&["inputs"]),
            raw: value.clone(),
        }
    }

    /// `outputs.conversation`, when it is a list.
    pub fn conversation(&self) -> Option<Vec<Turn>> {
        match self.outputs.as_ref()?.get("conversation")? {
            Value::Array(turns) => Some(turns.iter().map(Turn::from_value).collect()),
            _ => None,
        }
    }

    /// A numeric metric, if present.
    pub fn metric(&self, name: &str) -> Option<f64> {
        self.metrics.get(name).and_then(Value::as_f64)
    }

    pub fn metrics_value(&self) -> Option<Value> {
        if self.metrics.is_empty() {
            None
        } else {
            Some(Value::Object(self.metrics.clone()))
        }
    }
}

impl From<Value> for Sample {
    fn from(value: Value) -> Self {
        Sample::from_value(&value)
    }
}

impl From<Sample> for Value {
    fn from(sample: Sample) -> Self {
        sample.raw
    }
}

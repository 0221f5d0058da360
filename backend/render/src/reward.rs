//! Reward explanation for database-state graded tasks.
//!
//! The grading record lives in `inputs.metadata.info` (a JSON string or an
//! object) with a `task` (instruction, expected `actions`, required
//! `outputs`) and a `reward_info` (actions actually taken, diagnostics).
//! `respond` actions never touch the database and are left out of the
//! comparison.

use serde_json::{Map, Value};
use tracing::debug;

use sampleview_core::Sample;

use crate::node::{RenderNode, Tone};
use crate::sample::expect_no_op;

const STRING_ARG_CHARS: usize = 20;
const STRING_ARG_KEPT: usize = 17;
const LIST_ARG_ITEMS: usize = 3;
const HASH_CHARS: usize = 16;

/// How one step of the expected and actual action lists compares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionMatch {
    Match,
    Mismatch,
    /// Taken but not expected.
    Extra,
    /// Expected but not taken.
    Missing,
}

impl ActionMatch {
    pub fn label(&self) -> &'static str {
        match self {
            ActionMatch::Match => "✓",
            ActionMatch::Mismatch => "✗",
            ActionMatch::Extra => "Extra",
            ActionMatch::Missing => "Missing",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActionRow {
    pub step: usize,
    pub expected: Option<String>,
    pub actual: Option<String>,
    pub status: ActionMatch,
}

fn name_of(action: &Value) -> Option<&str> {
    action.get("name").and_then(Value::as_str)
}

/// Drop `respond` actions, keeping the database-changing ones in order.
pub fn db_actions(actions: &[Value]) -> Vec<&Value> {
    actions
        .iter()
        .filter(|a| !name_of(a).unwrap_or("").eq_ignore_ascii_case("respond"))
        .collect()
}

fn actions_match(a: &Value, b: &Value) -> bool {
    name_of(a) == name_of(b) && a.get("kwargs") == b.get("kwargs")
}

fn format_arg(value: &Value) -> String {
    match value {
        Value::Array(items) if items.len() > LIST_ARG_ITEMS => format!("[...{} items]", items.len()),
        Value::String(s) if s.chars().count() > STRING_ARG_CHARS => {
            let kept: String = s.chars().take(STRING_ARG_KEPT).collect();
            format!("\"{kept}...\"")
        }
        other => other.to_string(),
    }
}

/// `name(key=value, ...)` with long strings and lists abbreviated.
pub fn format_action(action: &Value) -> String {
    let name = name_of(action).unwrap_or("unknown");
    let args = match action.get("kwargs") {
        Some(Value::Object(kwargs)) => kwargs
            .iter()
            .map(|(key, value)| format!("{key}={}", format_arg(value)))
            .collect::<Vec<_>>()
            .join(", "),
        _ => String::new(),
    };
    format!("{name}({args})")
}

/// Step-by-step comparison of expected and actual database actions.
pub fn compare_actions(expected: &[&Value], actual: &[&Value]) -> Vec<ActionRow> {
    (0..expected.len().max(actual.len()))
        .map(|i| {
            let exp = expected.get(i).copied();
            let act = actual.get(i).copied();
            let status = match (exp, act) {
                (Some(e), Some(a)) if actions_match(e, a) => ActionMatch::Match,
                (Some(_), Some(_)) => ActionMatch::Mismatch,
                (None, _) => ActionMatch::Extra,
                (Some(_), None) => ActionMatch::Missing,
            };
            ActionRow {
                step: i + 1,
                expected: exp.map(format_action),
                actual: act.map(format_action),
                status,
            }
        })
        .collect()
}

fn truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|x| x != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::Object(map)) => !map.is_empty(),
    }
}

fn list<'a>(map: &'a Map<String, Value>, key: &str) -> &'a [Value] {
    match map.get(key) {
        Some(Value::Array(items)) => items,
        _ => &[],
    }
}

fn object<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a Map<String, Value>> {
    map.get(key).and_then(Value::as_object)
}

fn verdict_panel(reward: f64, no_op: bool) -> RenderNode {
    let (title, tone, explanation) = if reward >= 1.0 {
        let mut text = "The agent achieved the correct database state".to_string();
        if no_op {
            text.push_str(" (correctly did nothing)");
        }
        ("✅ TASK PASSED", Tone::Success, text)
    } else if reward > 0.0 {
        ("⚠️  PARTIAL SUCCESS", Tone::Warning, format!("Partial reward: {reward:.2}"))
    } else if no_op {
        (
            "❌ TASK FAILED",
            Tone::Error,
            "The agent should not have modified the database".to_string(),
        )
    } else {
        (
            "❌ TASK FAILED",
            Tone::Error,
            "The final database state did not match the expected state".to_string(),
        )
    };
    RenderNode::Panel {
        title: title.to_string(),
        subtitle: None,
        tone,
        children: vec![RenderNode::paragraph(explanation, tone)],
    }
}

fn actions_table(rows: &[ActionRow], expected: usize, actual: usize) -> RenderNode {
    let dash = || "—".to_string();
    let mut cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            vec![
                row.step.to_string(),
                row.expected.clone().unwrap_or_else(dash),
                row.actual.clone().unwrap_or_else(dash),
                row.status.label().to_string(),
            ]
        })
        .collect();
    if expected != actual {
        cells.push(vec![
            String::new(),
            format!("Total: {expected}"),
            format!("Total: {actual}"),
        ]);
    }
    RenderNode::Table {
        headers: ["Step", "Expected Actions", "Actual Actions", "Match"]
            .map(String::from)
            .to_vec(),
        rows: cells,
    }
}

fn outputs_panel(required: &[Value], diagnostics: Option<&Map<String, Value>>) -> RenderNode {
    let communicated = diagnostics.and_then(|d| object(d, "outputs"));
    let r_outputs = diagnostics
        .and_then(|d| d.get("r_outputs"))
        .and_then(Value::as_f64)
        .unwrap_or(0.0);
    let rows = required
        .iter()
        .map(|output| {
            let name = match output {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            let found = truthy(communicated.and_then(|c| c.get(&name)));
            let status = if found { "✓ Yes" } else { "✗ No" };
            vec![name, status.to_string()]
        })
        .collect();
    RenderNode::Panel {
        title: "Required Outputs Check".to_string(),
        subtitle: None,
        tone: if r_outputs >= 1.0 { Tone::Success } else { Tone::Error },
        children: vec![RenderNode::Table {
            headers: vec!["Required Output".to_string(), "Communicated?".to_string()],
            rows,
        }],
    }
}

fn diagnostic_panel(diagnostics: Option<&Map<String, Value>>, no_op: bool) -> RenderNode {
    let mut children = Vec::new();
    if let Some(info) = diagnostics {
        if info.contains_key("r_actions") {
            if truthy(info.get("r_actions")) {
                children.push(RenderNode::paragraph("✓ Database state: CORRECT", Tone::Success));
            } else {
                children.push(RenderNode::paragraph("✗ Database state: INCORRECT", Tone::Error));
            }
            let hash = info.get("gt_data_hash").and_then(Value::as_str).unwrap_or("N/A");
            let short: String = hash.chars().take(HASH_CHARS).collect();
            children.push(RenderNode::paragraph(format!("  Expected hash: {short}..."), Tone::Dim));
            if no_op {
                children.push(RenderNode::paragraph(
                    "  Note: This task expected NO database modifications",
                    Tone::Warning,
                ));
            }
        } else if info.contains_key("r_outputs") {
            let r_outputs = info.get("r_outputs").and_then(Value::as_f64).unwrap_or(0.0);
            if r_outputs >= 1.0 {
                children.push(RenderNode::paragraph("✓ All required outputs communicated", Tone::Success));
            } else {
                children.push(RenderNode::paragraph("✗ Missing required outputs", Tone::Error));
            }
        }
    }
    RenderNode::Panel {
        title: "Diagnostic Details".to_string(),
        subtitle: None,
        tone: Tone::Dim,
        children,
    }
}

/// The grading record, parsed when it was stored as a string.
fn grading_info(sample: &Sample) -> Result<Option<Map<String, Value>>, String> {
    let info = sample
        .inputs
        .as_ref()
        .and_then(|inputs| inputs.get("metadata"))
        .and_then(|metadata| metadata.get("info"));
    match info {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => match serde_json::from_str::<Value>(s) {
            Ok(Value::Object(map)) => Ok(Some(map)),
            Ok(_) => Err("not a JSON object".to_string()),
            Err(e) => Err(e.to_string()),
        },
        Some(Value::Object(map)) => Ok(Some(map.clone())),
        Some(_) => Err("not a JSON object".to_string()),
    }
}

/// Explain how the sample's reward came about.
pub fn render_reward_explanation(sample: &Sample) -> Vec<RenderNode> {
    let info = match grading_info(sample) {
        Ok(Some(info)) => info,
        Ok(None) => {
            return vec![RenderNode::paragraph(
                "No reward information available for this sample.",
                Tone::Warning,
            )]
        }
        Err(reason) => {
            debug!(%reason, "Unreadable reward information");
            return vec![RenderNode::paragraph("Could not parse reward information.", Tone::Error)];
        }
    };

    let empty = Map::new();
    let task = object(&info, "task").unwrap_or(&empty);
    let reward_info = object(&info, "reward_info").unwrap_or(&empty);
    let diagnostics = object(reward_info, "info");
    let no_op = expect_no_op(sample);

    let mut nodes = vec![verdict_panel(sample.metric("mean_reward").unwrap_or(0.0), no_op)];

    let instruction = match task.get("instruction") {
        Some(Value::String(s)) => s.clone(),
        _ => "N/A".to_string(),
    };
    nodes.push(RenderNode::Panel {
        title: "Task Instruction".to_string(),
        subtitle: None,
        tone: Tone::Accent,
        children: vec![RenderNode::paragraph(instruction, Tone::Default)],
    });

    let expected = db_actions(list(task, "actions"));
    let actual = db_actions(list(reward_info, "actions"));
    let rows = compare_actions(&expected, &actual);
    nodes.push(RenderNode::heading(2, "Database Actions Comparison", Tone::Accent));
    nodes.push(actions_table(&rows, expected.len(), actual.len()));

    let required = list(task, "outputs");
    if !required.is_empty() {
        nodes.push(outputs_panel(required, diagnostics));
    }

    nodes.push(diagnostic_panel(diagnostics, no_op));
    nodes
}

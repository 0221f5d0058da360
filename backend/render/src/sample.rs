//! Whole-sample document: status line, summary table, conversation and the
//! remaining payloads.

use serde_json::Value;

use sampleview_core::{display_scalar, RenderOptions, Sample};

use crate::node::{RenderNode, Tone};
use crate::reward::render_reward_explanation;
use crate::turn::render_conversation;
use crate::value::{render_payload, PayloadView};

const SUMMARY_VALUE_CHARS: usize = 14;
const SUMMARY_METRICS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Verdict {
    Passed(f64),
    Partial(f64),
    Failed(f64),
    NoReward,
}

impl Verdict {
    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Passed(_) => "PASSED",
            Verdict::Partial(_) => "PARTIAL",
            Verdict::Failed(_) => "FAILED",
            Verdict::NoReward => "NO REWARD",
        }
    }

    pub fn tone(&self) -> Tone {
        match self {
            Verdict::Passed(_) => Tone::Success,
            Verdict::Partial(_) => Tone::Warning,
            Verdict::Failed(_) => Tone::Error,
            Verdict::NoReward => Tone::Dim,
        }
    }
}

/// Verdict from `metrics.mean_reward`.
pub fn verdict(sample: &Sample) -> Verdict {
    match sample.metric("mean_reward") {
        Some(r) if r >= 1.0 => Verdict::Passed(r),
        Some(r) if r > 0.0 => Verdict::Partial(r),
        Some(r) => Verdict::Failed(r),
        None => Verdict::NoReward,
    }
}

fn shorten(value: &str) -> String {
    match value.char_indices().nth(SUMMARY_VALUE_CHARS) {
        Some((cut, _)) => format!("{}…", &value[..cut]),
        None => value.to_string(),
    }
}

/// Key/value overview of a sample.
pub fn render_summary(sample: &Sample) -> RenderNode {
    let short = |v: &Option<String>| v.as_deref().map(shorten).unwrap_or_else(|| "N/A".to_string());

    let metrics = if sample.metrics.is_empty() {
        "none".to_string()
    } else {
        sample
            .metrics
            .iter()
            .take(SUMMARY_METRICS)
            .map(|(k, v)| format!("{k}: {}", display_scalar(v)))
            .collect::<Vec<_>>()
            .join(", ")
    };

    let available: Vec<&str> = [
        ("outputs", sample.outputs.is_some()),
        ("inputs", sample.inputs.is_some()),
        ("debug_info", sample.debug_info.is_some()),
    ]
    .into_iter()
    .filter_map(|(name, present)| present.then_some(name))
    .collect();

    RenderNode::KeyValueTable {
        rows: vec![
            ("Sample ID".to_string(), short(&sample.sample_id)),
            ("Task".to_string(), short(&sample.task_name)),
            ("Created".to_string(), short(&sample.created_at)),
            ("Metrics".to_string(), metrics),
            (
                "Available".to_string(),
                if available.is_empty() {
                    "none".to_string()
                } else {
                    available.join(", ")
                },
            ),
        ],
    }
}

fn task_run_info(sample: &Sample) -> Option<&serde_json::Map<String, Value>> {
    sample.raw.get("task_run_info")?.as_object()
}

/// Overall success rate of the task the sample belongs to, if recorded.
fn task_success_rate(sample: &Sample) -> Option<f64> {
    let metrics = task_run_info(sample)?.get("task_metrics")?.as_object()?;
    metrics
        .iter()
        .find(|(key, _)| key.contains("mean_reward") && key.contains('/'))
        .and_then(|(_, v)| v.as_f64())
}

pub(crate) fn expect_no_op(sample: &Sample) -> bool {
    sample.metrics.get("expect_no_op").and_then(Value::as_bool).unwrap_or(false)
}

/// One-line status text, e.g. `Sample #1/3 | PASSED (Reward: 1.0) | Task: qa | No-Op: False`.
///
/// `index` is zero-based.
pub fn status_line(sample: &Sample, index: usize, total: usize) -> String {
    let verdict = verdict(sample);
    let reward = match verdict {
        Verdict::Passed(r) | Verdict::Partial(r) | Verdict::Failed(r) => {
            format!("{} (Reward: {r:.1})", verdict.label())
        }
        Verdict::NoReward => verdict.label().to_string(),
    };

    let task_name = task_run_info(sample)
        .and_then(|info| info.get("task_name"))
        .and_then(Value::as_str)
        .or(sample.task_name.as_deref())
        .unwrap_or("Unknown");
    let task_short = task_name.rsplit('.').next().unwrap_or(task_name);
    let mut task = format!("Task: {task_short}");
    if let Some(rate) = task_success_rate(sample) {
        task.push_str(&format!(" ({:.1}% overall)", rate * 100.0));
    }

    let no_op = if expect_no_op(sample) { "True" } else { "False" };
    format!(
        "Sample #{}/{total} | {reward} | {task} | No-Op: {no_op}",
        index + 1
    )
}

pub fn render_status_line(sample: &Sample, index: usize, total: usize) -> RenderNode {
    RenderNode::paragraph(status_line(sample, index, total), verdict(sample).tone())
}

/// Pass marker for list rows.
pub fn pass_marker(sample: &Sample) -> String {
    let value = ["passed", "pass", "pass@01"]
        .iter()
        .find_map(|name| sample.metrics.get(*name));
    match value {
        None => String::new(),
        Some(v) => match v.as_f64() {
            Some(x) if x == 1.0 => "✓".to_string(),
            Some(x) if x == 0.0 => "✗".to_string(),
            _ => match v {
                Value::Bool(true) => "✓".to_string(),
                Value::Bool(false) => "✗".to_string(),
                other => display_scalar(other),
            },
        },
    }
}

/// The full document for one sample. `view` applies to the payload sections.
pub fn render_sample(
    sample: &Sample,
    index: usize,
    total: usize,
    view: PayloadView,
    options: &RenderOptions,
) -> Vec<RenderNode> {
    let mut nodes = vec![render_status_line(sample, index, total), render_summary(sample), RenderNode::Rule];

    nodes.push(RenderNode::heading(1, "Conversation", Tone::Accent));
    match sample.conversation() {
        Some(turns) => nodes.extend(render_conversation(&turns, options)),
        None => nodes.extend(render_payload(sample.outputs.as_ref(), view, options)),
    }

    nodes.push(RenderNode::heading(1, "Reward Explanation", Tone::Accent));
    nodes.extend(render_reward_explanation(sample));

    let metrics = sample.metrics_value();
    let payloads = [
        ("Inputs", sample.inputs.as_ref()),
        ("Metrics", metrics.as_ref()),
        ("Debug Info", sample.debug_info.as_ref()),
    ];
    for (title, payload) in payloads {
        nodes.push(RenderNode::heading(1, title, Tone::Accent));
        nodes.extend(render_payload(payload, view, options));
    }
    nodes
}

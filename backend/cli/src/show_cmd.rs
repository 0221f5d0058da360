use sampleview_core::{RenderOptions, Sample, ViewerError};
use sampleview_logging::{EventLogger, ViewerEvent};
use sampleview_render::{render_sample, PayloadView, Renderer};

/// Render the sample at `index` as terminal text. `raw` keeps payloads as JSON dumps.
pub fn show_sample(
    samples: &[Sample],
    index: usize,
    raw: bool,
    options: &RenderOptions,
    color: bool,
) -> Result<String, ViewerError> {
    let sample = samples.get(index).ok_or(ViewerError::SampleIndex {
        index,
        total: samples.len(),
    })?;

    if sample.conversation().is_none() {
        EventLogger::log_event(
            "show",
            ViewerEvent::RenderFallback {
                context: format!("sample {index}"),
                reason: "no outputs.conversation list; showing outputs payload".into(),
            },
        );
    }

    let view = if raw { PayloadView::Json } else { PayloadView::Auto };
    let nodes = render_sample(sample, index, samples.len(), view, options);
    Ok(if color {
        Renderer::to_ansi(&nodes)
    } else {
        Renderer::to_plain_text(&nodes)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn samples() -> Vec<Sample> {
        vec![Sample::from_value(&json!({
            "sample_id": "s-1",
            "task_name": "suite.qa",
            "metrics": {"mean_reward": 1.0},
            "outputs": {"conversation": [
                {"role": "User", "content": "What is 2+2?"},
                {"role": "Chatbot", "content": "4", "rationale": "Simple sum."}
            ]}
        }))]
    }

    #[test]
    fn renders_conversation_text() {
        let text = show_sample(&samples(), 0, false, &RenderOptions::default(), false).unwrap();
        assert!(text.starts_with("Sample #1/1 | PASSED (Reward: 1.0) | Task: qa | No-Op: False\n"));
        assert!(text.contains("━━ User (Turn 0) ━━\n  What is 2+2?"));
        assert!(text.contains("  ▸ Thinking\n    Simple sum."));
        assert!(!text.contains('\x1b'));
    }

    #[test]
    fn raw_flag_dumps_payloads_as_json() {
        let samples = vec![Sample::from_value(&json!({
            "outputs": {"answer": format!("## Answer\n\n- item{}", " more".repeat(30))}
        }))];
        let rendered = show_sample(&samples, 0, false, &RenderOptions::default(), false).unwrap();
        assert!(rendered.contains("━━ answer"));
        let raw = show_sample(&samples, 0, true, &RenderOptions::default(), false).unwrap();
        assert!(raw.contains("```json\n{\n  \"answer\": \"## Answer"));
    }

    #[test]
    fn out_of_range_index_is_an_error() {
        let err = show_sample(&samples(), 3, false, &RenderOptions::default(), false).unwrap_err();
        assert!(matches!(err, ViewerError::SampleIndex { index: 3, total: 1 }));
    }
}

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;
use tokio::io::AsyncReadExt;

use sampleview_core::{RenderOptions, ViewerError};
use sampleview_markup::{decode_markup, expand_nested_json};
use sampleview_render::{render_markup, Renderer};

/// Read a file, or stdin when `input` is `-`.
pub async fn read_input(input: &str) -> Result<String, ViewerError> {
    if input == "-" {
        let mut text = String::new();
        tokio::io::stdin().read_to_string(&mut text).await?;
        Ok(text)
    } else {
        Ok(tokio::fs::read_to_string(Path::new(input)).await?)
    }
}

/// Decoded sections of a marker-annotated payload, rendered or as JSON.
pub fn decode_text(text: &str, options: &RenderOptions, json: bool, color: bool) -> Result<String> {
    if json {
        let sections = decode_markup(text);
        let mut out = serde_json::to_string_pretty(&sections).context("Failed to serialize sections")?;
        out.push('\n');
        return Ok(out);
    }
    let nodes = render_markup(text, options);
    Ok(if color {
        Renderer::to_ansi(&nodes)
    } else {
        Renderer::to_plain_text(&nodes)
    })
}

/// Pretty-printed nested-JSON expansion of a JSON document.
pub fn expand_text(text: &str, options: &RenderOptions) -> Result<String> {
    let value: Value = serde_json::from_str(text.trim()).context("Input is not a JSON document")?;
    let expanded = expand_nested_json(&value, options.max_depth);
    let mut out = expanded.to_pretty_string(options.inline_nested_json);
    out.push('\n');
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reads_input_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("payload.txt");
        tokio::fs::write(&path, "<|USER_TOKEN|>hi").await.unwrap();
        let text = read_input(path.to_str().unwrap()).await.unwrap();
        assert_eq!(text, "<|USER_TOKEN|>hi");

        let missing = read_input(dir.path().join("nope").to_str().unwrap()).await;
        assert!(matches!(missing, Err(ViewerError::Io(_))));
    }

    #[test]
    fn decode_as_json_lists_sections() {
        let out = decode_text(
            "<|USER_TOKEN|>Q<|CHATBOT_TOKEN|>A",
            &RenderOptions::default(),
            true,
            false,
        )
        .unwrap();
        let sections: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(sections.as_array().unwrap().len(), 2);
        assert_eq!(sections[1]["content"], "A");
    }

    #[test]
    fn decode_renders_labelled_blocks() {
        let out = decode_text(
            "<|START_THINKING|>plan<|END_THINKING|>",
            &RenderOptions::default(),
            false,
            false,
        )
        .unwrap();
        assert_eq!(out, "▸ THINKING\n  plan\n");
    }

    #[test]
    fn expand_respects_depth_and_inline() {
        let text = r#"{"a": "{\"b\": \"[1]\"}"}"#;
        let inline = RenderOptions {
            inline_nested_json: true,
            ..RenderOptions::default()
        };
        assert_eq!(
            expand_text(text, &inline).unwrap(),
            "{\n  \"a\": {\n    \"b\": [\n      1\n    ]\n  }\n}\n"
        );

        let shallow = RenderOptions {
            max_depth: 0,
            ..RenderOptions::default()
        };
        let raw: Value = serde_json::from_str(text).unwrap();
        let expected = format!("{}\n", serde_json::to_string_pretty(&raw).unwrap());
        assert_eq!(expand_text(text, &shallow).unwrap(), expected);
    }

    #[test]
    fn expand_rejects_non_json() {
        let err = expand_text("plain words", &RenderOptions::default()).unwrap_err();
        assert!(err.to_string().contains("not a JSON document"));
    }
}

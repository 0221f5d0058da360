//! Viewer configuration schema.
//!
//! Every field is optional in the file; [`crate::apply_all_defaults`] fills
//! the gaps after load.

use serde::{Deserialize, Serialize};

use sampleview_core::{ClassifierOptions, RenderOptions};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewerConfig {
    /// Payload decoding (nested JSON, markup detection)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decoder: Option<DecoderConfig>,

    /// Terminal rendering
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub render: Option<RenderConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingConfig>,
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecoderConfig {
    /// Nesting budget for JSON serialised into strings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub markup_min_chars: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub markup_indicators: Option<Vec<String>>,

    /// Show expanded strings in place instead of wrapped in `isNestedJson` maps.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_nested_json: Option<bool>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_truncate_chars: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<ColorMode>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    /// `trace`, `debug`, `info`, `warn` or `error`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,

    /// Directory for the rolling NDJSON log file. No file log when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json: Option<bool>,
}

impl ViewerConfig {
    /// Options for the decoder and renderer. Unset fields take the library defaults.
    pub fn render_options(&self) -> RenderOptions {
        let base = RenderOptions::default();
        let decoder = self.decoder.clone().unwrap_or_default();
        let render = self.render.clone().unwrap_or_default();
        RenderOptions {
            max_depth: decoder.max_depth.unwrap_or(base.max_depth),
            inline_nested_json: decoder.inline_nested_json.unwrap_or(base.inline_nested_json),
            system_truncate_chars: render.system_truncate_chars.unwrap_or(base.system_truncate_chars),
            classifier: ClassifierOptions {
                min_chars: decoder.markup_min_chars.unwrap_or(base.classifier.min_chars),
                indicators: decoder.markup_indicators.unwrap_or(base.classifier.indicators),
            },
        }
    }

    pub fn color(&self) -> ColorMode {
        self.render.as_ref().and_then(|r| r.color).unwrap_or_default()
    }

    pub fn log_level(&self) -> &str {
        self.logging
            .as_ref()
            .and_then(|l| l.level.as_deref())
            .unwrap_or(crate::defaults::DEFAULT_LOG_LEVEL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_camel_case_yaml() {
        let yaml = "decoder:\n  maxDepth: 3\n  inlineNestedJson: true\nrender:\n  color: never\n";
        let cfg: ViewerConfig = serde_yaml::from_str(yaml).unwrap();
        let options = cfg.render_options();
        assert_eq!(options.max_depth, 3);
        assert!(options.inline_nested_json);
        assert_eq!(options.system_truncate_chars, RenderOptions::default().system_truncate_chars);
        assert_eq!(cfg.color(), ColorMode::Never);
    }

    #[test]
    fn empty_config_gives_default_options() {
        assert_eq!(ViewerConfig::default().render_options(), RenderOptions::default());
        assert_eq!(ViewerConfig::default().log_level(), "info");
    }
}

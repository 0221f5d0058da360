use std::path::PathBuf;

use serde_json::{json, Map, Value};

use sampleview_config::{ColorMode, ViewerConfig};

/// Settings resolved before the config file is read.
#[derive(Debug, Clone, PartialEq)]
pub struct CliConfig {
    /// Config file to load
    pub config_path: PathBuf,
    /// Log level override; wins over the config file
    pub log_level: Option<String>,
}

impl CliConfig {
    /// Flags first, then `SAMPLEVIEW_CONFIG` / `SAMPLEVIEW_LOG_LEVEL`, then the default config location.
    pub fn resolve(config_flag: Option<PathBuf>, log_level_flag: Option<String>) -> Self {
        Self::resolve_with(config_flag, log_level_flag, |key| std::env::var(key).ok())
    }

    fn resolve_with(
        config_flag: Option<PathBuf>,
        log_level_flag: Option<String>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let config_path = config_flag
            .or_else(|| env("SAMPLEVIEW_CONFIG").map(PathBuf::from))
            .unwrap_or_else(|| sampleview_config::config_file_path(&sampleview_config::config_dir()));
        Self {
            config_path,
            log_level: log_level_flag.or_else(|| env("SAMPLEVIEW_LOG_LEVEL")),
        }
    }
}

/// Merge patch carrying command-line overrides for the loaded config.
pub fn override_patch(log_level: Option<&str>, max_depth: Option<u32>, inline: bool) -> Value {
    let mut patch = Map::new();
    if let Some(level) = log_level {
        patch.insert("logging".into(), json!({ "level": level }));
    }
    let mut decoder = Map::new();
    if let Some(depth) = max_depth {
        decoder.insert("maxDepth".into(), json!(depth));
    }
    if inline {
        decoder.insert("inlineNestedJson".into(), json!(true));
    }
    if !decoder.is_empty() {
        patch.insert("decoder".into(), Value::Object(decoder));
    }
    Value::Object(patch)
}

/// Whether rendered output should carry ANSI codes.
pub fn use_color(config: &ViewerConfig, ansi_flag: bool) -> bool {
    if ansi_flag {
        return true;
    }
    match config.color() {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => crate::terminal_output::supports_color(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sampleview_config::{apply_merge_patch, RenderConfig};

    #[test]
    fn flags_win_over_env() {
        let env = |key: &str| match key {
            "SAMPLEVIEW_CONFIG" => Some("/etc/sampleview.yaml".to_string()),
            "SAMPLEVIEW_LOG_LEVEL" => Some("warn".to_string()),
            _ => None,
        };
        let cfg = CliConfig::resolve_with(Some("local.yaml".into()), None, env);
        assert_eq!(cfg.config_path, PathBuf::from("local.yaml"));
        assert_eq!(cfg.log_level.as_deref(), Some("warn"));

        let cfg = CliConfig::resolve_with(None, Some("trace".into()), env);
        assert_eq!(cfg.config_path, PathBuf::from("/etc/sampleview.yaml"));
        assert_eq!(cfg.log_level.as_deref(), Some("trace"));
    }

    #[test]
    fn empty_overrides_leave_config_alone() {
        let base = sampleview_config::apply_all_defaults(ViewerConfig::default());
        let patched = apply_merge_patch(&base, &override_patch(None, None, false)).unwrap();
        assert_eq!(patched, base);
    }

    #[test]
    fn overrides_reach_render_options() {
        let base = sampleview_config::apply_all_defaults(ViewerConfig::default());
        let patched = apply_merge_patch(&base, &override_patch(Some("debug"), Some(1), true)).unwrap();
        let options = patched.render_options();
        assert_eq!(options.max_depth, 1);
        assert!(options.inline_nested_json);
        assert_eq!(patched.log_level(), "debug");
        assert_eq!(
            patched.decoder.unwrap().markup_min_chars,
            base.decoder.unwrap().markup_min_chars
        );
    }

    #[test]
    fn color_follows_config_unless_forced() {
        let never = ViewerConfig {
            render: Some(RenderConfig {
                color: Some(ColorMode::Never),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(!use_color(&never, false));
        assert!(use_color(&never, true));
    }
}

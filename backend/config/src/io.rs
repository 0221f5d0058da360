//! Config file reading and command-line merge patches.

use crate::schema::ViewerConfig;
use anyhow::{Context, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

const CONFIG_FILE_NAME: &str = "config.yaml";

/// Resolve the config directory.
/// Priority: `SAMPLEVIEW_CONFIG_DIR` env > `~/.sampleview/`
pub fn config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("SAMPLEVIEW_CONFIG_DIR") {
        return PathBuf::from(dir);
    }
    match dirs::home_dir() {
        Some(home) => home.join(".sampleview"),
        None => PathBuf::from(".sampleview"),
    }
}

pub fn config_file_path(config_dir: &Path) -> PathBuf {
    config_dir.join(CONFIG_FILE_NAME)
}

/// Read the config file as an untyped tree, before env substitution.
///
/// Returns `Ok(None)` if the file doesn't exist (first run). An empty file
/// reads as an empty mapping.
pub async fn read_config_value(path: &Path) -> Result<Option<Value>> {
    if !fs::try_exists(path).await.unwrap_or(false) {
        debug!(path = %path.display(), "Config file does not exist; using defaults");
        return Ok(None);
    }

    let raw = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let value: Value = if raw.trim().is_empty() {
        Value::Object(Default::default())
    } else {
        serde_yaml::from_str(&raw).with_context(|| format!("Failed to parse config YAML at: {}", path.display()))?
    };

    info!(path = %path.display(), "Loaded config");
    Ok(Some(value))
}

/// Patch config with a JSON Merge Patch (RFC 7396).
///
/// Used for command-line overrides: only the keys present in `patch` change.
pub fn apply_merge_patch(config: &ViewerConfig, patch: &Value) -> Result<ViewerConfig> {
    let mut value = serde_json::to_value(config).context("Failed to serialize config for merge patch")?;
    json_merge_patch(&mut value, patch);
    serde_json::from_value(value).context("Failed to deserialize config after merge patch")
}

fn json_merge_patch(target: &mut Value, patch: &Value) {
    let Value::Object(patch_map) = patch else {
        *target = patch.clone();
        return;
    };
    if !target.is_object() {
        *target = Value::Object(Default::default());
    }
    if let Value::Object(target_map) = target {
        for (key, patch_val) in patch_map {
            if patch_val.is_null() {
                target_map.remove(key);
            } else {
                json_merge_patch(target_map.entry(key.clone()).or_insert(Value::Null), patch_val);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ColorMode;
    use serde_json::json;

    #[tokio::test]
    async fn missing_file_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = config_file_path(dir.path());
        assert!(read_config_value(&path).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn empty_file_reads_as_empty_mapping() {
        let dir = tempfile::tempdir().unwrap();
        let path = config_file_path(dir.path());
        tokio::fs::write(&path, "  \n").await.unwrap();
        assert_eq!(read_config_value(&path).await.unwrap(), Some(json!({})));
    }

    #[tokio::test]
    async fn yaml_reads_as_json_tree() {
        let dir = tempfile::tempdir().unwrap();
        let path = config_file_path(dir.path());
        tokio::fs::write(&path, "render:\n  color: always\n  systemTruncateChars: 80\n")
            .await
            .unwrap();
        let value = read_config_value(&path).await.unwrap().unwrap();
        let cfg: ViewerConfig = serde_json::from_value(value).unwrap();
        let render = cfg.render.unwrap();
        assert_eq!(render.color, Some(ColorMode::Always));
        assert_eq!(render.system_truncate_chars, Some(80));
    }

    #[tokio::test]
    async fn malformed_yaml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = config_file_path(dir.path());
        tokio::fs::write(&path, "decoder: [unclosed").await.unwrap();
        let err = read_config_value(&path).await.unwrap_err();
        assert!(err.to_string().contains("Failed to parse config YAML"));
    }

    #[test]
    fn merge_patch_overrides_one_field() {
        let base = ViewerConfig::default();
        let patched = apply_merge_patch(&base, &json!({"decoder": {"maxDepth": 2}})).unwrap();
        assert_eq!(patched.decoder.unwrap().max_depth, Some(2));
        assert!(patched.render.is_none());
    }

    #[test]
    fn merge_patch_null_removes_section() {
        let base = apply_merge_patch(&ViewerConfig::default(), &json!({"logging": {"level": "debug"}})).unwrap();
        let patched = apply_merge_patch(&base, &json!({"logging": null})).unwrap();
        assert!(patched.logging.is_none());
    }
}

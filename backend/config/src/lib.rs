//! `sampleview-config`: viewer configuration.
//!
//! Provides:
//! - Typed config schema (decoder, render, logging)
//! - YAML reading and merge-patch overrides
//! - `${ENV_VAR}` substitution
//! - Default value application
//! - Validation with errors and warnings

pub mod defaults;
pub mod env;
pub mod io;
pub mod schema;
pub mod validation;

pub use defaults::{apply_all_defaults, DEFAULT_LOG_LEVEL};
pub use env::{resolve_env_vars, resolve_env_vars_with, MissingEnvVarError};
pub use io::{apply_merge_patch, config_dir, config_file_path, read_config_value};
pub use schema::{ColorMode, DecoderConfig, LoggingConfig, RenderConfig, ViewerConfig};
pub use validation::{validate, ConfigValidationError, ValidationReport};

use anyhow::{bail, Context, Result};
use std::path::Path;

/// Load a config file, substitute env vars, apply defaults and validate.
///
/// A missing file yields the defaults. Validation warnings are logged;
/// validation errors are logged and returned together as one error.
pub async fn load_and_prepare(path: &Path) -> Result<ViewerConfig> {
    let config = match read_config_value(path).await? {
        Some(value) => {
            let value = resolve_env_vars(&value).context("Failed to resolve env vars in config")?;
            serde_json::from_value(value).context("Failed to deserialize config after processing")?
        }
        None => ViewerConfig::default(),
    };

    prepare(config)
}

/// Defaults and validation, for a config that is already in memory.
pub fn prepare(config: ViewerConfig) -> Result<ViewerConfig> {
    let config = apply_all_defaults(config);

    let report = validate(&config);
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    for error in &report.errors {
        tracing::error!(path = %error.path, message = %error.message, "Config error");
    }
    if !report.is_valid() {
        let messages: Vec<String> = report.errors.iter().map(ToString::to_string).collect();
        bail!("Invalid config:\n  {}", messages.join("\n  "));
    }

    Ok(config)
}

//! Config validation: collects every problem in one pass.

use crate::schema::ViewerConfig;
use thiserror::Error;

/// Largest accepted `decoder.maxDepth`.
pub const MAX_DEPTH_LIMIT: u32 = 32;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

pub fn validate(config: &ViewerConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_decoder(config, &mut report);
    validate_render(config, &mut report);
    validate_logging(config, &mut report);
    report
}

fn validate_decoder(config: &ViewerConfig, report: &mut ValidationReport) {
    let Some(decoder) = &config.decoder else { return };
    if let Some(depth) = decoder.max_depth {
        if depth > MAX_DEPTH_LIMIT {
            report.error(
                "decoder.maxDepth",
                format!("maxDepth must be between 0 and {MAX_DEPTH_LIMIT}, got {depth}"),
            );
        } else if depth == 0 {
            report.warn("decoder.maxDepth", "maxDepth is 0; nested JSON will not be expanded");
        }
    }
    if let Some(indicators) = &decoder.markup_indicators {
        if indicators.is_empty() {
            report.error("decoder.markupIndicators", "At least one markup indicator is required");
        }
        if indicators.iter().any(|i| i.is_empty()) {
            report.error("decoder.markupIndicators", "Markup indicators cannot be empty strings");
        }
    }
    if decoder.markup_min_chars == Some(0) {
        report.warn(
            "decoder.markupMinChars",
            "markupMinChars is 0; short strings may be rendered as markup",
        );
    }
}

fn validate_render(config: &ViewerConfig, report: &mut ValidationReport) {
    let Some(render) = &config.render else { return };
    if render.system_truncate_chars == Some(0) {
        report.error("render.systemTruncateChars", "systemTruncateChars must be > 0");
    }
}

fn validate_logging(config: &ViewerConfig, report: &mut ValidationReport) {
    let Some(logging) = &config.logging else { return };
    if let Some(level) = &logging.level {
        if !LOG_LEVELS.contains(&level.to_ascii_lowercase().as_str()) {
            report.error(
                "logging.level",
                format!("Unknown log level '{level}'. Use one of: {}", LOG_LEVELS.join(", ")),
            );
        }
    }
    if logging.dir.as_deref().map(str::trim) == Some("") {
        report.warn("logging.dir", "Empty log directory; file logging is disabled");
    }
}

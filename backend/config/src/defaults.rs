//! Config defaults: fills every unset field after load.

use sampleview_core::{
    DEFAULT_MARKUP_INDICATORS, DEFAULT_MARKUP_MIN_CHARS, DEFAULT_MAX_DEPTH, DEFAULT_SYSTEM_TRUNCATE_CHARS,
};

use crate::schema::{ColorMode, DecoderConfig, LoggingConfig, RenderConfig, ViewerConfig};

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Apply all defaults to a freshly loaded config.
pub fn apply_all_defaults(config: ViewerConfig) -> ViewerConfig {
    let config = apply_decoder_defaults(config);
    let config = apply_render_defaults(config);
    apply_logging_defaults(config)
}

fn apply_decoder_defaults(mut config: ViewerConfig) -> ViewerConfig {
    let decoder = config.decoder.get_or_insert_with(DecoderConfig::default);
    decoder.max_depth.get_or_insert(DEFAULT_MAX_DEPTH);
    decoder.markup_min_chars.get_or_insert(DEFAULT_MARKUP_MIN_CHARS);
    decoder
        .markup_indicators
        .get_or_insert_with(|| DEFAULT_MARKUP_INDICATORS.iter().map(|s| s.to_string()).collect());
    decoder.inline_nested_json.get_or_insert(false);
    config
}

fn apply_render_defaults(mut config: ViewerConfig) -> ViewerConfig {
    let render = config.render.get_or_insert_with(RenderConfig::default);
    render.system_truncate_chars.get_or_insert(DEFAULT_SYSTEM_TRUNCATE_CHARS);
    render.color.get_or_insert(ColorMode::Auto);
    config
}

/// The file log stays off unless a directory is configured.
fn apply_logging_defaults(mut config: ViewerConfig) -> ViewerConfig {
    let logging = config.logging.get_or_insert_with(LoggingConfig::default);
    if logging.level.is_none() {
        logging.level = Some(DEFAULT_LOG_LEVEL.to_string());
    }
    logging.json.get_or_insert(true);
    config
}

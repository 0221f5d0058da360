//! Structured Logger
//!
//! Console output on stderr (stdout carries rendered samples), plus an
//! optional daily-rolling file log, NDJSON by default.

use std::io::IsTerminal;
use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const LOG_FILE_NAME: &str = "sampleview.log";

/// Initialize the global logger.
///
/// `RUST_LOG` overrides `level` when set. With a `log_dir`, events are also
/// written to `<log_dir>/sampleview.log.YYYY-MM-DD`. Returns `false` if a
/// global subscriber was already installed.
pub fn init_logger(log_dir: Option<&Path>, level: &str, json: bool) -> bool {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let appender = log_dir.map(|dir| RollingFileAppender::new(Rotation::DAILY, dir, LOG_FILE_NAME));
    let (json_layer, text_layer) = match appender {
        Some(file) if json => (Some(fmt::layer().json().with_writer(file).with_ansi(false)), None),
        Some(file) => (None, Some(fmt::layer().with_writer(file).with_ansi(false))),
        None => (None, None),
    };

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(json_layer)
        .with(text_layer)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_rolling_json_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(init_logger(Some(dir.path()), "info", true));
        tracing::info!(samples = 3, "Loaded samples");

        let names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert!(names.iter().any(|n| n.starts_with(LOG_FILE_NAME)), "files: {names:?}");

        // A second install is refused.
        assert!(!init_logger(None, "debug", false));
    }
}

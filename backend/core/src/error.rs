use thiserror::Error;

/// Top-level error type for the sampleview outer layers.
///
/// The decoding and rendering pipeline never produces one of these; they only
/// surface from loading records and resolving configuration.
#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid record on line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("sample index {index} out of range ({total} samples loaded)")]
    SampleIndex { index: usize, total: usize },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

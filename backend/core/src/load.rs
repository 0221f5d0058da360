//! Line-delimited JSON sample loading.

use std::path::Path;

use anyhow::Context;
use tracing::{debug, info, warn};

use crate::error::ViewerError;
use crate::record::Sample;

/// Parse a JSONL document. Blank lines are skipped; a line that is not valid
/// JSON is reported and skipped so one bad record does not hide the rest.
pub fn parse_jsonl(text: &str) -> (Vec<Sample>, Vec<ViewerError>) {
    let mut samples = Vec::new();
    let mut errors = Vec::new();

    for (i, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<Sample>(line) {
            Ok(sample) => samples.push(sample),
            Err(e) => {
                debug!(line = i + 1, error = %e, "Skipping unparseable record");
                errors.push(ViewerError::Parse {
                    line: i + 1,
                    message: e.to_string(),
                });
            }
        }
    }

    (samples, errors)
}

/// Read and parse a JSONL file.
pub async fn load_jsonl(path: &Path) -> Result<(Vec<Sample>, Vec<ViewerError>), ViewerError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read samples file: {}", path.display()))?;

    let (samples, errors) = parse_jsonl(&raw);
    if !errors.is_empty() {
        warn!(path = %path.display(), skipped = errors.len(), "Some records could not be parsed");
    }
    info!(path = %path.display(), count = samples.len(), "Loaded samples");
    Ok((samples, errors))
}

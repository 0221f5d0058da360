//! Options threaded explicitly through the decoder and renderer.

use serde::{Deserialize, Serialize};

/// Default nesting budget for JSON-in-string expansion.
pub const DEFAULT_MAX_DEPTH: u32 = 5;

/// Strings at or below this many characters are never classified as markup.
pub const DEFAULT_MARKUP_MIN_CHARS: usize = 100;

/// Substrings whose presence marks a long string as markup.
pub const DEFAULT_MARKUP_INDICATORS: &[&str] = &["##", "```", "**", "- ", "\n#", "<|"];

/// System turns are cut to this many characters for display.
pub const DEFAULT_SYSTEM_TRUNCATE_CHARS: usize = 500;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierOptions {
    pub min_chars: usize,
    pub indicators: Vec<String>,
}

impl Default for ClassifierOptions {
    fn default() -> Self {
        Self {
            min_chars: DEFAULT_MARKUP_MIN_CHARS,
            indicators: DEFAULT_MARKUP_INDICATORS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderOptions {
    pub max_depth: u32,
    /// Print expanded strings in place instead of as `{"isNestedJson": ...}` maps.
    pub inline_nested_json: bool,
    pub system_truncate_chars: usize,
    pub classifier: ClassifierOptions,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            inline_nested_json: false,
            system_truncate_chars: DEFAULT_SYSTEM_TRUNCATE_CHARS,
            classifier: ClassifierOptions::default(),
        }
    }
}

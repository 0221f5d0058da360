//! `sampleview-core`: shared types for the sampleview transcript viewer.
//!
//! Provides:
//! - Lenient sample / conversation schema (`Sample`, `Turn`, ...)
//! - `ExpandedValue`, the JSON tree produced by nested-JSON expansion
//! - `RenderOptions`, passed explicitly into every decoder/renderer entry point
//! - JSONL loading

pub mod error;
pub mod load;
pub mod options;
pub mod record;
pub mod value;

pub use error::ViewerError;
pub use load::{load_jsonl, parse_jsonl};
pub use options::{
    ClassifierOptions, RenderOptions, DEFAULT_MARKUP_INDICATORS, DEFAULT_MARKUP_MIN_CHARS,
    DEFAULT_MAX_DEPTH, DEFAULT_SYSTEM_TRUNCATE_CHARS,
};
pub use record::{
    display_scalar, ContentBlock, Role, Sample, ToolCall, ToolOutput, ToolResult, Turn,
    TurnContent,
};
pub use value::{ExpandedValue, NESTED_JSON_CONTENT, NESTED_JSON_FLAG};

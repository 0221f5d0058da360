//! Decoder for marker-annotated transcript payloads.
//!
//! Turns raw model text carrying `<|NAME|>` role/section markers, fenced code
//! and JSON serialised into strings into structured values the render layer
//! can display. Every entry point is a total function of its input.

pub mod classify;
pub mod expand;
pub mod fences;
pub mod grammar;
pub mod ir;
pub mod scanner;
pub mod sections;

pub use classify::{is_markup_text, looks_like_markup};
pub use expand::{expand_expanded, expand_json_text, expand_nested_json, looks_like_json, DEFAULT_MAX_DEPTH};
pub use fences::{split_code_fences, Segment};
pub use grammar::{MarkerRole, SectionKind, MARKERS};
pub use ir::{parse_prose, ProseBlock};
pub use scanner::{scan, Token};
pub use sections::{decode_markup, Section};

//! Token scanner: locates every `<|NAME|>` occurrence in a payload.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::grammar::{lookup, MarkerRole, SectionKind};

/// Anything shaped like a marker, recognised or not.
static MARKER_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"<\|[A-Z_]+\|>").unwrap());

/// One marker occurrence. Offsets are byte offsets into the scanned string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub text: &'a str,
    pub kind: SectionKind,
    pub role: MarkerRole,
    pub start: usize,
    pub end: usize,
}

impl Token<'_> {
    pub fn is_recognized(&self) -> bool {
        self.role != MarkerRole::Unknown
    }
}

/// Scan `text` left to right. Marker-shaped text outside the grammar is still
/// reported, tagged [`SectionKind::Unknown`].
pub fn scan(text: &str) -> Vec<Token<'_>> {
    MARKER_PATTERN
        .find_iter(text)
        .map(|m| {
            let (kind, role) = match lookup(m.as_str()) {
                Some(spec) => (spec.kind, spec.role),
                None => (SectionKind::Unknown, MarkerRole::Unknown),
            };
            Token {
                text: m.as_str(),
                kind,
                role,
                start: m.start(),
                end: m.end(),
            }
        })
        .collect()
}

//! Code-fence splitter.
//!
//! Splits markup text into prose and fenced code. Only a fence with a newline
//! after the optional language tag and a matching close counts; a stray
//! opening fence stays in the prose.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use tracing::trace;

static CODE_FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)```(\w+)?\n(.*?)```").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Segment {
    Prose { text: String },
    Code { language: String, text: String },
}

/// Split `text` into alternating prose and code segments, in order.
/// Whitespace-only prose between fences is dropped.
pub fn split_code_fences(text: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut last_end = 0;

    for caps in CODE_FENCE.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        push_prose(&mut segments, &text[last_end..whole.start()]);

        let language = caps.get(1).map_or("text", |m| m.as_str()).to_string();
        let body = caps.get(2).map_or("", |m| m.as_str()).trim();
        let text = if language.eq_ignore_ascii_case("json") {
            reformat_json(body)
        } else {
            body.to_string()
        };
        segments.push(Segment::Code { language, text });

        last_end = whole.end();
    }

    push_prose(&mut segments, &text[last_end..]);
    segments
}

fn push_prose(segments: &mut Vec<Segment>, text: &str) {
    if !text.trim().is_empty() {
        segments.push(Segment::Prose {
            text: text.to_string(),
        });
    }
}

/// Re-indent a JSON body, or hand it back untouched if it does not parse.
fn reformat_json(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(value) => serde_json::to_string_pretty(&value).unwrap_or_else(|_| body.to_string()),
        Err(e) => {
            trace!(error = %e, "json fence did not parse; keeping body");
            body.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prose(text: &str) -> Segment {
        Segment::Prose { text: text.into() }
    }

    fn code(language: &str, text: &str) -> Segment {
        Segment::Code {
            language: language.into(),
            text: text.into(),
        }
    }

    #[test]
    fn prose_around_a_fence() {
        let segments = split_code_fences("Before\n```python\nprint('hi')\n```\nAfter");
        assert_eq!(
            segments,
            [prose("Before\n"), code("python", "print('hi')"), prose("\nAfter")]
        );
    }

    #[test]
    fn untagged_fence_defaults_to_text() {
        let segments = split_code_fences("```\nraw\n```");
        assert_eq!(segments, [code("text", "raw")]);
    }

    #[test]
    fn json_fence_is_reindented() {
        let segments = split_code_fences("```json\n{\"a\":1,\"b\":[1,2]}\n```");
        assert_eq!(
            segments,
            [code("json", "{\n  \"a\": 1,\n  \"b\": [\n    1,\n    2\n  ]\n}")]
        );
    }

    #[test]
    fn broken_json_fence_passes_through() {
        let segments = split_code_fences("```JSON\n{\"a\": \n```");
        assert_eq!(segments, [code("JSON", "{\"a\":")]);
    }

    #[test]
    fn fences_are_non_greedy() {
        let segments = split_code_fences("```a\none\n```mid```b\ntwo\n```");
        assert_eq!(segments, [code("a", "one"), prose("mid"), code("b", "two")]);
    }

    #[test]
    fn unclosed_fence_is_prose() {
        let text = "Intro\n```rust\nfn main() {}";
        assert_eq!(split_code_fences(text), [prose(text)]);
    }

    #[test]
    fn blank_text_yields_nothing() {
        assert!(split_code_fences("  \n ").is_empty());
    }
}

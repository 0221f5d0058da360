//! Section stack machine.
//!
//! Walks the scanner's token stream and cuts the payload into [`Section`]s.
//! The open sections are tracked on an explicit stack so nested markers
//! (a thinking block inside a chatbot turn, say) resume the outer kind once
//! they close.
//!
//! Recovery rules, none of which fail:
//! - an END marker pops whatever is on top, even when it belongs to a
//!   different kind, and is a no-op on an empty stack;
//! - an unclosed START runs to the end of the payload;
//! - a role marker discards everything open and starts a fresh top-level
//!   section.

use serde::Serialize;
use tracing::{debug, trace};

use crate::grammar::{MarkerRole, SectionKind};
use crate::scanner::{scan, Token};

/// A contiguous run of payload text with one semantic kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub kind: SectionKind,
    /// Raw text between the bounding markers, untrimmed.
    pub content: String,
    /// The marker that opened this section; empty for [`SectionKind::Plain`].
    pub opened_by: String,
}

struct Frame<'a> {
    kind: SectionKind,
    opened_by: &'a str,
}

/// Decode a marker-annotated payload into sections.
///
/// An empty payload yields no sections; a payload without markers yields one
/// `Plain` section holding all of it. Whitespace-only runs are dropped.
pub fn decode_markup(text: &str) -> Vec<Section> {
    if text.is_empty() {
        return Vec::new();
    }

    let tokens = scan(text);
    if tokens.is_empty() {
        return vec![Section {
            kind: SectionKind::Plain,
            content: text.to_string(),
            opened_by: String::new(),
        }];
    }

    let mut stack: Vec<Frame<'_>> = Vec::new();
    let mut sections = Vec::new();
    let mut cursor = 0;

    for token in &tokens {
        // Unknown markers are not boundaries: their literal text stays inside
        // whichever section ends up containing it, so an unsupported marker
        // is shown as text and never flagged.
        if !token.is_recognized() {
            trace!(marker = token.text, offset = token.start, "Folding unknown marker into content");
            continue;
        }

        push_section(&mut sections, &stack, &text[cursor..token.start]);
        apply(&mut stack, token);
        cursor = token.end;
    }

    push_section(&mut sections, &stack, &text[cursor..]);
    sections
}

fn push_section(sections: &mut Vec<Section>, stack: &[Frame<'_>], content: &str) {
    if content.trim().is_empty() {
        return;
    }
    let (kind, opened_by) = match stack.last() {
        Some(frame) => (frame.kind, frame.opened_by),
        None => (SectionKind::Plain, ""),
    };
    sections.push(Section {
        kind,
        content: content.to_string(),
        opened_by: opened_by.to_string(),
    });
}

fn apply<'a>(stack: &mut Vec<Frame<'a>>, token: &Token<'a>) {
    match token.role {
        MarkerRole::Start => stack.push(Frame {
            kind: token.kind,
            opened_by: token.text,
        }),
        MarkerRole::End => match stack.pop() {
            Some(frame) if frame.kind != token.kind => {
                debug!(
                    open = frame.kind.slug(),
                    closing = token.text,
                    "Mismatched end marker; closing innermost section anyway"
                );
            }
            Some(_) => {}
            None => debug!(closing = token.text, "End marker with nothing open"),
        },
        MarkerRole::Standalone => {
            stack.clear();
            stack.push(Frame {
                kind: token.kind,
                opened_by: token.text,
            });
        }
        MarkerRole::Boundary | MarkerRole::Unknown => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn kinds(sections: &[Section]) -> Vec<SectionKind> {
        sections.iter().map(|s| s.kind).collect()
    }

    #[test]
    fn role_marker_opens_section() {
        let sections = decode_markup("<|SYSTEM_TOKEN|>Hello");
        assert_eq!(
            sections,
            [Section {
                kind: SectionKind::System,
                content: "Hello".into(),
                opened_by: "<|SYSTEM_TOKEN|>".into(),
            }]
        );
    }

    #[test]
    fn paired_action_section() {
        let sections = decode_markup("<|START_ACTION|>{\"a\":1}<|END_ACTION|>");
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].kind, SectionKind::Action);
        assert_eq!(sections[0].content, "{\"a\":1}");
    }

    #[test]
    fn plain_text_is_one_section() {
        let text = "This is just plain text without any special tokens.";
        let sections = decode_markup(text);
        assert_eq!(kinds(&sections), [SectionKind::Plain]);
        assert_eq!(sections[0].content, text);
        assert!(sections[0].opened_by.is_empty());
    }

    #[test]
    fn empty_input_has_no_sections() {
        assert!(decode_markup("").is_empty());
    }

    #[test]
    fn role_markers_replace_each_other() {
        let sections = decode_markup(
            "<|SYSTEM_TOKEN|>System prompt.<|USER_TOKEN|>Question.<|CHATBOT_TOKEN|>Answer.",
        );
        assert_eq!(
            kinds(&sections),
            [SectionKind::System, SectionKind::User, SectionKind::Chatbot]
        );
    }

    #[test]
    fn nested_section_resumes_outer_kind() {
        let sections = decode_markup(
            "<|CHATBOT_TOKEN|>Let me think.<|START_THINKING|>Analyze.<|END_THINKING|>Answer.",
        );
        assert_eq!(
            kinds(&sections),
            [SectionKind::Chatbot, SectionKind::Thinking, SectionKind::Chatbot]
        );
        assert_eq!(sections[2].content, "Answer.");
        assert_eq!(sections[2].opened_by, "<|CHATBOT_TOKEN|>");
    }

    #[test]
    fn role_marker_clears_open_sections() {
        let sections = decode_markup("<|START_THINKING|>a<|USER_TOKEN|>b<|END_THINKING|>c");
        // The END pops USER, leaving nothing open for "c".
        assert_eq!(
            kinds(&sections),
            [SectionKind::Thinking, SectionKind::User, SectionKind::Plain]
        );
    }

    #[test]
    fn mismatched_end_pops_anyway() {
        let sections =
            decode_markup("<|START_ACTION|>a<|START_THINKING|>b<|END_ACTION|>c<|END_THINKING|>d");
        assert_eq!(
            kinds(&sections),
            [
                SectionKind::Action,
                SectionKind::Thinking,
                SectionKind::Action,
                SectionKind::Plain
            ]
        );
    }

    #[test]
    fn unclosed_start_runs_to_end() {
        let sections = decode_markup("before<|START_RESPONSE|>never closed");
        assert_eq!(kinds(&sections), [SectionKind::Plain, SectionKind::Response]);
        assert_eq!(sections[1].content, "never closed");
    }

    #[test]
    fn end_on_empty_stack_is_noop() {
        let sections = decode_markup("<|END_THINKING|>text");
        assert_eq!(kinds(&sections), [SectionKind::Plain]);
        assert_eq!(sections[0].content, "text");
    }

    #[test]
    fn turn_boundaries_do_not_change_kind() {
        let sections =
            decode_markup("<|START_OF_TURN_TOKEN|><|USER_TOKEN|>Hi<|END_OF_TURN_TOKEN|>more");
        assert_eq!(kinds(&sections), [SectionKind::User, SectionKind::User]);
        assert_eq!(sections[1].content, "more");
    }

    #[test]
    fn whitespace_runs_are_dropped() {
        let sections = decode_markup("<|START_ACTION|>{}<|END_ACTION|>\n  \n<|START_RESPONSE|>ok");
        assert_eq!(kinds(&sections), [SectionKind::Action, SectionKind::Response]);
    }

    #[test]
    fn unknown_marker_stays_in_content() {
        let sections = decode_markup("<|USER_TOKEN|>look <|IMAGE_TOKEN|> here<|CHATBOT_TOKEN|>ok");
        assert_eq!(kinds(&sections), [SectionKind::User, SectionKind::Chatbot]);
        assert_eq!(sections[0].content, "look <|IMAGE_TOKEN|> here");
    }

    #[test]
    fn only_unknown_markers_is_one_plain_section() {
        let sections = decode_markup("a <|FOO|> b");
        assert_eq!(kinds(&sections), [SectionKind::Plain]);
        assert_eq!(sections[0].content, "a <|FOO|> b");
    }

    fn fragment() -> impl Strategy<Value = String> {
        prop_oneof![
            "[a-z0-9 .{}\"]{0,8}[a-z]",
            Just("<|SYSTEM_TOKEN|>".to_string()),
            Just("<|USER_TOKEN|>".to_string()),
            Just("<|CHATBOT_TOKEN|>".to_string()),
            Just("<|START_THINKING|>".to_string()),
            Just("<|END_THINKING|>".to_string()),
            Just("<|START_ACTION|>".to_string()),
            Just("<|END_ACTION|>".to_string()),
            Just("<|START_OF_TURN_TOKEN|>".to_string()),
            Just("<|NOT_A_MARKER|>".to_string()),
        ]
    }

    proptest! {
        #[test]
        fn prop_sections_partition_text(parts in prop::collection::vec(fragment(), 0..16)) {
            let text: String = parts.concat();
            let expected: String = parts
                .iter()
                .filter(|p| crate::grammar::lookup(p).is_none())
                .map(String::as_str)
                .collect();
            let rebuilt: String = decode_markup(&text).iter().map(|s| s.content.as_str()).collect();
            prop_assert_eq!(rebuilt, expected);
        }

        #[test]
        fn prop_marker_free_text_is_single_plain_section(text in "[^<]{1,64}") {
            let sections = decode_markup(&text);
            prop_assert_eq!(sections.len(), 1);
            prop_assert_eq!(sections[0].kind, SectionKind::Plain);
            prop_assert_eq!(&sections[0].content, &text);
        }

        #[test]
        fn prop_decode_never_panics(text in any::<String>()) {
            let _ = decode_markup(&text);
        }
    }
}

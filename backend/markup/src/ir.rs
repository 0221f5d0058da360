//! Prose Intermediate Representation
//!
//! Parses the prose parts of a payload into a small block tree so renderers
//! get headings, paragraphs and lists instead of raw markdown source. Inline
//! spans keep their source text (`2*3*4` stays `2*3*4`, `` `x` `` keeps its
//! backticks) and links keep their destination as `text (url)`.

use std::ops::Range;

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, LinkType, Parser, Tag};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProseBlock {
    Heading { level: u8, text: String },
    Paragraph { text: String },
    /// `start` is the first number of an ordered list; `None` for bullets.
    List { start: Option<u64>, items: Vec<Vec<ProseBlock>> },
    Quote { blocks: Vec<ProseBlock> },
    Code { language: String, text: String },
    Rule,
}

enum Inline {
    Paragraph,
    Heading(u8),
    Code(String),
}

enum Container {
    Root(Vec<ProseBlock>),
    List { start: Option<u64>, items: Vec<Vec<ProseBlock>> },
    Item(Vec<ProseBlock>),
    Quote(Vec<ProseBlock>),
}

struct Builder<'a> {
    source: &'a str,
    stack: Vec<Container>,
    inline: Option<Inline>,
    text: String,
    /// Open emphasis / strong / strikethrough spans whose source was copied
    /// verbatim; events inside them are skipped.
    verbatim_depth: usize,
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

fn is_verbatim_span(tag: &Tag<'_>) -> bool {
    matches!(tag, Tag::Emphasis | Tag::Strong | Tag::Strikethrough)
}

impl<'a> Builder<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            stack: vec![Container::Root(Vec::new())],
            inline: None,
            text: String::new(),
            verbatim_depth: 0,
        }
    }

    fn push_source(&mut self, range: Range<usize>) {
        if let Some(raw) = self.source.get(range) {
            self.text.push_str(raw);
        }
    }

    fn emit(&mut self, block: ProseBlock) {
        match self.stack.last_mut() {
            Some(Container::Root(blocks))
            | Some(Container::Item(blocks))
            | Some(Container::Quote(blocks)) => blocks.push(block),
            Some(Container::List { items, .. }) => match items.last_mut() {
                Some(item) => item.push(block),
                None => items.push(vec![block]),
            },
            None => self.stack.push(Container::Root(vec![block])),
        }
    }

    /// Close the pending inline run. Text seen outside any paragraph (tight
    /// list items) becomes a paragraph.
    fn flush(&mut self) {
        let inline = self.inline.take();
        let text = std::mem::take(&mut self.text);
        let block = match inline {
            Some(Inline::Heading(level)) => ProseBlock::Heading {
                level,
                text: text.trim().to_string(),
            },
            Some(Inline::Code(language)) => ProseBlock::Code {
                language,
                text: text.trim_end().to_string(),
            },
            Some(Inline::Paragraph) | None => {
                if text.trim().is_empty() {
                    return;
                }
                ProseBlock::Paragraph {
                    text: text.trim().to_string(),
                }
            }
        };
        self.emit(block);
    }

    fn close_container(&mut self) {
        self.flush();
        let Some(container) = self.stack.pop() else { return };
        match container {
            Container::Item(blocks) => match self.stack.last_mut() {
                Some(Container::List { items, .. }) => items.push(blocks),
                _ => {
                    for block in blocks {
                        self.emit(block);
                    }
                }
            },
            Container::List { start, items } => self.emit(ProseBlock::List { start, items }),
            Container::Quote(blocks) => self.emit(ProseBlock::Quote { blocks }),
            root @ Container::Root(_) => self.stack.push(root),
        }
    }

    fn event(&mut self, event: Event<'_>, range: Range<usize>) {
        if self.verbatim_depth > 0 {
            match event {
                Event::Start(tag) if is_verbatim_span(&tag) => self.verbatim_depth += 1,
                Event::End(tag) if is_verbatim_span(&tag) => self.verbatim_depth -= 1,
                _ => {}
            }
            return;
        }
        match event {
            Event::Start(tag) if is_verbatim_span(&tag) => {
                self.push_source(range);
                self.verbatim_depth = 1;
            }
            Event::End(Tag::Link(link_type, dest, _)) | Event::End(Tag::Image(link_type, dest, _)) => {
                let autolink = matches!(link_type, LinkType::Autolink | LinkType::Email);
                if !autolink && !dest.is_empty() && !self.text.ends_with(&*dest) {
                    self.text.push_str(&format!(" ({dest})"));
                }
            }
            Event::Start(Tag::Paragraph) => {
                self.flush();
                self.inline = Some(Inline::Paragraph);
            }
            Event::Start(Tag::Heading(level, _, _)) => {
                self.flush();
                self.inline = Some(Inline::Heading(heading_level(level)));
            }
            Event::Start(Tag::CodeBlock(kind)) => {
                self.flush();
                let language = match kind {
                    CodeBlockKind::Fenced(lang) if !lang.is_empty() => lang.to_string(),
                    _ => "text".to_string(),
                };
                self.inline = Some(Inline::Code(language));
            }
            Event::End(Tag::Paragraph) | Event::End(Tag::Heading(..)) | Event::End(Tag::CodeBlock(_)) => {
                self.flush()
            }
            Event::Start(Tag::List(start)) => {
                self.flush();
                self.stack.push(Container::List { start, items: Vec::new() });
            }
            Event::Start(Tag::Item) => {
                self.flush();
                self.stack.push(Container::Item(Vec::new()));
            }
            Event::Start(Tag::BlockQuote) => {
                self.flush();
                self.stack.push(Container::Quote(Vec::new()));
            }
            Event::End(Tag::List(_)) | Event::End(Tag::Item) | Event::End(Tag::BlockQuote) => {
                self.close_container()
            }
            Event::Code(_) => self.push_source(range),
            Event::Text(text) | Event::Html(text) => self.text.push_str(&text),
            Event::SoftBreak | Event::HardBreak => self.text.push('\n'),
            Event::Rule => {
                self.flush();
                self.emit(ProseBlock::Rule);
            }
            _ => {}
        }
    }

    fn finish(mut self) -> Vec<ProseBlock> {
        self.flush();
        while self.stack.len() > 1 {
            self.close_container();
        }
        match self.stack.pop() {
            Some(Container::Root(blocks)) => blocks,
            _ => Vec::new(),
        }
    }
}

/// Parse markdown prose into blocks.
pub fn parse_prose(markdown: &str) -> Vec<ProseBlock> {
    let mut builder = Builder::new(markdown);
    for (event, range) in Parser::new(markdown).into_offset_iter() {
        builder.event(event, range);
    }
    builder.finish()
}

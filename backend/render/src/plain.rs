//! Flattens a render tree into terminal text, with or without ANSI styling.

use crate::node::{RenderNode, Tone};

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const ITALIC: &str = "\x1b[3m";

const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const BLUE: &str = "\x1b[34m";
const MAGENTA: &str = "\x1b[35m";
const CYAN: &str = "\x1b[36m";

const RULE_WIDTH: usize = 60;
const INDENT: &str = "  ";

fn tone_style(tone: Tone) -> &'static str {
    match tone {
        Tone::Default => "",
        Tone::Dim => DIM,
        Tone::Accent | Tone::Literal | Tone::Tool => CYAN,
        Tone::System => MAGENTA,
        Tone::User => BLUE,
        Tone::Chatbot | Tone::Response | Tone::Success => GREEN,
        Tone::Thinking => ITALIC,
        Tone::Action | Tone::Warning => YELLOW,
        Tone::Error => RED,
    }
}

pub struct Renderer;

impl Renderer {
    /// Renders the tree as plain text.
    pub fn to_plain_text(nodes: &[RenderNode]) -> String {
        Self::render(nodes, false)
    }

    /// Renders the tree with ANSI colour codes.
    pub fn to_ansi(nodes: &[RenderNode]) -> String {
        Self::render(nodes, true)
    }

    fn render(nodes: &[RenderNode], ansi: bool) -> String {
        let painter = Painter { ansi };
        let mut out = painter.lines(nodes).join("\n");
        out.push('\n');
        out
    }
}

struct Painter {
    ansi: bool,
}

impl Painter {
    fn paint(&self, text: &str, style: &str, bold: bool) -> String {
        if !self.ansi || (style.is_empty() && !bold) {
            return text.to_string();
        }
        let weight = if bold { BOLD } else { "" };
        format!("{weight}{style}{text}{RESET}")
    }

    fn lines(&self, nodes: &[RenderNode]) -> Vec<String> {
        nodes.iter().flat_map(|node| self.node_lines(node)).collect()
    }

    fn indented(&self, nodes: &[RenderNode]) -> Vec<String> {
        self.lines(nodes)
            .into_iter()
            .map(|line| if line.is_empty() { line } else { format!("{INDENT}{line}") })
            .collect()
    }

    fn node_lines(&self, node: &RenderNode) -> Vec<String> {
        match node {
            RenderNode::Panel {
                title,
                subtitle,
                tone,
                children,
            } => {
                let header = match subtitle {
                    Some(sub) => format!("━━ {title} {sub} ━━"),
                    None => format!("━━ {title} ━━"),
                };
                let mut lines = vec![self.paint(&header, tone_style(*tone), true)];
                lines.extend(self.indented(children));
                lines.push(String::new());
                lines
            }
            RenderNode::Block { label, tone, children } => {
                let mut lines = vec![self.paint(&format!("▸ {label}"), tone_style(*tone), true)];
                lines.extend(self.indented(children));
                lines
            }
            RenderNode::Heading { level, text, tone } => {
                let mut lines = vec![self.paint(text, tone_style(*tone), true)];
                if *level == 1 {
                    lines.push(self.paint(&"═".repeat(text.chars().count()), tone_style(*tone), false));
                }
                lines
            }
            RenderNode::Paragraph { text, tone } => text
                .lines()
                .map(|line| self.paint(line, tone_style(*tone), false))
                .collect(),
            RenderNode::CodeBlock { language, code } => {
                let fence = self.paint(&format!("```{language}"), DIM, false);
                let mut lines = vec![fence];
                lines.extend(code.lines().map(str::to_string));
                lines.push(self.paint("```", DIM, false));
                lines
            }
            RenderNode::List { start, items } => {
                let mut lines = Vec::new();
                for (i, item) in items.iter().enumerate() {
                    let marker = match start {
                        Some(first) => format!("{}. ", first + i as u64),
                        None => "• ".to_string(),
                    };
                    let pad = " ".repeat(marker.chars().count());
                    for (j, line) in self.lines(item).into_iter().enumerate() {
                        let prefix = if j == 0 { marker.as_str() } else { pad.as_str() };
                        lines.push(format!("{prefix}{line}"));
                    }
                }
                lines
            }
            RenderNode::Quote { children } => self
                .lines(children)
                .into_iter()
                .map(|line| format!("{} {line}", self.paint("│", DIM, false)))
                .collect(),
            RenderNode::KeyValueTable { rows } => {
                let width = rows.iter().map(|(k, _)| k.chars().count()).max().unwrap_or(0);
                rows.iter()
                    .map(|(key, value)| {
                        let key = self.paint(&format!("{key:<width$}"), CYAN, true);
                        format!("{key}  {value}")
                    })
                    .collect()
            }
            RenderNode::Table { headers, rows } => {
                let widths: Vec<usize> = headers
                    .iter()
                    .enumerate()
                    .map(|(i, header)| {
                        rows.iter()
                            .filter_map(|row| row.get(i))
                            .chain(std::iter::once(header))
                            .map(|cell| cell.chars().count())
                            .max()
                            .unwrap_or(0)
                    })
                    .collect();
                let line = |cells: &[String]| -> String {
                    widths
                        .iter()
                        .enumerate()
                        .map(|(i, width)| {
                            let cell = cells.get(i).map(String::as_str).unwrap_or("");
                            format!("{cell:<width$}")
                        })
                        .collect::<Vec<_>>()
                        .join("  ")
                        .trim_end()
                        .to_string()
                };
                let separator: Vec<String> = widths.iter().map(|w| "─".repeat(*w)).collect();
                let mut lines = vec![
                    self.paint(&line(headers), CYAN, true),
                    self.paint(&separator.join("  "), DIM, false),
                ];
                lines.extend(rows.iter().map(|row| line(row)));
                lines
            }
            RenderNode::Rule => vec![self.paint(&"─".repeat(RULE_WIDTH), DIM, false)],
        }
    }
}

//! Markdown serialisation of output trees.

use super::{Element, Output};

/// Serialise an output tree to Markdown.
pub fn to_markdown(output: &Output) -> String {
    let mut renderer = MarkdownRenderer::new();
    renderer.render_block(output);
    renderer.finish()
}

/// Markdown writer over an output tree.
///
/// Block elements end with a blank line; list nesting is tracked to indent
/// nested list items.
pub struct MarkdownRenderer {
    output: String,
    list_depth: usize,
}

impl MarkdownRenderer {
    /// Create a new Markdown renderer.
    pub fn new() -> Self {
        Self {
            output: String::new(),
            list_depth: 0,
        }
    }

    /// The rendered Markdown, trimmed.
    pub fn finish(self) -> String {
        self.output.trim().to_string()
    }

    /// Render `output` at block level.
    pub fn render_block(&mut self, output: &Output) {
        match output {
            Output::Empty => {}
            Output::Fragment { children } | Output::Container { children, .. } => {
                for child in children {
                    self.render_block(child);
                }
            }
            Output::Element(element) => self.render_element(element),
            Output::Error { node_type, message } => {
                self.output
                    .push_str(&format!("<!-- {}: {} -->\n\n", node_type, message));
            }
            inline => {
                let mut text = String::new();
                render_inline(&mut text, inline);
                if !text.trim().is_empty() {
                    self.output.push_str(&text);
                    self.output.push_str("\n\n");
                }
            }
        }
    }

    fn render_element(&mut self, element: &Element) {
        match element.tag.as_str() {
            "p" => {
                let text = inline_text(&element.children);
                if !text.trim().is_empty() {
                    self.output.push_str(&text);
                    self.output.push_str("\n\n");
                }
            }
            tag @ ("h1" | "h2" | "h3" | "h4" | "h5" | "h6") => {
                let level = tag[1..].parse::<usize>().unwrap_or(1);
                self.output.push_str(&"#".repeat(level));
                self.output.push(' ');
                self.output.push_str(inline_text(&element.children).trim());
                self.output.push_str("\n\n");
            }
            "blockquote" => {
                let body = self.render_nested(&element.children);
                for line in body.lines() {
                    if line.is_empty() {
                        self.output.push_str(">\n");
                    } else {
                        self.output.push_str(&format!("> {}\n", line));
                    }
                }
                self.output.push('\n');
            }
            "hr" => self.output.push_str("---\n\n"),
            "ul" | "ol" => self.render_list(element),
            "table" => self.render_table(element),
            "div" | "li" | "tr" | "td" | "th" => {
                for child in &element.children {
                    self.render_block(child);
                }
            }
            _ => {
                let mut text = String::new();
                render_inline(&mut text, &Output::Element(element.clone()));
                if !text.trim().is_empty() {
                    self.output.push_str(&text);
                    self.output.push_str("\n\n");
                }
            }
        }
    }

    fn render_list(&mut self, list: &Element) {
        let ordered = list.tag == "ol";
        let indent = "  ".repeat(self.list_depth);
        self.list_depth += 1;

        let mut number = 0;
        for item in &list.children {
            let Output::Element(item) = item else {
                continue;
            };
            number += 1;
            let marker = if ordered {
                format!("{}.", number)
            } else {
                "-".to_string()
            };

            let body = self.render_nested(&item.children);
            let mut lines = body.lines().filter(|line| !line.trim().is_empty());
            self.output
                .push_str(&format!("{}{} {}\n", indent, marker, lines.next().unwrap_or("")));
            for line in lines {
                if line.starts_with(' ') || line.starts_with('-') || starts_numbered(line) {
                    self.output.push_str(&format!("{}\n", line));
                } else {
                    self.output.push_str(&format!("{}  {}\n", indent, line));
                }
            }
        }

        self.list_depth -= 1;
        if self.list_depth == 0 {
            self.output.push('\n');
        }
    }

    fn render_table(&mut self, table: &Element) {
        let rows: Vec<Vec<String>> = table
            .children
            .iter()
            .filter_map(|row| match row {
                Output::Element(row) => Some(
                    row.children
                        .iter()
                        .map(|cell| {
                            let mut text = String::new();
                            render_inline(&mut text, cell);
                            text.replace('\n', " ").trim().to_string()
                        })
                        .collect(),
                ),
                _ => None,
            })
            .collect();

        let Some(columns) = rows.iter().map(Vec::len).max().filter(|&n| n > 0) else {
            return;
        };

        for (i, row) in rows.iter().enumerate() {
            self.output.push('|');
            for col in 0..columns {
                let cell = row.get(col).map(String::as_str).unwrap_or("");
                self.output.push_str(&format!(" {} |", cell));
            }
            self.output.push('\n');

            if i == 0 {
                self.output.push('|');
                for _ in 0..columns {
                    self.output.push_str(" --- |");
                }
                self.output.push('\n');
            }
        }
        self.output.push('\n');
    }

    /// Render children at block level into a separate buffer.
    fn render_nested(&mut self, children: &[Output]) -> String {
        let outer = std::mem::take(&mut self.output);
        for child in children {
            self.render_block(child);
        }
        let body = std::mem::replace(&mut self.output, outer);
        body.trim_end().to_string()
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn starts_numbered(line: &str) -> bool {
    let digits = line.chars().take_while(char::is_ascii_digit).count();
    digits > 0 && line[digits..].starts_with(". ")
}

fn inline_text(children: &[Output]) -> String {
    let mut text = String::new();
    for child in children {
        render_inline(&mut text, child);
    }
    text
}

fn render_inline(out: &mut String, output: &Output) {
    match output {
        Output::Empty => {}
        Output::Text { text } => out.push_str(&escape_markdown(text)),
        Output::Break => out.push_str("  \n"),
        Output::Fragment { children } | Output::Container { children, .. } => {
            for child in children {
                render_inline(out, child);
            }
        }
        Output::Link { href, children } => {
            out.push_str(&format!("[{}]({})", inline_text(children), href));
        }
        Output::Error { node_type, .. } => {
            out.push_str(&format!("<!-- {} -->", node_type));
        }
        Output::Element(element) => {
            let inner = inline_text(&element.children);
            match element.tag.as_str() {
                "strong" => out.push_str(&format!("**{}**", inner)),
                "em" => out.push_str(&format!("*{}*", inner)),
                "s" => out.push_str(&format!("~~{}~~", inner)),
                "code" => out.push_str(&format!("`{}`", inner)),
                "u" | "sup" | "sub" => {
                    out.push_str(&format!("<{0}>{1}</{0}>", element.tag, inner))
                }
                "img" => out.push_str(&format!(
                    "![{}]({})",
                    element.attr("alt").unwrap_or(""),
                    element.attr("src").unwrap_or("")
                )),
                _ => out.push_str(&inner),
            }
        }
    }
}

/// Escape special Markdown characters.
/// Only characters that could be misread as inline syntax are escaped.
fn escape_markdown(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' | '`' | '*' | '_' | '[' | ']' | '|' => {
                result.push('\\');
                result.push(c);
            }
            _ => result.push(c),
        }
    }
    result
}

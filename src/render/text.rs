//! Plain text serialisation of output trees.

use super::{Element, Output};

/// Serialise an output tree to plain text.
///
/// Blocks are separated by blank lines, table cells by tabs. Markup, link
/// targets and error markers are dropped.
pub fn to_text(output: &Output) -> String {
    let mut text = String::new();
    write_text(&mut text, output);
    collapse_blank_lines(text.trim())
}

fn write_text(text: &mut String, output: &Output) {
    match output {
        Output::Empty | Output::Error { .. } => {}
        Output::Text { text: value } => text.push_str(value),
        Output::Break => text.push('\n'),
        Output::Fragment { children } | Output::Link { children, .. } => {
            for child in children {
                write_text(text, child);
            }
        }
        Output::Container { children, .. } => {
            for child in children {
                write_text(text, child);
            }
            text.push_str("\n\n");
        }
        Output::Element(element) => write_element(text, element),
    }
}

fn write_element(text: &mut String, element: &Element) {
    if element.tag == "hr" {
        text.push_str("---\n\n");
        return;
    }
    let start = text.len();
    if let Some(alt) = element.attr("alt").filter(|alt| !alt.is_empty()) {
        text.push_str(alt);
    }

    for (i, child) in element.children.iter().enumerate() {
        if i > 0 && element.tag == "tr" {
            text.push('\t');
        }
        write_text(text, child);
    }

    match element.tag.as_str() {
        "li" | "tr" => text.push('\n'),
        "p" | "blockquote" | "table" | "ul" | "ol" => text.push_str("\n\n"),
        tag if tag.len() == 2 && tag.starts_with('h') => text.push_str("\n\n"),
        "td" | "th" => {
            let trimmed = start + text[start..].trim_end_matches('\n').len();
            text.truncate(trimmed);
        }
        _ => {}
    }
}

fn collapse_blank_lines(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut newlines = 0;
    for c in text.chars() {
        if c == '\n' {
            newlines += 1;
            if newlines > 2 {
                continue;
            }
        } else {
            newlines = 0;
        }
        result.push(c);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(text: &str) -> Output {
        Output::container(
            true,
            vec![Element::new("p").with_child(Output::text(text)).into()],
        )
    }

    #[test]
    fn test_blocks_are_separated() {
        let out = Output::fragment(vec![p("one"), p("two"), Output::error("x", "y")]);
        assert_eq!(to_text(&out), "one\n\ntwo");
    }

    #[test]
    fn test_table_cells_use_tabs() {
        let cell = |t: &str| -> Output { Element::new("td").with_child(p(t)).into() };
        let table: Output = Element::new("table")
            .with_child(Element::new("tr").with_children(vec![cell("a"), cell("b")]).into())
            .into();
        assert_eq!(to_text(&table), "a\tb");
    }

    #[test]
    fn test_link_text_only() {
        let out = Output::Link {
            href: "/about".into(),
            children: vec![Output::text("About us")],
        };
        assert_eq!(to_text(&out), "About us");
    }
}

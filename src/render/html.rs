//! HTML serialisation of output trees.

use super::{Element, Output};

/// Class of the grid container element.
pub const CONTAINER_CLASS: &str = "container";

/// Extra class of a container whose gutters are suppressed.
pub const GUTTERLESS_CLASS: &str = "container--gutterless";

const VOID_TAGS: &[&str] = &["br", "hr", "img"];

/// Serialise an output tree to HTML.
pub fn to_html(output: &Output) -> String {
    let mut html = String::new();
    write_output(&mut html, output);
    html
}

fn write_output(html: &mut String, output: &Output) {
    match output {
        Output::Empty => {}
        Output::Text { text } => html.push_str(&escape_html(text)),
        Output::Break => html.push_str("<br>"),
        Output::Fragment { children } => write_children(html, children),
        Output::Container { gutters, children } => {
            if *gutters {
                html.push_str(&format!("<div class=\"{}\">", CONTAINER_CLASS));
            } else {
                html.push_str(&format!(
                    "<div class=\"{} {}\">",
                    CONTAINER_CLASS, GUTTERLESS_CLASS
                ));
            }
            write_children(html, children);
            html.push_str("</div>");
        }
        Output::Element(element) => write_element(html, element),
        Output::Link { href, children } => {
            html.push_str(&format!("<a href=\"{}\">", escape_html(href)));
            write_children(html, children);
            html.push_str("</a>");
        }
        Output::Error { node_type, message } => {
            html.push_str(&format!(
                "<div class=\"render-error\" data-node-type=\"{}\" title=\"{}\"></div>",
                escape_html(node_type),
                escape_html(message)
            ));
        }
    }
}

fn write_children(html: &mut String, children: &[Output]) {
    for child in children {
        write_output(html, child);
    }
}

fn write_element(html: &mut String, element: &Element) {
    html.push('<');
    html.push_str(&element.tag);
    for (name, value) in &element.attributes {
        html.push_str(&format!(" {}=\"{}\"", name, escape_html(value)));
    }
    html.push('>');

    if VOID_TAGS.contains(&element.tag.as_str()) {
        return;
    }
    write_children(html, &element.children);
    html.push_str(&format!("</{}>", element.tag));
}

/// Escape text for use in HTML content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

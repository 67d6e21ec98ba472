use ego_tree::{NodeId, NodeRef};
use scraper::node::Element;
use scraper::{ElementRef, Node};

use super::{Page, serialize};

/// Elements whose contents never render.
const NON_RENDERED: &[&str] = &[
    "head", "title", "meta", "link", "script", "style", "template", "noscript",
];

/// Wrap width for rendered text. Wide enough that mail paragraphs stay on
/// one line.
const RENDER_WIDTH: usize = 1024;

pub(super) fn text_content(page: &Page, node: NodeRef<'_, Node>) -> String {
    let mut out = String::new();
    collect_text(page, node, &mut out);
    out
}

fn collect_text(page: &Page, node: NodeRef<'_, Node>, out: &mut String) {
    if let Some(replacement) = page.replacements.get(&node.id()) {
        out.push_str(&replacement.text_content());
        return;
    }
    match node.value() {
        Node::Text(text) => out.push_str(text),
        Node::Document | Node::Fragment | Node::Element(_) => {
            for child in node.children() {
                collect_text(page, child, out);
            }
        }
        _ => {}
    }
}

/// Rendered text of a node: the recorded replacements applied, hidden
/// subtrees removed, and the rest laid out by html2text.
pub(super) fn rendered_text(page: &Page, id: NodeId) -> String {
    let mut html = serialize::materialize(page, false);
    let Some(node) = html.tree.get(id) else {
        return String::new();
    };
    let hidden: Vec<NodeId> = node
        .descendants()
        .skip(1)
        .filter(|n| n.value().as_element().is_some_and(is_hidden))
        .map(|n| n.id())
        .collect();
    for hidden_id in hidden {
        if let Some(mut hidden_node) = html.tree.get_mut(hidden_id) {
            hidden_node.detach();
        }
    }

    let Some(element) = html.tree.get(id).and_then(ElementRef::wrap) else {
        return String::new();
    };
    let markup = element.html();
    let rendered =
        html2text::config::plain_no_decorate().string_from_read(markup.as_bytes(), RENDER_WIDTH);
    match rendered {
        Ok(text) => tidy(&text),
        Err(e) => {
            tracing::warn!("Could not render text of {}: {}", element.value().name(), e);
            String::new()
        }
    }
}

/// Drop trailing spaces on every line and blank lines at either end.
fn tidy(text: &str) -> String {
    text.lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
        .trim_matches('\n')
        .to_string()
}

/// Whether the element itself is statically hidden.
pub(super) fn is_hidden(element: &Element) -> bool {
    if NON_RENDERED.contains(&element.name()) || element.attr("hidden").is_some() {
        return true;
    }
    if element.name() == "input"
        && element
            .attr("type")
            .is_some_and(|t| t.eq_ignore_ascii_case("hidden"))
    {
        return true;
    }
    element.attr("style").is_some_and(style_hides)
}

fn style_hides(style: &str) -> bool {
    style
        .split(';')
        .filter_map(|decl| decl.split_once(':'))
        .any(|(property, value)| {
            let value = value
                .trim()
                .trim_end_matches("!important")
                .trim()
                .to_ascii_lowercase();
            match property.trim().to_ascii_lowercase().as_str() {
                "display" => value == "none",
                "width" | "height" => is_zero_length(&value),
                _ => false,
            }
        })
}

fn is_zero_length(value: &str) -> bool {
    value
        .trim_end_matches(|c: char| c.is_ascii_alphabetic() || c == '%')
        .parse::<f64>()
        .is_ok_and(|n| n == 0.0)
}

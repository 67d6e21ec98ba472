use ego_tree::{NodeId, NodeMut};
use html5ever::tendril::StrTendril;
use html5ever::{Attribute, LocalName, Namespace, QualName};
use scraper::node::{Doctype, Element, Text};
use scraper::{ElementRef, Html, Node};

use super::{Overlay, Page, Replacement};

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

const OVERLAY_STYLE: &str = "position: fixed; bottom: 20px; right: 20px; z-index: 9999; \
     max-width: 420px; max-height: 50vh; overflow: auto; white-space: pre-wrap;";

/// Copy of the parsed document with every recorded replacement applied,
/// and the overlay mounted at the end of `<body>` when `with_overlay` is set.
pub(super) fn materialize(page: &Page, with_overlay: bool) -> Html {
    let mut html = page.html.clone();
    for (&id, replacement) in &page.replacements {
        if let Some(node) = html.tree.get_mut(id) {
            apply(node, replacement);
        }
    }
    if with_overlay && let Some(overlay) = &page.overlay {
        mount(&mut html, overlay);
    }
    html
}

pub(super) fn to_html(page: &Page) -> String {
    let html = materialize(page, true);
    let out = html.html();

    // html5ever writes the doctype name only.
    match html.tree.root().children().find_map(|n| n.value().as_doctype()) {
        Some(doctype) if !doctype.public_id().is_empty() || !doctype.system_id().is_empty() => {
            out.replacen(
                &format!("<!DOCTYPE {}>", doctype.name()),
                &doctype_markup(doctype),
                1,
            )
        }
        _ => out,
    }
}

fn apply(mut node: NodeMut<'_, Node>, replacement: &Replacement) {
    // An <input> keeps its value in an attribute.
    if let (Replacement::Value(value), Node::Element(element)) = (replacement, node.value())
        && element.name() == "input"
    {
        element
            .attrs
            .insert(attr_name("value"), StrTendril::from_slice(value));
        return;
    }

    while let Some(mut child) = node.first_child() {
        child.detach();
    }
    match replacement {
        Replacement::Lines(lines) => {
            for (i, line) in lines.iter().enumerate() {
                if i > 0 {
                    node.append(element("br", &[]));
                }
                if !line.is_empty() {
                    node.append(text(line));
                }
            }
        }
        Replacement::Value(value) => {
            node.append(text(value));
        }
    }
}

fn mount(html: &mut Html, overlay: &Overlay) {
    let parent = body_or_root(html);
    let Some(mut parent) = html.tree.get_mut(parent) else {
        return;
    };

    let mut panel = parent.append(element(
        "div",
        &[
            ("id", &overlay.element_id),
            ("class", "myga-summary-box"),
            ("role", "dialog"),
            ("style", OVERLAY_STYLE),
        ],
    ));
    panel
        .append(element("div", &[("class", "myga-summary-title")]))
        .append(text(&overlay.title));
    panel
        .append(element("div", &[("class", "myga-summary-content")]))
        .append(text(&overlay.body));
    panel
        .append(element(
            "button",
            &[("type", "button"), ("data-myga-action", "close-summary")],
        ))
        .append(text("Close"));
}

fn element(name: &str, attrs: &[(&str, &str)]) -> Node {
    let name = QualName::new(None, Namespace::from(HTML_NAMESPACE), LocalName::from(name));
    let attrs = attrs
        .iter()
        .map(|&(name, value)| Attribute {
            name: attr_name(name),
            value: StrTendril::from_slice(value),
        })
        .collect();
    Node::Element(Element::new(name, attrs))
}

fn attr_name(name: &str) -> QualName {
    QualName::new(None, Namespace::from(""), LocalName::from(name))
}

fn text(content: &str) -> Node {
    Node::Text(Text {
        text: StrTendril::from_slice(content),
    })
}

fn doctype_markup(doctype: &Doctype) -> String {
    match (doctype.public_id(), doctype.system_id()) {
        ("", "") => format!("<!DOCTYPE {}>", doctype.name()),
        ("", system) => format!(r#"<!DOCTYPE {} SYSTEM "{}">"#, doctype.name(), system),
        (public, "") => format!(r#"<!DOCTYPE {} PUBLIC "{}">"#, doctype.name(), public),
        (public, system) => format!(
            r#"<!DOCTYPE {} PUBLIC "{}" "{}">"#,
            doctype.name(),
            public,
            system
        ),
    }
}

fn body_or_root(html: &Html) -> NodeId {
    let root = html.root_element();
    root.children()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "body")
        .unwrap_or(root)
        .id()
}

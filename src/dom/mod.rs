//! In-memory model of the webmail page, built from an HTML snapshot.
//!
//! The parsed tree is never rewritten. Content replacements, dispatched
//! events and the overlay are recorded next to it; every read and the
//! serializer see them, so the page behaves as if it had been mutated.

mod serialize;
mod text;

use std::collections::HashMap;

use ego_tree::NodeId;
use scraper::{ElementRef, Html, Selector};

/// Handle to an element of a [`Page`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(NodeId);

/// New content written into an element, replacing its children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Replacement {
    /// Rich text, one entry per line. Lines are separated by `<br>`.
    Lines(Vec<String>),
    /// Value of a form field (`textarea`, `input`).
    Value(String),
}

impl Replacement {
    /// Split text into lines, accepting both `\n` and `\r\n`.
    pub fn lines(text: &str) -> Self {
        Replacement::Lines(
            text.split('\n')
                .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
                .collect(),
        )
    }

    /// Equivalent of `textContent`: `<br>` contributes nothing.
    fn text_content(&self) -> String {
        match self {
            Replacement::Lines(lines) => lines.concat(),
            Replacement::Value(value) => value.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Input,
    Change,
    KeyDown,
}

impl EventKind {
    pub fn name(&self) -> &'static str {
        match self {
            EventKind::Input => "input",
            EventKind::Change => "change",
            EventKind::KeyDown => "keydown",
        }
    }
}

/// A synthetic event fired at an element, as the host page's listeners would see it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchedEvent {
    pub target: ElementId,
    pub kind: EventKind,
    pub bubbles: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OverlayId(u64);

/// Floating panel attached to the end of `<body>`, outside the page layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overlay {
    pub id: OverlayId,
    pub element_id: String,
    pub title: String,
    pub body: String,
}

pub struct Page {
    html: Html,
    replacements: HashMap<NodeId, Replacement>,
    events: Vec<DispatchedEvent>,
    overlay: Option<Overlay>,
    next_overlay: u64,
}

impl Page {
    pub fn parse(html: &str) -> Self {
        Self {
            html: Html::parse_document(html),
            replacements: HashMap::new(),
            events: Vec::new(),
            overlay: None,
            next_overlay: 0,
        }
    }

    /// All elements matching `selector`, in document order.
    ///
    /// An invalid selector matches nothing. Elements whose ancestor content
    /// has been replaced are no longer part of the page and are skipped.
    pub fn select_all(&self, selector: &str) -> Vec<ElementId> {
        let Some(selector) = parse_selector(selector) else {
            return Vec::new();
        };
        self.html
            .select(&selector)
            .map(|el| ElementId(el.id()))
            .filter(|id| !self.is_detached(*id))
            .collect()
    }

    pub fn select_first(&self, selector: &str) -> Option<ElementId> {
        self.select_all(selector).into_iter().next()
    }

    /// First descendant of `scope` matching `selector`.
    pub fn select_within(&self, scope: ElementId, selector: &str) -> Option<ElementId> {
        let selector = parse_selector(selector)?;
        let scope = self.element(scope)?;
        scope
            .select(&selector)
            .map(|el| ElementId(el.id()))
            .find(|id| !self.is_detached(*id))
    }

    pub fn tag_name(&self, id: ElementId) -> Option<&str> {
        self.element(id).map(|el| el.value().name())
    }

    pub fn attr(&self, id: ElementId, name: &str) -> Option<&str> {
        self.element(id).and_then(|el| el.value().attr(name))
    }

    /// Concatenated text of all descendant text nodes, like `textContent`.
    pub fn text_content(&self, id: ElementId) -> String {
        self.html
            .tree
            .get(id.0)
            .map(|node| text::text_content(self, node))
            .unwrap_or_default()
    }

    /// Rendered text, like `innerText`: hidden subtrees are skipped,
    /// whitespace is collapsed and block boundaries become line breaks.
    pub fn inner_text(&self, id: ElementId) -> String {
        text::rendered_text(self, id.0)
    }

    /// Whether the element would get a non-zero rendered size.
    ///
    /// A snapshot has no layout, so this checks what hides an element
    /// statically: non-rendered containers, the `hidden` attribute and
    /// inline `display: none` or zero width/height, on the element or
    /// any ancestor.
    pub fn is_visible(&self, id: ElementId) -> bool {
        if self.is_detached(id) {
            return false;
        }
        let Some(node) = self.html.tree.get(id.0) else {
            return false;
        };
        std::iter::once(node)
            .chain(node.ancestors())
            .filter_map(|n| n.value().as_element())
            .all(|el| !text::is_hidden(el))
    }

    /// Resolves the inherited `contenteditable` state.
    pub fn is_content_editable(&self, id: ElementId) -> bool {
        let Some(node) = self.html.tree.get(id.0) else {
            return false;
        };
        for node in std::iter::once(node).chain(node.ancestors()) {
            let Some(element) = node.value().as_element() else {
                continue;
            };
            match element
                .attr("contenteditable")
                .map(|v| v.trim().to_ascii_lowercase())
            {
                Some(v) if v == "false" => return false,
                Some(v) if v.is_empty() || v == "true" || v == "plaintext-only" => return true,
                _ => {}
            }
        }
        false
    }

    pub fn is_form_field(&self, id: ElementId) -> bool {
        matches!(self.tag_name(id), Some("textarea") | Some("input"))
    }

    /// Replace the children of an element. A later replacement overwrites
    /// an earlier one.
    pub fn replace_content(&mut self, id: ElementId, replacement: Replacement) {
        self.replacements.insert(id.0, replacement);
    }

    pub fn content(&self, id: ElementId) -> Option<&Replacement> {
        self.replacements.get(&id.0)
    }

    pub fn dispatch_event(&mut self, target: ElementId, kind: EventKind) {
        tracing::trace!("dispatch {} on {:?}", kind.name(), target);
        self.events.push(DispatchedEvent {
            target,
            kind,
            bubbles: true,
        });
    }

    pub fn events(&self) -> &[DispatchedEvent] {
        &self.events
    }

    /// Mount an overlay, replacing the one currently shown.
    pub fn mount_overlay(&mut self, element_id: &str, title: &str, body: &str) -> OverlayId {
        self.next_overlay += 1;
        let id = OverlayId(self.next_overlay);
        if let Some(old) = self.overlay.replace(Overlay {
            id,
            element_id: element_id.to_string(),
            title: title.to_string(),
            body: body.to_string(),
        }) {
            tracing::debug!("Replaced overlay {:?}", old.id);
        }
        id
    }

    /// Remove the overlay if `id` is still the mounted one.
    pub fn remove_overlay(&mut self, id: OverlayId) -> bool {
        if self.overlay.as_ref().is_some_and(|o| o.id == id) {
            self.overlay = None;
            true
        } else {
            false
        }
    }

    pub fn overlay(&self) -> Option<&Overlay> {
        self.overlay.as_ref()
    }

    /// Serialize the page with all recorded changes applied.
    pub fn to_html(&self) -> String {
        serialize::to_html(self)
    }

    /// Short description of an element for diagnostics.
    pub fn describe(&self, id: ElementId) -> String {
        let Some(el) = self.element(id) else {
            return "<detached>".to_string();
        };
        let el = el.value();
        format!(
            "<{} class={:?} role={:?}> visible={} editable={}",
            el.name(),
            el.attr("class").unwrap_or_default(),
            el.attr("role").unwrap_or_default(),
            self.is_visible(id),
            self.is_content_editable(id),
        )
    }

    fn element(&self, id: ElementId) -> Option<ElementRef<'_>> {
        self.html.tree.get(id.0).and_then(ElementRef::wrap)
    }

    /// True when an ancestor's content has been replaced.
    fn is_detached(&self, id: ElementId) -> bool {
        if self.replacements.is_empty() {
            return false;
        }
        self.html
            .tree
            .get(id.0)
            .is_some_and(|node| node.ancestors().any(|a| self.replacements.contains_key(&a.id())))
    }
}

fn parse_selector(selector: &str) -> Option<Selector> {
    match Selector::parse(selector) {
        Ok(selector) => Some(selector),
        Err(e) => {
            tracing::warn!("Invalid selector {:?}: {:?}", selector, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<!DOCTYPE html>
        <html><head><title>Inbox</title></head><body>
        <div id="a" class="box">First</div>
        <div id="b" class="box" hidden>Second</div>
        <div style="display: none"><span id="c" class="box">Third</span></div>
        <div id="d" class="box" style="width:0px">Fourth</div>
        <div contenteditable="true"><p id="e">Editable child</p></div>
        <div contenteditable="true"><p id="f" contenteditable="false">Locked</p></div>
        </body></html>"#;

    fn id(page: &Page, selector: &str) -> ElementId {
        page.select_first(selector).unwrap()
    }

    #[test]
    fn test_select_all_in_document_order() {
        let page = Page::parse(PAGE);
        let ids: Vec<_> = page
            .select_all(".box")
            .into_iter()
            .map(|el| page.attr(el, "id").unwrap().to_string())
            .collect();
        assert_eq!(ids, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_invalid_selector_matches_nothing() {
        let page = Page::parse(PAGE);
        assert!(page.select_all("[[").is_empty());
    }

    #[test]
    fn test_visibility_rules() {
        let page = Page::parse(PAGE);
        assert!(page.is_visible(id(&page, "#a")));
        assert!(!page.is_visible(id(&page, "#b")));
        assert!(!page.is_visible(id(&page, "#c")));
        assert!(!page.is_visible(id(&page, "#d")));
        assert!(!page.is_visible(id(&page, "title")));
    }

    #[test]
    fn test_content_editable_is_inherited() {
        let page = Page::parse(PAGE);
        assert!(page.is_content_editable(id(&page, "#e")));
        assert!(!page.is_content_editable(id(&page, "#f")));
        assert!(!page.is_content_editable(id(&page, "#a")));
    }

    #[test]
    fn test_replacement_hides_old_children() {
        let mut page = Page::parse(r#"<div id="box"><span class="old">old text</span></div>"#);
        let target = id(&page, "#box");
        page.replace_content(target, Replacement::lines("new\ntext"));

        assert!(page.select_all(".old").is_empty());
        assert_eq!(page.text_content(target), "newtext");
        assert_eq!(page.inner_text(target), "new\ntext");
        assert!(page.to_html().contains(r#"<div id="box">new<br>text</div>"#));
    }

    #[test]
    fn test_overlay_replace_and_remove() {
        let mut page = Page::parse("<html><body><p>Hi</p></body></html>");
        let first = page.mount_overlay("box", "Title", "one");
        let second = page.mount_overlay("box", "Title", "two");

        assert_eq!(page.overlay().unwrap().body, "two");
        assert!(!page.remove_overlay(first));
        assert!(page.to_html().contains("two</div>"));
        assert!(page.remove_overlay(second));
        assert!(page.overlay().is_none());
        assert!(!page.to_html().contains("box"));
    }

    #[test]
    fn test_events_are_recorded_in_order() {
        let mut page = Page::parse(PAGE);
        let target = id(&page, "#a");
        page.dispatch_event(target, EventKind::Input);
        page.dispatch_event(target, EventKind::Change);

        let kinds: Vec<_> = page.events().iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![EventKind::Input, EventKind::Change]);
        assert!(page.events().iter().all(|e| e.bubbles && e.target == target));
    }
}

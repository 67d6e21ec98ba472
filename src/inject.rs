//! Writes generated text into the open compose box

use crate::constants::COMPOSE_SELECTORS;
use crate::dom::{ElementId, EventKind, Page, Replacement};

/// Replace the content of the visible compose region with `text`.
///
/// Returns `false` when no visible compose region exists; the caller is
/// expected to present the text some other way.
pub fn inject(page: &mut Page, text: &str) -> bool {
    let Some((target, selector)) = find_compose_region(page) else {
        tracing::warn!("Could not find any compose area element");
        for candidate in page.select_all(r#"[contenteditable="true"]"#) {
            tracing::debug!("  candidate: {}", page.describe(candidate));
        }
        return false;
    };
    tracing::debug!("Found compose area using selector {}", selector);

    let replacement = if page.is_form_field(target) {
        Replacement::Value(text.to_string())
    } else {
        Replacement::lines(text)
    };
    page.replace_content(target, replacement);

    // Gmail only picks up the draft once its own listeners have fired.
    page.dispatch_event(target, EventKind::Input);
    page.dispatch_event(target, EventKind::Change);
    if page.is_content_editable(target) {
        page.dispatch_event(target, EventKind::KeyDown);
    }

    tracing::info!("Reply inserted into compose area ({} chars)", text.chars().count());
    true
}

/// The compose region to write into, with the selector that found it.
///
/// Selectors are tried in priority order; within the first selector that has
/// any visible match, the last visible match wins since Gmail appends the
/// active compose box after older ones.
pub fn find_compose_region(page: &Page) -> Option<(ElementId, &'static str)> {
    COMPOSE_SELECTORS.iter().find_map(|&selector| {
        let matches = page.select_all(selector);
        tracing::trace!("Selector {:?} found {} element(s)", selector, matches.len());
        matches
            .into_iter()
            .rev()
            .find(|&el| page.is_visible(el))
            .map(|el| (el, selector))
    })
}

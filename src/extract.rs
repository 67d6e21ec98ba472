//! Email and thread extraction from the mail view
//!
//! Gmail owns every marker used here and changes them without notice, so
//! nothing in this module fails loudly: a missing marker degrades to `None`
//! or an empty string.

use crate::constants::{
    MAIN_REGION_SELECTOR, MESSAGE_BODY_SELECTORS, RECIPIENT_SELECTOR, SENDER_SELECTOR,
    SUBJECT_HEADING_SELECTOR, SUBJECT_SELECTOR, THREAD_BODY_SELECTOR,
};
use crate::dom::{ElementId, Page};
use crate::mail::EmailPayload;

/// Extract the open email, with content truncated to `max_chars` characters.
///
/// Returns `None` when there is no main region or when the subject or the
/// content is empty after trimming.
pub fn extract_email(page: &Page, max_chars: usize) -> Option<EmailPayload> {
    let Some(main) = page.select_first(MAIN_REGION_SELECTOR) else {
        tracing::warn!("Could not find email body in page");
        return None;
    };

    let subject = subject_in(page, main);
    let content = message_body_in(page, main);

    let subject = subject.trim().to_string();
    let content = truncate_chars(content.trim(), max_chars).to_string();

    if subject.is_empty() || content.is_empty() {
        tracing::warn!(
            "Subject or content is empty. Subject: {:?}, content length: {}",
            subject,
            content.chars().count()
        );
        return None;
    }

    Some(EmailPayload {
        subject,
        content,
        from_address: address_in(page, main, SENDER_SELECTOR),
        to_address: address_in(page, main, RECIPIENT_SELECTOR),
    })
}

/// Text of every message body in the thread, in page order, separated by
/// blank lines. Empty when the page shows no message bodies.
pub fn extract_thread_text(page: &Page) -> String {
    page.select_all(THREAD_BODY_SELECTOR)
        .into_iter()
        .map(|body| page.inner_text(body).trim().to_string())
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
        .trim()
        .to_string()
}

/// Subject of the open thread, if the page shows one.
pub fn extract_thread_subject(page: &Page) -> Option<String> {
    let main = page.select_first(MAIN_REGION_SELECTOR)?;
    let subject = subject_in(page, main);
    let subject = subject.trim();
    (!subject.is_empty()).then(|| subject.to_string())
}

fn subject_in(page: &Page, main: ElementId) -> String {
    if let Some(el) = page.select_within(main, SUBJECT_SELECTOR) {
        return match page.attr(el, "data-subject") {
            Some(subject) if !subject.is_empty() => subject.to_string(),
            _ => page.text_content(el),
        };
    }
    page.select_within(main, SUBJECT_HEADING_SELECTOR)
        .map(|heading| page.text_content(heading))
        .unwrap_or_default()
}

fn message_body_in(page: &Page, main: ElementId) -> String {
    MESSAGE_BODY_SELECTORS
        .iter()
        .find_map(|selector| page.select_within(main, selector))
        .map(|body| page.text_content(body))
        .unwrap_or_else(|| page.inner_text(main))
}

fn address_in(page: &Page, main: ElementId, selector: &str) -> String {
    page.select_within(main, selector)
        .and_then(|el| page.attr(el, "email"))
        .map(|addr| addr.trim().to_string())
        .unwrap_or_default()
}

/// Longest prefix of `s` with at most `max_chars` characters.
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

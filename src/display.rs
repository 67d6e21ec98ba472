//! Floating panel for thread summaries

use crate::constants::{SUMMARY_BOX_ID, SUMMARY_TITLE};
use crate::dom::{OverlayId, Page};

/// Show `text` in the summary panel, replacing any panel already open.
pub fn show_summary(page: &mut Page, text: &str) -> OverlayId {
    page.mount_overlay(SUMMARY_BOX_ID, SUMMARY_TITLE, text)
}

/// Close the panel. A stale id, from a panel since replaced, does nothing.
pub fn dismiss(page: &mut Page, id: OverlayId) -> bool {
    page.remove_overlay(id)
}

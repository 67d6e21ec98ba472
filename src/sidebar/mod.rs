//! Sidebar controller: the two user actions and the state they report into
//!
//! Every failure along the pipeline ends here as a status message. Nothing
//! is retried; the user can simply click again.

mod state;

pub use state::{SidebarState, StatusLevel, StatusMessage};

use crate::backend::backend_host;
use crate::config::Config;
use crate::display::{dismiss, show_summary};
use crate::dom::{OverlayId, Page};
use crate::extract::{extract_email, extract_thread_subject, extract_thread_text};
use crate::inject::inject;
use crate::mail::{SummaryStyle, Tone};
use crate::nav::PageContext;
use crate::relay::{RelayClient, RelayError};

const THREAD_ONLY: &str = "Open an email thread to use reply and summary tools.";
const EXTRACTING: &str = "Extracting email content...";
const EXTRACTION_FAILED: &str =
    "Could not extract email content. Please make sure you're viewing an email.";
const CALLING_API: &str = "Calling AI API...";
const INJECTING: &str = "Injecting reply into compose box...";
const REPLY_INJECTED: &str = "Reply generated successfully! Check your compose box.";
const REPLY_NOT_INJECTED: &str = "Reply generated but couldn't auto-inject. \
     Make sure reply compose box is open, or copy it from the log.";
const COLLECTING_THREAD: &str = "Collecting thread content...";
const EMPTY_THREAD: &str = "No email content found in this thread.";
const SUMMARIZING: &str = "Summarizing thread...";
const SUMMARY_SHOWN: &str = "Summary generated successfully!";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyOutcome {
    /// The reply was written into the compose box.
    Injected(String),
    /// The reply was generated but there was no compose box to put it in.
    NotInjected(String),
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryOutcome {
    Shown { overlay: OverlayId, summary: String },
    Failed,
}

pub struct Sidebar {
    state: SidebarState,
    relay: RelayClient,
    max_content_chars: usize,
    backend_host: String,
}

impl Sidebar {
    pub fn new(relay: RelayClient, config: &Config, context: PageContext) -> Self {
        Self {
            state: SidebarState::new(context, config.ui.default_tone, config.ui.default_style),
            relay,
            max_content_chars: config.extraction.max_content_chars,
            backend_host: backend_host(&config.backend.base_url).to_string(),
        }
    }

    pub fn state(&self) -> &SidebarState {
        &self.state
    }

    /// Rebuild for a new location. Selections survive; status does not.
    pub fn mount(&mut self, url: &str) {
        let context = PageContext::detect(url);
        tracing::debug!("Mounting sidebar for {:?} at {}", context, url);
        self.state.context = context;
        self.state.visible = false;
        self.state.generating = false;
        self.state.summarizing = false;
        self.state.clear_status();
    }

    pub fn toggle(&mut self) {
        self.state.visible = !self.state.visible;
    }

    pub fn show(&mut self) {
        self.state.visible = true;
    }

    pub fn hide(&mut self) {
        self.state.visible = false;
    }

    pub fn select_tone(&mut self, tone: Tone) {
        self.state.tone = tone;
    }

    pub fn select_style(&mut self, style: SummaryStyle) {
        self.state.style = style;
    }

    /// Extract the open email, have the backend draft a reply, and put it
    /// in the compose box.
    pub async fn generate_reply(&mut self, page: &mut Page) -> ReplyOutcome {
        if !self.require_thread() {
            return ReplyOutcome::Failed;
        }
        self.state.generating = true;
        let outcome = self.run_generate_reply(page).await;
        self.state.generating = false;
        outcome
    }

    async fn run_generate_reply(&mut self, page: &mut Page) -> ReplyOutcome {
        let tone = self.state.tone;
        self.state.set_status(EXTRACTING, StatusLevel::Info);

        let Some(payload) = extract_email(page, self.max_content_chars) else {
            self.state.set_status(EXTRACTION_FAILED, StatusLevel::Error);
            return ReplyOutcome::Failed;
        };
        tracing::debug!(
            "Email data extracted: subject {} chars, content {} chars",
            payload.subject.chars().count(),
            payload.content.chars().count()
        );

        self.state.set_status(CALLING_API, StatusLevel::Info);
        let reply = match self.relay.generate_reply(payload, tone).await {
            Ok(reply) => reply,
            Err(e) => {
                self.report_error(&e);
                return ReplyOutcome::Failed;
            }
        };

        self.state.set_status(INJECTING, StatusLevel::Info);
        if inject(page, &reply) {
            self.state.set_status(REPLY_INJECTED, StatusLevel::Success);
            ReplyOutcome::Injected(reply)
        } else {
            self.state.set_status(REPLY_NOT_INJECTED, StatusLevel::Warning);
            tracing::info!("=== GENERATED REPLY ===\n{}\n=== END REPLY ===", reply);
            ReplyOutcome::NotInjected(reply)
        }
    }

    /// Summarize every message in the open thread and show the result in
    /// the summary panel.
    pub async fn summarize_thread(&mut self, page: &mut Page) -> SummaryOutcome {
        if !self.require_thread() {
            return SummaryOutcome::Failed;
        }
        self.state.summarizing = true;
        let outcome = self.run_summarize_thread(page).await;
        self.state.summarizing = false;
        outcome
    }

    async fn run_summarize_thread(&mut self, page: &mut Page) -> SummaryOutcome {
        self.state.set_status(COLLECTING_THREAD, StatusLevel::Info);

        let text = extract_thread_text(page);
        if text.is_empty() {
            self.state.set_status(EMPTY_THREAD, StatusLevel::Error);
            return SummaryOutcome::Failed;
        }
        let subject = extract_thread_subject(page);

        self.state.set_status(SUMMARIZING, StatusLevel::Info);
        match self.relay.summarize(text, self.state.style, subject).await {
            Ok(summary) => {
                let overlay = show_summary(page, &summary);
                self.state.summary_overlay = Some(overlay);
                self.state.set_status(SUMMARY_SHOWN, StatusLevel::Success);
                SummaryOutcome::Shown { overlay, summary }
            }
            Err(e) => {
                self.report_error(&e);
                SummaryOutcome::Failed
            }
        }
    }

    /// Close the summary panel this sidebar opened.
    pub fn dismiss_summary(&mut self, page: &mut Page) -> bool {
        self.state
            .summary_overlay
            .take()
            .is_some_and(|id| dismiss(page, id))
    }

    fn require_thread(&mut self) -> bool {
        if self.state.context.has_thread_tools() {
            return true;
        }
        self.state.set_status(THREAD_ONLY, StatusLevel::Error);
        false
    }

    fn report_error(&mut self, error: &RelayError) {
        let message = error.to_string();
        let message = if message.starts_with("Failed to connect") {
            format!(
                "Backend server is not running. Please start the backend at {}",
                self.backend_host
            )
        } else {
            message
        };
        self.state
            .set_status(format!("Error: {}", message), StatusLevel::Error);
    }
}

//! Application-wide constants for page markers and backend defaults
//!
//! Gmail owns the page markup, so every marker we depend on lives here where
//! it is easy to find when the markup shifts.

/// Default base URL of the reply/summary backend.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api/v1/agent";

/// Maximum number of characters of email content sent to the backend.
/// Keeps prompts within the backend model's token budget.
pub const MAX_CONTENT_CHARS: usize = 2000;

/// Subject used for thread summaries when the page has no subject marker.
pub const DEFAULT_THREAD_SUBJECT: &str = "Thread Summary";

/// Capacity of the page-to-relay request channel.
pub const RELAY_CHANNEL_CAPACITY: usize = 16;

// === Extraction markers ===

/// Main content region of the mail view.
pub const MAIN_REGION_SELECTOR: &str = r#"[role="main"]"#;

/// Element carrying the subject in a `data-subject` attribute.
pub const SUBJECT_SELECTOR: &str = "[data-subject]";

/// Heading fallback for the subject.
pub const SUBJECT_HEADING_SELECTOR: &str = "h2";

/// Per-message content containers, in order of preference.
pub const MESSAGE_BODY_SELECTORS: &[&str] = &["[data-message-id]", ".aO.T-I-J3"];

/// Message body containers of every message in an open thread.
pub const THREAD_BODY_SELECTOR: &str = ".a3s";

/// Sender node; the address is in its `email` attribute.
pub const SENDER_SELECTOR: &str = ".gD[email]";

/// Recipient node; the address is in its `email` attribute.
pub const RECIPIENT_SELECTOR: &str = ".g2[email]";

// === Injection markers ===

/// Compose region candidates, highest priority first.
pub const COMPOSE_SELECTORS: &[&str] = &[
    r#"[aria-label="Message Body"]"#,
    r#"[role="textbox"]"#,
    r#"[contenteditable="true"]"#,
    ".editable",
    r#"[data-tooltip="Message Body"]"#,
];

// === Display ===

/// Element id of the summary overlay.
pub const SUMMARY_BOX_ID: &str = "summary-output-box";

/// Title shown at the top of the summary overlay.
pub const SUMMARY_TITLE: &str = "Thread summary";

/// Host suffix of the webmail UI we attach to.
pub const MAIL_HOST: &str = "mail.google.com";

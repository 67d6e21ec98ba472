use crate::dom::OverlayId;
use crate::mail::{SummaryStyle, Tone};
use crate::nav::PageContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Message shown at the top of the sidebar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub level: StatusLevel,
}

/// Everything the sidebar shows, owned by the controller.
#[derive(Debug, Clone)]
pub struct SidebarState {
    pub visible: bool,
    pub context: PageContext,
    pub tone: Tone,
    pub style: SummaryStyle,
    pub status: Option<StatusMessage>,
    /// A reply is being generated; the generate button is disabled.
    pub generating: bool,
    pub summarizing: bool,
    /// Summary panel this sidebar opened, if still shown
    pub summary_overlay: Option<OverlayId>,
}

impl SidebarState {
    pub fn new(context: PageContext, tone: Tone, style: SummaryStyle) -> Self {
        Self {
            visible: false,
            context,
            tone,
            style,
            status: None,
            generating: false,
            summarizing: false,
            summary_overlay: None,
        }
    }

    pub fn set_status(&mut self, text: impl Into<String>, level: StatusLevel) {
        let text = text.into();
        match level {
            StatusLevel::Info | StatusLevel::Success => tracing::info!("{}", text),
            StatusLevel::Warning => tracing::warn!("{}", text),
            StatusLevel::Error => tracing::error!("{}", text),
        }
        self.status = Some(StatusMessage { text, level });
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }

    pub fn generate_label(&self) -> &'static str {
        if self.generating {
            "Generating..."
        } else {
            "Generate reply"
        }
    }
}

//! Messages exchanged between the page side and the privileged relay

use serde::{Deserialize, Serialize};

use crate::mail::{EmailPayload, SummaryStyle, Tone};

const UNKNOWN_ERROR: &str = "Unknown error from background script.";

/// A request from the page side. Serialized with an `action` tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum RelayRequest {
    #[serde(rename = "generateReply")]
    GenerateReply {
        #[serde(rename = "emailData")]
        payload: EmailPayload,
        #[serde(default)]
        tone: Tone,
    },
    #[serde(rename = "summarizeEmail")]
    SummarizeThread {
        #[serde(rename = "emailContent")]
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        style: Option<SummaryStyle>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        subject: Option<String>,
    },
}

impl RelayRequest {
    pub fn action(&self) -> &'static str {
        match self {
            RelayRequest::GenerateReply { .. } => "generateReply",
            RelayRequest::SummarizeThread { .. } => "summarizeEmail",
        }
    }
}

/// The single response to a [`RelayRequest`].
///
/// On the wire: `{"success":true,"reply":...}`, `{"success":true,"summary":...}`
/// or `{"success":false,"error":...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "WireResponse", try_from = "WireResponse")]
pub enum RelayResponse {
    Reply(String),
    Summary(String),
    Failure(String),
}

impl RelayResponse {
    pub fn into_result(self) -> Result<String, RelayError> {
        match self {
            RelayResponse::Reply(text) | RelayResponse::Summary(text) => Ok(text),
            RelayResponse::Failure(error) if error.is_empty() => {
                Err(RelayError::Failed(UNKNOWN_ERROR.to_string()))
            }
            RelayResponse::Failure(error) => Err(RelayError::Failed(error)),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct WireResponse {
    success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    reply: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl From<RelayResponse> for WireResponse {
    fn from(response: RelayResponse) -> Self {
        let mut wire = WireResponse {
            success: !matches!(response, RelayResponse::Failure(_)),
            reply: None,
            summary: None,
            error: None,
        };
        match response {
            RelayResponse::Reply(text) => wire.reply = Some(text),
            RelayResponse::Summary(text) => wire.summary = Some(text),
            RelayResponse::Failure(error) => wire.error = Some(error),
        }
        wire
    }
}

impl TryFrom<WireResponse> for RelayResponse {
    type Error = String;

    fn try_from(wire: WireResponse) -> Result<Self, Self::Error> {
        if !wire.success {
            return Ok(RelayResponse::Failure(wire.error.unwrap_or_default()));
        }
        match (wire.reply, wire.summary) {
            (Some(reply), _) => Ok(RelayResponse::Reply(reply)),
            (None, Some(summary)) => Ok(RelayResponse::Summary(summary)),
            (None, None) => Err("successful relay response without reply or summary".to_string()),
        }
    }
}

/// Why a relay round trip produced no text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RelayError {
    #[error("Background relay is not available. Extension may not be properly initialized.")]
    Unavailable,
    #[error("No response from background script.")]
    NoResponse,
    #[error("{0}")]
    Failed(String),
}

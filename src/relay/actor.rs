//! Relay actor: performs backend calls on behalf of the page side

use tokio::sync::{mpsc, oneshot};

use super::protocol::{RelayError, RelayRequest, RelayResponse};
use crate::backend::BackendClient;
use crate::constants::DEFAULT_THREAD_SUBJECT;
use crate::mail::{EmailPayload, SummaryStyle, Tone};

/// A request together with the channel its single response goes back on.
#[derive(Debug)]
pub struct Envelope {
    pub request: RelayRequest,
    pub reply_tx: oneshot::Sender<RelayResponse>,
}

/// Page-side handle for sending requests to the relay.
#[derive(Clone)]
pub struct RelayClient {
    request_tx: mpsc::Sender<Envelope>,
}

/// Spawn the relay task.
///
/// The task lives until every [`RelayClient`] clone has been dropped. Each
/// request runs in its own task, so a slow call does not hold up the next.
pub fn spawn_relay(backend: BackendClient, capacity: usize) -> RelayClient {
    let (request_tx, request_rx) = mpsc::channel(capacity);
    tokio::spawn(relay_loop(backend, request_rx));
    RelayClient { request_tx }
}

async fn relay_loop(backend: BackendClient, mut request_rx: mpsc::Receiver<Envelope>) {
    while let Some(Envelope { request, reply_tx }) = request_rx.recv().await {
        tracing::info!("Relay received message: {}", request.action());
        let backend = backend.clone();
        tokio::spawn(async move {
            let response = dispatch(&backend, request).await;
            if reply_tx.send(response).is_err() {
                tracing::warn!("Relay: requester dropped before the response arrived");
            }
        });
    }
    tracing::debug!("Relay: request channel closed");
}

/// Run one request against the backend.
pub async fn dispatch(backend: &BackendClient, request: RelayRequest) -> RelayResponse {
    match request {
        RelayRequest::GenerateReply { payload, tone } => {
            match backend.send_reply(&payload, tone).await {
                Ok(reply) => {
                    tracing::info!("Reply generated successfully");
                    RelayResponse::Reply(reply)
                }
                Err(e) => {
                    tracing::error!("Error generating reply: {}", e);
                    RelayResponse::Failure(e.to_string())
                }
            }
        }
        RelayRequest::SummarizeThread {
            text,
            style,
            subject,
        } => {
            let style = style.unwrap_or_default();
            let subject = subject
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_THREAD_SUBJECT.to_string());
            match backend.send_summary(&text, style, &subject).await {
                Ok(summary) => {
                    tracing::info!("Summary generated successfully");
                    RelayResponse::Summary(summary)
                }
                Err(e) => {
                    tracing::error!("Error summarizing thread: {}", e);
                    RelayResponse::Failure(e.to_string())
                }
            }
        }
    }
}

impl RelayClient {
    /// Send one request and wait for its response.
    pub async fn request(&self, request: RelayRequest) -> Result<String, RelayError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.request_tx
            .send(Envelope { request, reply_tx })
            .await
            .map_err(|_| RelayError::Unavailable)?;
        let response = reply_rx.await.map_err(|_| RelayError::NoResponse)?;
        response.into_result()
    }

    pub async fn generate_reply(
        &self,
        payload: EmailPayload,
        tone: Tone,
    ) -> Result<String, RelayError> {
        self.request(RelayRequest::GenerateReply { payload, tone }).await
    }

    pub async fn summarize(
        &self,
        text: String,
        style: SummaryStyle,
        subject: Option<String>,
    ) -> Result<String, RelayError> {
        self.request(RelayRequest::SummarizeThread {
            text,
            style: Some(style),
            subject,
        })
        .await
    }

    pub fn is_connected(&self) -> bool {
        !self.request_tx.is_closed()
    }

    /// Client over an existing channel, for hosting the privileged side elsewhere.
    pub fn from_sender(request_tx: mpsc::Sender<Envelope>) -> Self {
        Self { request_tx }
    }
}

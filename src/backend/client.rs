//! HTTP client for the reply/summary backend

use reqwest::Client;
use serde::Serialize;

use super::error::{BackendError, Endpoint, classify_response};
use crate::mail::{EmailPayload, SummaryStyle, Tone};

/// Client for the agent backend. One POST per call, no retries, no timeout.
#[derive(Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
}

#[derive(Serialize)]
struct SummaryRequest<'a> {
    subject: &'a str,
    content: &'a str,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Scheme and authority of the backend, shown when it cannot be reached.
    pub fn host(&self) -> &str {
        backend_host(&self.base_url)
    }

    /// POST {base}/reply?tone={tone}
    pub async fn send_reply(
        &self,
        payload: &EmailPayload,
        tone: Tone,
    ) -> Result<String, BackendError> {
        tracing::debug!(
            "Requesting {} reply (subject {} chars, content {} chars)",
            tone,
            payload.subject.chars().count(),
            payload.content.chars().count()
        );
        self.post(Endpoint::Reply, ("tone", tone.as_str()), payload).await
    }

    /// POST {base}/summary?style={style}
    pub async fn send_summary(
        &self,
        text: &str,
        style: SummaryStyle,
        subject: &str,
    ) -> Result<String, BackendError> {
        tracing::debug!("Requesting {} summary ({} chars)", style, text.chars().count());
        let body = SummaryRequest {
            subject,
            content: text,
        };
        self.post(Endpoint::Summary, ("style", style.as_str()), &body).await
    }

    async fn post<B: Serialize + ?Sized>(
        &self,
        endpoint: Endpoint,
        param: (&str, &str),
        body: &B,
    ) -> Result<String, BackendError> {
        let url = format!("{}/{}", self.base_url, endpoint.path());

        let response = self
            .client
            .post(&url)
            .query(&[param])
            .json(body)
            .send()
            .await
            .map_err(|e| self.unreachable(&url, e))?;

        let status = response.status();
        tracing::info!("Backend {} responded with {}", endpoint.path(), status);

        let text = response
            .text()
            .await
            .map_err(|e| self.unreachable(&url, e))?;

        if !status.is_success() {
            tracing::error!("API returned error: {} {}", status, text);
        }

        let result = classify_response(endpoint, status, text);
        if let Ok(ref text) = result {
            tracing::debug!("Received {} of {} chars", endpoint.path(), text.chars().count());
        }
        result
    }

    fn unreachable(&self, url: &str, error: reqwest::Error) -> BackendError {
        tracing::error!("Backend call to {} failed: {}", url, error);
        BackendError::Unreachable {
            host: self.host().to_string(),
        }
    }
}

/// Everything before the `/api` path segment, or the whole URL if there is none.
pub fn backend_host(base_url: &str) -> &str {
    match base_url.find("/api") {
        Some(idx) => &base_url[..idx],
        None => base_url,
    }
}

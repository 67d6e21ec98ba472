//! Client for the AI reply/summary backend
//!
//! The backend exposes two plain-text endpoints under a common base URL:
//! - `POST {base}/reply?tone=...` with the email as JSON
//! - `POST {base}/summary?style=...` with `{subject, content}`

mod client;
mod error;

pub use client::{BackendClient, backend_host};
pub use error::{BackendError, Endpoint, classify_response};

//! Relay between the page side and the privileged side
//!
//! The page side may not call the backend across origins, so it hands each
//! request to a privileged task that does. Requests are one-shot: exactly
//! one response comes back per request.

mod actor;
mod protocol;
mod stdio;

pub use actor::{Envelope, RelayClient, dispatch, spawn_relay};
pub use protocol::{RelayError, RelayRequest, RelayResponse};
pub use stdio::serve_lines;

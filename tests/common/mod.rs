//! In-process fake of the agent backend, bound to an ephemeral port.

#![allow(dead_code)]

use axum::Router;
use axum::extract::State;
use axum::http::{Method, StatusCode, Uri};
use std::sync::{Arc, Mutex};

/// One request as the fake backend saw it.
#[derive(Debug, Clone)]
pub struct Captured {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub body: serde_json::Value,
}

#[derive(Clone)]
struct FakeState {
    status: StatusCode,
    body: String,
    requests: Arc<Mutex<Vec<Captured>>>,
}

pub struct FakeBackend {
    pub base_url: String,
    requests: Arc<Mutex<Vec<Captured>>>,
}

impl FakeBackend {
    /// Answer every request with `status` and `body`. The server task is
    /// left running when the test ends.
    pub async fn start(status: u16, body: &str) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = FakeState {
            status: StatusCode::from_u16(status).expect("valid status"),
            body: body.to_string(),
            requests: requests.clone(),
        };
        let app = Router::new().fallback(record).with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind fake backend");
        let addr = listener.local_addr().expect("local_addr");
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            base_url: format!("http://{}/api/v1/agent", addr),
            requests,
        }
    }

    pub fn requests(&self) -> Vec<Captured> {
        self.requests.lock().expect("requests lock").clone()
    }
}

async fn record(
    State(state): State<FakeState>,
    method: Method,
    uri: Uri,
    body: String,
) -> (StatusCode, String) {
    let body = serde_json::from_str(&body).unwrap_or(serde_json::Value::Null);
    state.requests.lock().expect("requests lock").push(Captured {
        method,
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        body,
    });
    (state.status, state.body.clone())
}

/// A local port with nothing listening on it.
pub fn unused_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind free port");
    listener.local_addr().expect("local_addr").port()
}

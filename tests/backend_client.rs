//! Integration test: the backend client against an in-process fake backend.

mod common;

use axum::http::Method;
use common::{FakeBackend, unused_port};
use myga::backend::{BackendClient, BackendError, Endpoint};
use myga::mail::{EmailPayload, SummaryStyle, Tone};

#[tokio::test]
async fn test_reply_posts_payload_with_tone() {
    let fake = FakeBackend::start(200, "Sure, tomorrow works.").await;
    let client = BackendClient::new(fake.base_url.clone());

    let reply = client
        .send_reply(&EmailPayload::new("Hello", "Let's meet tomorrow"), Tone::Formal)
        .await
        .unwrap();
    assert_eq!(reply, "Sure, tomorrow works.");

    let requests = fake.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.method, Method::POST);
    assert_eq!(request.path, "/api/v1/agent/reply");
    assert_eq!(request.query.as_deref(), Some("tone=Formal"));
    assert_eq!(request.body["subject"], "Hello");
    assert_eq!(request.body["content"], "Let's meet tomorrow");
}

#[tokio::test]
async fn test_summary_posts_subject_and_content_with_style() {
    let fake = FakeBackend::start(200, "- They meet tomorrow").await;
    let client = BackendClient::new(fake.base_url.clone());

    let summary = client
        .send_summary("Hi there\n\nFollowing up", SummaryStyle::BulletPoints, "Plans")
        .await
        .unwrap();
    assert_eq!(summary, "- They meet tomorrow");

    let request = &fake.requests()[0];
    assert_eq!(request.path, "/api/v1/agent/summary");
    assert_eq!(request.query.as_deref(), Some("style=BulletPoints"));
    assert_eq!(
        request.body,
        serde_json::json!({"subject": "Plans", "content": "Hi there\n\nFollowing up"})
    );
}

#[tokio::test]
async fn test_status_codes_map_to_fixed_messages() {
    let cases = [
        (429, "API rate limit exceeded. Please try again later."),
        (
            400,
            "Invalid email content. Please ensure the email has both subject and content.",
        ),
        (500, "Server error. Please try again later."),
        (503, "API error (503): maintenance"),
    ];

    for (status, expected) in cases {
        let fake = FakeBackend::start(status, "maintenance").await;
        let client = BackendClient::new(fake.base_url.clone());
        let err = client
            .send_reply(&EmailPayload::new("Hello", "Body"), Tone::Casual)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), expected, "status {}", status);
    }
}

#[tokio::test]
async fn test_empty_body_is_an_error() {
    let fake = FakeBackend::start(200, "").await;
    let client = BackendClient::new(fake.base_url.clone());

    let err = client
        .send_summary("text", SummaryStyle::Short, "Thread Summary")
        .await
        .unwrap_err();
    assert_eq!(err, BackendError::EmptyResponse(Endpoint::Summary));
    assert_eq!(err.to_string(), "Received empty summary from API.");
}

#[tokio::test]
async fn test_unreachable_backend_names_host() {
    let port = unused_port();
    let client = BackendClient::new(format!("http://127.0.0.1:{}/api/v1/agent", port));

    let err = client
        .send_reply(&EmailPayload::new("Hello", "Body"), Tone::Formal)
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        format!(
            "Failed to connect to backend. Make sure the backend server is running on http://127.0.0.1:{}",
            port
        )
    );
}

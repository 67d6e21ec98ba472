use reqwest::StatusCode;

/// Which backend endpoint a call went to. Error messages differ slightly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Reply,
    Summary,
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Reply => "reply",
            Endpoint::Summary => "summary",
        }
    }

    fn invalid_input_message(&self) -> &'static str {
        match self {
            Endpoint::Reply => {
                "Invalid email content. Please ensure the email has both subject and content."
            }
            Endpoint::Summary => "Invalid email content. Please ensure the email body is not empty.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    #[error("API rate limit exceeded. Please try again later.")]
    RateLimited,
    #[error("{}", .0.invalid_input_message())]
    InvalidInput(Endpoint),
    #[error("Server error. Please try again later.")]
    Server,
    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },
    #[error("Received empty {} from API.", .0.path())]
    EmptyResponse(Endpoint),
    #[error("Failed to connect to backend. Make sure the backend server is running on {host}")]
    Unreachable { host: String },
}

/// Map an HTTP response to the reply text or a classified error.
///
/// The status decides the error category regardless of what the body says.
pub fn classify_response(
    endpoint: Endpoint,
    status: StatusCode,
    body: String,
) -> Result<String, BackendError> {
    if !status.is_success() {
        return Err(match status {
            StatusCode::TOO_MANY_REQUESTS => BackendError::RateLimited,
            StatusCode::BAD_REQUEST => BackendError::InvalidInput(endpoint),
            StatusCode::INTERNAL_SERVER_ERROR => BackendError::Server,
            _ => BackendError::Api {
                status: status.as_u16(),
                body,
            },
        });
    }
    if body.is_empty() {
        return Err(BackendError::EmptyResponse(endpoint));
    }
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_categories_ignore_body() {
        for body in ["", "quota", "{\"error\":\"x\"}"] {
            assert_eq!(
                classify_response(Endpoint::Reply, StatusCode::TOO_MANY_REQUESTS, body.into())
                    .unwrap_err()
                    .to_string(),
                "API rate limit exceeded. Please try again later."
            );
            assert_eq!(
                classify_response(Endpoint::Summary, StatusCode::INTERNAL_SERVER_ERROR, body.into())
                    .unwrap_err()
                    .to_string(),
                "Server error. Please try again later."
            );
            assert_eq!(
                classify_response(Endpoint::Reply, StatusCode::BAD_REQUEST, body.into())
                    .unwrap_err()
                    .to_string(),
                "Invalid email content. Please ensure the email has both subject and content."
            );
        }
    }

    #[test]
    fn test_invalid_input_message_depends_on_endpoint() {
        let err =
            classify_response(Endpoint::Summary, StatusCode::BAD_REQUEST, String::new()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid email content. Please ensure the email body is not empty."
        );
    }

    #[test]
    fn test_other_status_carries_status_and_body() {
        let err = classify_response(Endpoint::Reply, StatusCode::BAD_GATEWAY, "upstream down".into())
            .unwrap_err();
        assert_eq!(
            err,
            BackendError::Api {
                status: 502,
                body: "upstream down".to_string()
            }
        );
        assert_eq!(err.to_string(), "API error (502): upstream down");
    }

    #[test]
    fn test_empty_success_body() {
        assert_eq!(
            classify_response(Endpoint::Reply, StatusCode::OK, String::new())
                .unwrap_err()
                .to_string(),
            "Received empty reply from API."
        );
        assert_eq!(
            classify_response(Endpoint::Summary, StatusCode::OK, String::new())
                .unwrap_err()
                .to_string(),
            "Received empty summary from API."
        );
    }

    #[test]
    fn test_success_body_returned_verbatim() {
        let body = "  Sure, tomorrow works.\n".to_string();
        assert_eq!(
            classify_response(Endpoint::Reply, StatusCode::OK, body.clone()),
            Ok(body)
        );
    }

    #[test]
    fn test_unreachable_names_host() {
        let err = BackendError::Unreachable {
            host: "http://localhost:8080".to_string(),
        };
        assert!(err.to_string().contains("http://localhost:8080"));
    }
}

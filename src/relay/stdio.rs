//! Line-delimited JSON transport for the relay
//!
//! Lets the privileged side run as its own process: one request per input
//! line, one response per output line.

use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use super::actor::dispatch;
use super::protocol::{RelayRequest, RelayResponse};
use crate::backend::BackendClient;

/// Serve requests from `reader` until it is exhausted.
///
/// A line that is not a valid request is answered with a failure response;
/// only I/O errors end the loop early.
pub async fn serve_lines<R, W>(mut reader: R, mut writer: W, backend: &BackendClient) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buf = Vec::new();
    loop {
        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .await
            .context("Failed to read relay request")?;
        if read == 0 {
            return Ok(());
        }

        let response = match std::str::from_utf8(&buf) {
            Ok(line) if line.trim().is_empty() => continue,
            Ok(line) => match serde_json::from_str::<RelayRequest>(line) {
                Ok(request) => {
                    tracing::info!("Relay received message: {}", request.action());
                    dispatch(backend, request).await
                }
                Err(e) => reject(e),
            },
            Err(e) => reject(e),
        };

        let mut encoded =
            serde_json::to_string(&response).context("Failed to encode relay response")?;
        encoded.push('\n');
        writer
            .write_all(encoded.as_bytes())
            .await
            .context("Failed to write relay response")?;
        writer.flush().await.context("Failed to flush relay response")?;
    }
}

fn reject(error: impl std::fmt::Display) -> RelayResponse {
    tracing::warn!("Rejecting malformed relay request: {}", error);
    RelayResponse::Failure(format!("Invalid relay request: {}", error))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::BufReader;

    #[tokio::test]
    async fn test_one_response_line_per_request_line() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let backend = BackendClient::new(format!("http://127.0.0.1:{}/api/v1/agent", port));

        let input = concat!(
            "{\"action\":\"summarizeEmail\",\"emailContent\":\"Hi there\"}\n",
            "\n",
            "not json\n",
        );
        let mut output = Vec::new();
        serve_lines(BufReader::new(input.as_bytes()), &mut output, &backend)
            .await
            .unwrap();

        let output = String::from_utf8(output).unwrap();
        let responses: Vec<serde_json::Value> = output
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(responses.len(), 2);

        assert_eq!(responses[0]["success"], false);
        let error = responses[0]["error"].as_str().unwrap();
        assert!(error.contains(&format!("http://127.0.0.1:{}", port)));

        assert_eq!(responses[1]["success"], false);
        assert!(
            responses[1]["error"]
                .as_str()
                .unwrap()
                .starts_with("Invalid relay request")
        );
    }

    #[tokio::test]
    async fn test_invalid_utf8_line_does_not_stop_the_loop() {
        let backend = BackendClient::new("http://127.0.0.1:9/api/v1/agent");
        let input: &[u8] =
            b"\xff\xfe bad\n{\"action\":\"bogus\"}\n[1, 2\n{\"emailContent\":\"no action\"}";
        let mut output = Vec::new();
        serve_lines(input, &mut output, &backend).await.unwrap();

        let responses: Vec<serde_json::Value> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(responses.len(), 4);
        for response in &responses {
            assert_eq!(response["success"], false);
            assert!(
                response["error"]
                    .as_str()
                    .unwrap()
                    .starts_with("Invalid relay request: ")
            );
        }
    }
}

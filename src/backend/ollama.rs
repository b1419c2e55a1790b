//! Backend for Ollama's generate API.
//!
//! Sends `{"model", "prompt"}` to `/api/generate` and reads the
//! newline-delimited JSON reply through [`StreamingDecoder`]. Omitting
//! the `stream` field makes Ollama stream by default, which is what the
//! decoder is built for.

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use tracing::debug;

use super::{Backend, GenFragment, GenRequest};
use crate::error::{RefreshError, Result};
use crate::streaming::StreamingDecoder;

/// Backend for a local Ollama server.
///
/// The endpoint is `POST <base>/api/generate`; the response is a stream
/// of JSON objects carrying `response` text fragments, terminated
/// implicitly by stream closure. One request per call, no retries.
#[derive(Debug, Clone, Default)]
pub struct OllamaBackend;

impl OllamaBackend {
    fn generate_url(base_url: &str) -> String {
        format!("{}/api/generate", base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl Backend for OllamaBackend {
    async fn generate(
        &self,
        client: &Client,
        base_url: &str,
        request: &GenRequest,
    ) -> Result<Vec<GenFragment>> {
        let url = Self::generate_url(base_url);

        let resp = client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| RefreshError::Connect {
                url: url.clone(),
                reason: e.to_string(),
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(RefreshError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let mut stream = resp.bytes_stream();
        let mut decoder = StreamingDecoder::new();
        let mut fragments = Vec::new();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            for value in decoder.decode(&chunk) {
                match serde_json::from_value::<GenFragment>(value) {
                    Ok(fragment) => fragments.push(fragment),
                    // Only objects carry fragment text; skip anything else.
                    Err(_) => debug!("skipping non-fragment value in stream"),
                }
            }
        }

        if let Some(tail) = decoder.finish() {
            debug!(
                bytes = tail.len(),
                "discarding incomplete trailing data from stream"
            );
        }
        debug!(fragments = fragments.len(), "generation stream consumed");

        Ok(fragments)
    }

    fn name(&self) -> &'static str {
        "ollama"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_url_joins_base() {
        assert_eq!(
            OllamaBackend::generate_url("http://localhost:11434"),
            "http://localhost:11434/api/generate"
        );
    }

    #[test]
    fn test_generate_url_strips_trailing_slash() {
        assert_eq!(
            OllamaBackend::generate_url("http://localhost:11434/"),
            "http://localhost:11434/api/generate"
        );
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_connect_error() {
        let backend = OllamaBackend;
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(2))
            .build()
            .unwrap();
        let request = GenRequest::new("gemma2:2b", "hello");

        // Port 1 on localhost refuses connections.
        let err = backend
            .generate(&client, "http://127.0.0.1:1", &request)
            .await
            .unwrap_err();
        assert!(matches!(err, RefreshError::Connect { .. }));
    }
}

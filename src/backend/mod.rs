//! Backend trait and the request/fragment types it speaks.
//!
//! [`Backend`] abstracts the single call this crate makes against the
//! generation service: one prompt in, the ordered stream of decoded
//! fragments out. [`OllamaBackend`] talks to a real server;
//! [`MockBackend`] replays canned replies for tests.

pub mod mock;
pub mod ollama;

pub use mock::{MockBackend, MockReply};
pub use ollama::OllamaBackend;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// The body of one generation request. Serializes to exactly the JSON
/// the service expects: `{"model": ..., "prompt": ...}`.
#[derive(Debug, Clone, Serialize)]
pub struct GenRequest {
    /// Model identifier (e.g. `"gemma2:2b"`).
    pub model: String,
    /// The full prompt text.
    pub prompt: String,
}

impl GenRequest {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
        }
    }
}

/// One decoded fragment of a streamed generation response.
///
/// The service emits these as JSON objects, minimally
/// `{"response": "<text>", ...}`, with `done: true` on the final one.
/// Unknown fields are ignored; missing fields default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GenFragment {
    #[serde(default)]
    pub response: String,
    #[serde(default)]
    pub done: bool,
}

impl GenFragment {
    /// A plain text fragment, mid-stream.
    pub fn text(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            done: false,
        }
    }
}

/// Concatenate fragment text in arrival order, trimming the result.
pub fn join_fragments(fragments: &[GenFragment]) -> String {
    let joined: String = fragments.iter().map(|f| f.response.as_str()).collect();
    joined.trim().to_string()
}

/// Abstraction over the text-generation service.
///
/// Implementations send one request and drive the response stream to
/// completion before returning; there is no retry and no partial
/// delivery. Object-safe, designed to be used as `Arc<dyn Backend>`.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Send one prompt and collect the full fragment stream.
    async fn generate(
        &self,
        client: &Client,
        base_url: &str,
        request: &GenRequest,
    ) -> Result<Vec<GenFragment>>;

    /// Human-readable name for logging.
    fn name(&self) -> &'static str;
}

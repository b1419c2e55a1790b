//! Mock backend for testing without a live generation server.
//!
//! [`MockBackend`] replays pre-configured replies in order, so pipeline
//! behavior (including failure handling) can be tested
//! deterministically.
//!
//! # Example
//!
//! ```
//! use listing_refresh::backend::{MockBackend, MockReply};
//!
//! let mock = MockBackend::new(vec![
//!     MockReply::stream(["Title: Cozy", " Cabin\nDescription: A nice place"]),
//!     MockReply::Unreachable,
//! ]);
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use reqwest::Client;

use super::{Backend, GenFragment, GenRequest};
use crate::error::{RefreshError, Result};

/// One scripted reply from the mock backend.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// A successful call whose stream decoded into these text
    /// fragments, the last one marked `done`.
    Stream(Vec<String>),
    /// A call that fails as if the endpoint could not be reached.
    Unreachable,
}

impl MockReply {
    /// Convenience constructor for [`MockReply::Stream`].
    pub fn stream<I, S>(fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Stream(fragments.into_iter().map(Into::into).collect())
    }
}

/// A test backend that replays canned replies in order.
///
/// Cycles back to the beginning when all replies have been consumed.
#[derive(Debug)]
pub struct MockBackend {
    replies: Vec<MockReply>,
    index: AtomicUsize,
}

impl MockBackend {
    /// Create a mock backend with the given scripted replies.
    ///
    /// Replies are returned in order. When exhausted, cycles from the
    /// beginning.
    pub fn new(replies: Vec<MockReply>) -> Self {
        assert!(!replies.is_empty(), "MockBackend requires at least one reply");
        Self {
            replies,
            index: AtomicUsize::new(0),
        }
    }

    /// Create a mock that always streams the same single-fragment text.
    pub fn fixed(text: impl Into<String>) -> Self {
        Self::new(vec![MockReply::stream([text.into()])])
    }

    /// How many calls the mock has served so far.
    pub fn calls(&self) -> usize {
        self.index.load(Ordering::Relaxed)
    }

    fn next_reply(&self) -> MockReply {
        let idx = self.index.fetch_add(1, Ordering::Relaxed) % self.replies.len();
        self.replies[idx].clone()
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn generate(
        &self,
        _client: &Client,
        base_url: &str,
        _request: &GenRequest,
    ) -> Result<Vec<GenFragment>> {
        match self.next_reply() {
            MockReply::Stream(texts) => {
                let last = texts.len().saturating_sub(1);
                Ok(texts
                    .into_iter()
                    .enumerate()
                    .map(|(i, response)| GenFragment {
                        response,
                        done: i == last,
                    })
                    .collect())
            }
            MockReply::Unreachable => Err(RefreshError::Connect {
                url: base_url.to_string(),
                reason: "mock endpoint is unreachable".to_string(),
            }),
        }
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::join_fragments;

    fn request() -> GenRequest {
        GenRequest::new("test", "test prompt")
    }

    #[tokio::test]
    async fn test_mock_fixed_reply() {
        let mock = MockBackend::fixed("Hello!");
        let client = Client::new();
        let fragments = mock
            .generate(&client, "http://unused", &request())
            .await
            .unwrap();
        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments[0].response, "Hello!");
        assert!(fragments[0].done);
    }

    #[tokio::test]
    async fn test_mock_splits_reply_into_fragments() {
        let mock = MockBackend::new(vec![MockReply::stream(["Tit", "le: A", "\nrest"])]);
        let client = Client::new();
        let fragments = mock
            .generate(&client, "http://unused", &request())
            .await
            .unwrap();
        assert_eq!(fragments.len(), 3);
        assert!(!fragments[0].done);
        assert!(fragments[2].done);
        assert_eq!(join_fragments(&fragments), "Title: A\nrest");
    }

    #[tokio::test]
    async fn test_mock_cycles_replies() {
        let mock = MockBackend::new(vec![
            MockReply::stream(["first"]),
            MockReply::stream(["second"]),
        ]);
        let client = Client::new();
        let r1 = mock.generate(&client, "http://unused", &request()).await.unwrap();
        let r2 = mock.generate(&client, "http://unused", &request()).await.unwrap();
        let r3 = mock.generate(&client, "http://unused", &request()).await.unwrap();
        assert_eq!(r1[0].response, "first");
        assert_eq!(r2[0].response, "second");
        assert_eq!(r3[0].response, "first"); // cycles
        assert_eq!(mock.calls(), 3);
    }

    #[tokio::test]
    async fn test_mock_unreachable_reply() {
        let mock = MockBackend::new(vec![MockReply::Unreachable]);
        let client = Client::new();
        let err = mock
            .generate(&client, "http://mock-endpoint", &request())
            .await
            .unwrap_err();
        assert!(matches!(err, RefreshError::Connect { .. }));
    }
}

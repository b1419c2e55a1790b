use thiserror::Error;

use crate::content::ParseError;

/// Errors produced by the refresh pipeline and its components.
///
/// Every variant is per-record as far as the pipeline is concerned: a
/// failed record is logged and skipped, and the batch moves on.
#[derive(Error, Debug)]
pub enum RefreshError {
    /// The generation endpoint could not be reached at all.
    #[error("failed to connect to generation endpoint at {url}: {reason}")]
    Connect { url: String, reason: String },

    /// The generation endpoint answered with a non-success status.
    #[error("generation endpoint returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The response stream broke while being read.
    #[error("failed to read response stream: {0}")]
    Request(#[from] reqwest::Error),

    /// The generated text did not contain the expected markers.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A database operation failed; the surrounding transaction is
    /// rolled back before this propagates.
    #[error("storage operation failed: {0}")]
    Storage(#[from] libsql::Error),

    /// Invalid configuration detected before the batch starts.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Catch-all for other errors.
    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, RefreshError>;

/// Truncate long payloads (model output, response bodies) for error
/// messages, keeping logs readable.
pub(crate) fn truncate(s: &str, max_len: usize) -> String {
    let total = s.chars().count();
    if total <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len).collect();
        format!("{}... ({} chars total)", truncated, total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_string_unchanged() {
        assert_eq!(truncate("hello", 10), "hello");
    }

    #[test]
    fn test_truncate_long_string() {
        let long = "a".repeat(300);
        let out = truncate(&long, 200);
        assert!(out.starts_with(&"a".repeat(200)));
        assert!(out.ends_with("(300 chars total)"));
    }

    #[test]
    fn test_error_display_carries_status() {
        let err = RefreshError::Http {
            status: 503,
            body: "overloaded".into(),
        };
        assert_eq!(
            err.to_string(),
            "generation endpoint returned HTTP 503: overloaded"
        );
    }
}

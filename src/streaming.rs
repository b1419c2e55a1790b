//! Buffered streaming decoder for newline-delimited JSON streams.
//!
//! Ollama's generate API answers with one JSON object per line, but the
//! transport makes no promise that chunk boundaries line up with object
//! boundaries. A single object can arrive split across two reads, and a
//! read can end in the middle of a multi-byte UTF-8 scalar.

use serde_json::{Deserializer, Value};

/// Buffered decoder for a stream of concatenated JSON values.
///
/// Accumulates raw bytes and, on every chunk, decodes as many complete
/// JSON values as the buffer currently holds, consuming exactly the
/// bytes each decode used. Incomplete trailing data stays buffered
/// until more bytes arrive. Works whether or not the values are
/// newline-separated.
///
/// # Example
///
/// ```
/// use listing_refresh::StreamingDecoder;
///
/// let mut decoder = StreamingDecoder::new();
///
/// // First chunk ends mid-object, so nothing decodes yet.
/// let values = decoder.decode(b"{\"response\":\"hel");
/// assert!(values.is_empty());
///
/// // Second chunk completes it; no newline is required.
/// let values = decoder.decode(b"lo\"}\n{\"done\":true}");
/// assert_eq!(values.len(), 2);
/// assert_eq!(values[0]["response"], "hello");
/// ```
pub struct StreamingDecoder {
    buffer: Vec<u8>,
}

impl StreamingDecoder {
    /// Create a new empty decoder.
    pub fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    /// Feed a raw chunk into the decoder and return the complete JSON
    /// values it unlocked, in order.
    ///
    /// Decoding stops at the first incomplete (or malformed) trailing
    /// data; those bytes remain buffered for the next chunk.
    pub fn decode(&mut self, chunk: &[u8]) -> Vec<Value> {
        self.buffer.extend_from_slice(chunk);

        let mut values = Vec::new();
        let mut consumed = 0;
        {
            let mut stream = Deserializer::from_slice(&self.buffer).into_iter::<Value>();
            while let Some(item) = stream.next() {
                match item {
                    Ok(value) => {
                        consumed = stream.byte_offset();
                        values.push(value);
                    }
                    Err(_) => break,
                }
            }
        }
        self.buffer.drain(..consumed);

        values
    }

    /// Consume the decoder once the stream is exhausted.
    ///
    /// Returns whatever undecodable tail was left in the buffer (an
    /// incomplete trailing object, usually), or `None` if the stream
    /// ended cleanly. The tail is only useful for diagnostics; it is
    /// never decoded.
    pub fn finish(self) -> Option<String> {
        let tail = String::from_utf8_lossy(&self.buffer);
        let tail = tail.trim();
        if tail.is_empty() {
            None
        } else {
            Some(tail.to_string())
        }
    }
}

impl Default for StreamingDecoder {
    fn default() -> Self {
        Self::new()
    }
}

//! Self-delimiting JSON framing over a byte stream.
//!
//! A frame boundary is wherever the accumulated bytes first parse as one
//! complete JSON value. `serde_json` reports truncated input as an EOF error,
//! which is the signal to keep accumulating; any other parse failure means
//! the payload can never become valid and must be surfaced instead of letting
//! the buffer wedge. A byte cap bounds input that stays EOF-classified
//! forever (an object whose closing brace never arrives).

use serde::de::DeserializeOwned;
use thiserror::Error;

/// Errors surfaced while decoding a frame.
#[derive(Debug, Error)]
pub enum FrameError {
    /// The payload is complete but not a valid value of the expected shape.
    #[error("malformed JSON frame: {source}")]
    Malformed {
        #[source]
        source: serde_json::Error,
    },
    /// The accumulated frame exceeded the configured cap.
    #[error("frame too large: {size} bytes exceeds {max_bytes} byte limit")]
    TooLarge { size: usize, max_bytes: usize },
}

/// Attempts to decode one value from the front of `bytes`.
///
/// Returns `Ok(None)` when the input is empty or truncated (keep reading),
/// and `Ok(Some((value, consumed)))` when a complete value parsed, where
/// `consumed` is the byte offset just past the value. Bytes beyond the offset
/// belong to the next frame.
///
/// # Errors
///
/// Returns [`FrameError::Malformed`] when the input can never parse as a
/// value of type `T`.
pub fn decode_frame<T: DeserializeOwned>(bytes: &[u8]) -> Result<Option<(T, usize)>, FrameError> {
    let mut stream = serde_json::Deserializer::from_slice(bytes).into_iter::<T>();
    match stream.next() {
        None => Ok(None),
        Some(Ok(value)) => Ok(Some((value, stream.byte_offset()))),
        Some(Err(error)) if error.is_eof() => Ok(None),
        Some(Err(source)) => Err(FrameError::Malformed { source }),
    }
}

/// Per-connection accumulation buffer.
///
/// Owned exclusively by one connection; cleared after every successful
/// decode and after every framing error so a bad payload cannot poison
/// subsequent frames.
#[derive(Debug)]
pub struct FrameBuffer {
    bytes: Vec<u8>,
    max_bytes: usize,
}

impl FrameBuffer {
    /// Creates a buffer that rejects frames larger than `max_bytes`.
    #[must_use]
    pub fn new(max_bytes: usize) -> Self {
        Self {
            bytes: Vec::new(),
            max_bytes,
        }
    }

    /// Appends raw bytes read from the socket.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::TooLarge`] and resets the buffer when the
    /// accumulated size exceeds the cap.
    pub fn extend(&mut self, chunk: &[u8]) -> Result<(), FrameError> {
        self.bytes.extend_from_slice(chunk);
        let size = self.bytes.len();
        if size > self.max_bytes {
            self.bytes.clear();
            return Err(FrameError::TooLarge {
                size,
                max_bytes: self.max_bytes,
            });
        }
        Ok(())
    }

    /// Attempts to take one complete value off the front of the buffer.
    ///
    /// Consumed bytes are dropped; any remainder stays buffered for the next
    /// frame. `Ok(None)` means the buffered input is still incomplete.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::Malformed`] and resets the buffer when the
    /// buffered input can never become a valid value.
    pub fn decode<T: DeserializeOwned>(&mut self) -> Result<Option<T>, FrameError> {
        match decode_frame::<T>(&self.bytes) {
            Ok(Some((value, consumed))) => {
                self.bytes.drain(..consumed);
                Ok(Some(value))
            }
            Ok(None) => Ok(None),
            Err(error) => {
                self.bytes.clear();
                Err(error)
            }
        }
    }

    /// True when nothing is buffered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::CommandRequest;
    use rstest::rstest;

    #[test]
    fn decodes_a_complete_request() {
        let mut buffer = FrameBuffer::new(1024);
        buffer
            .extend(br#"{"type":"create_slider","params":{}}"#)
            .unwrap();
        let request: CommandRequest = buffer.decode().unwrap().expect("complete frame");
        assert_eq!(request.command(), "create_slider");
        assert!(buffer.is_empty());
    }

    #[rstest]
    #[case::split_mid_key(br#"{"type"#.as_slice(), br#"":"a"}"#.as_slice())]
    #[case::split_mid_string(br#"{"type":"cre"#.as_slice(), br#"ate"}"#.as_slice())]
    fn accumulates_across_arbitrary_chunk_splits(#[case] first: &[u8], #[case] second: &[u8]) {
        let mut buffer = FrameBuffer::new(1024);
        buffer.extend(first).unwrap();
        assert!(
            buffer.decode::<CommandRequest>().unwrap().is_none(),
            "first chunk alone must stay incomplete"
        );
        buffer.extend(second).unwrap();
        let request: CommandRequest = buffer.decode().unwrap().expect("second chunk completes");
        assert!(!request.command().is_empty());
    }

    #[test]
    fn leaves_pipelined_remainder_buffered() {
        let mut buffer = FrameBuffer::new(1024);
        buffer.extend(br#"{"type":"a"}{"type":"b"}"#).unwrap();
        let first: CommandRequest = buffer.decode().unwrap().expect("first frame");
        assert_eq!(first.command(), "a");
        let second: CommandRequest = buffer.decode().unwrap().expect("second frame");
        assert_eq!(second.command(), "b");
        assert!(buffer.is_empty());
    }

    #[test]
    fn malformed_payload_errors_and_resets() {
        let mut buffer = FrameBuffer::new(1024);
        buffer.extend(br#"{"type":]"#).unwrap();
        let error = buffer.decode::<CommandRequest>().unwrap_err();
        assert!(matches!(error, FrameError::Malformed { .. }));
        assert!(buffer.is_empty(), "bad payload must not wedge the buffer");
    }

    #[test]
    fn oversized_frame_errors_and_resets() {
        let mut buffer = FrameBuffer::new(8);
        let error = buffer.extend(br#"{"type":"too long"}"#).unwrap_err();
        assert!(matches!(error, FrameError::TooLarge { .. }));
        assert!(buffer.is_empty());
    }

    #[test]
    fn empty_buffer_decodes_to_none() {
        let mut buffer = FrameBuffer::new(1024);
        assert!(buffer.decode::<CommandRequest>().unwrap().is_none());
    }
}

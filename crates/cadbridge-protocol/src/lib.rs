//! Wire types and framing for the command bridge.
//!
//! Requests and responses are single UTF-8 JSON values with no length prefix
//! or delimiter; message boundaries are recovered by attempting to parse the
//! accumulated byte stream as one complete value. Both the server and the
//! agent-side client share the types and the framing logic in this crate.

mod envelope;
mod framing;
mod request;

pub use envelope::Envelope;
pub use framing::{FrameBuffer, FrameError, decode_frame};
pub use request::{CommandRequest, RequestError};

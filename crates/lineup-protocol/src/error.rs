//! Error types for the protocol layer.

/// Errors that can occur while encoding or decoding messages.
///
/// A `ProtocolError` always means the bytes were the problem, never the
/// game: an illegal move that decodes fine is a `GameError` in the room
/// crate, not this.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a message into text).
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed: malformed JSON, an unknown `type` tag,
    /// a missing field, or a value of the wrong type.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The frame was readable but not acceptable, e.g. binary data that
    /// isn't UTF-8.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}

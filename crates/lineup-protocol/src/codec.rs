//! Codec trait and implementations for serializing/deserializing messages.
//!
//! The browser client speaks text WebSocket frames, so a codec here maps
//! between Rust values and `String`s rather than raw byte buffers.

use serde::{Serialize, de::DeserializeOwned};

use crate::ProtocolError;

/// Converts messages to and from the text that travels in a frame.
///
/// `Send + Sync + 'static` because one codec instance is shared by every
/// connection task for the lifetime of the server.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into frame text.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if the value can't be represented.
    fn encode<T: Serialize>(&self, value: &T) -> Result<String, ProtocolError>;

    /// Parses frame text back into a value.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the text is malformed or doesn't
    /// match the expected type.
    fn decode<T: DeserializeOwned>(&self, text: &str) -> Result<T, ProtocolError>;

    /// Parses a binary frame. Some clients send JSON as binary; anything
    /// that isn't UTF-8 is rejected before it reaches [`Codec::decode`].
    fn decode_bytes<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError> {
        let text = std::str::from_utf8(data).map_err(|e| {
            ProtocolError::InvalidMessage(format!("frame is not UTF-8: {e}"))
        })?;
        self.decode(text)
    }
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] backed by `serde_json`.
///
/// Behind the `json` feature flag (enabled by default).
///
/// ## Example
///
/// ```rust
/// use lineup_protocol::{ClientMessage, Codec, JsonCodec};
///
/// let codec = JsonCodec;
/// let msg: ClientMessage = codec.decode(r#"{"type":"place-card","position":0}"#).unwrap();
/// assert_eq!(msg, ClientMessage::PlaceCard { position: 0 });
///
/// let text = codec.encode(&msg).unwrap();
/// assert!(text.contains("place-card"));
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<String, ProtocolError> {
        serde_json::to_string(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, text: &str) -> Result<T, ProtocolError> {
        serde_json::from_str(text).map_err(ProtocolError::Decode)
    }
}

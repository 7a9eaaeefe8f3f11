//! Codec trait and implementations for request and response bodies.
//!
//! The API client doesn't care HOW bodies are serialized; it just needs
//! something that implements the [`Codec`] trait. Today the registration
//! API only speaks JSON, so [`JsonCodec`] is the only implementation, but
//! keeping the seam means tests can feed raw bytes through the exact same
//! decode path the client uses.

use serde::{de::DeserializeOwned, Serialize};

use crate::ProtocolError;

/// A codec that can encode Rust types to bytes and decode bytes back.
///
/// - `Send + Sync` → the client holding it can be shared across tasks.
/// - `'static` → it owns everything it needs.
///
/// `DeserializeOwned` (vs plain `Deserialize`) means the decoded value
/// doesn't borrow from the response buffer, so the buffer can be dropped
/// right after decoding.
pub trait Codec: Send + Sync + 'static {
    /// The `Content-Type` this codec produces.
    fn content_type(&self) -> &'static str;

    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if serialization fails.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the bytes are malformed or a
    /// required field is missing.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] that uses JSON (via `serde_json`).
///
/// This is behind the `json` feature flag (enabled by default).
///
/// ## Example
///
/// ```rust
/// use vonix_protocol::{Codec, ErrorBody, JsonCodec};
///
/// let codec = JsonCodec;
/// let bytes = codec.encode(&ErrorBody::new("Invalid password")).unwrap();
/// let decoded: ErrorBody = codec.decode(&bytes).unwrap();
/// assert_eq!(decoded.error, "Invalid password");
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn content_type(&self) -> &'static str {
        "application/json"
    }

    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}

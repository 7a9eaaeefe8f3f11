use std::time::Duration;

use vonix_protocol::ProtocolError;

/// Errors that can occur when calling the registration API.
///
/// Every operation returns `Result<_, ApiError>`. The `Display` output is
/// what players end up seeing, so the transport and decode variants carry
/// a short tag in front of the detail.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Connecting, sending, or reading the body failed.
    #[error("transport: {0}")]
    Transport(String),

    /// The request body couldn't be serialized.
    #[error("encode: {0}")]
    Encode(String),

    /// The response body was malformed or missing a required field.
    #[error("decode: {0}")]
    Decode(String),

    /// The server answered with a non-200 status and an `error` message.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// No response arrived before the deadline.
    #[error("timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    /// The client couldn't be built from the given configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ApiError {
    /// HTTP status for [`ApiError::Api`], `None` otherwise.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<ProtocolError> for ApiError {
    fn from(err: ProtocolError) -> Self {
        match err {
            ProtocolError::Encode(inner) => Self::Encode(inner.to_string()),
            ProtocolError::Decode(inner) => Self::Decode(inner.to_string()),
            ProtocolError::InvalidMessage(detail) => Self::Decode(detail),
        }
    }
}

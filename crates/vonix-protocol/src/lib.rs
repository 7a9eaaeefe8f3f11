//! Wire protocol for the Vonix registration API.
//!
//! This crate defines the "language" the bridge speaks with the remote
//! registration service:
//!
//! - **Types** ([`PlayerIdentity`], [`UserInfo`], [`LoginResult`], etc.):
//!   the domain values produced from API responses.
//! - **Wire bodies** ([`LoginRequest`], [`ErrorBody`], etc.): the exact
//!   JSON shapes sent to and received from each endpoint.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how those bodies are
//!   converted to/from bytes.
//! - **Errors** ([`ProtocolError`]): what can go wrong during
//!   encoding/decoding.
//!
//! # Architecture
//!
//! The protocol layer sits between the HTTP client (raw bytes) and the
//! command layer (player-facing outcomes). It doesn't know about HTTP or
//! chat. It only knows how to serialize and deserialize bodies.
//!
//! ```text
//! HTTP (bytes) → Protocol (typed bodies) → Bridge (chat + sessions)
//! ```

mod codec;
mod error;
mod types;
mod wire;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    DonationRank, LoginResult, PlayerIdentity, RegistrationCode,
    RegistrationStatus, UserInfo,
};
pub use wire::{
    CheckRegistrationRequest, CheckRegistrationResponse, ErrorBody,
    GenerateCodeRequest, GenerateCodeResponse, LoginRequest, LoginResponse,
};

/// Re-exported so downstream crates name player UUIDs without pulling
/// `uuid` into their own manifests.
pub use uuid::Uuid;

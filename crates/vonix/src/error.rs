//! Unified error type for the Vonix bridge.

use vonix_api::ApiError;
use vonix_host::HostError;

/// Top-level error that wraps all crate-specific errors.
///
/// When using the `vonix` crate, you deal with this single error type
/// instead of importing errors from each sub-crate. The `#[from]`
/// attribute on each wrapping variant auto-generates `From` impls, so `?`
/// converts sub-crate errors automatically.
///
/// None of these are fatal to the host. Each one is scoped to the single
/// command that produced it.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// The registration API call failed (transport, encode, decode,
    /// non-200, timeout). Wire-level errors arrive here already folded
    /// into [`ApiError`].
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The main context is gone.
    #[error(transparent)]
    Host(#[from] HostError),

    /// The command was malformed. Carries the usage line.
    #[error("Usage: {0}")]
    Usage(String),

    /// The command came from something that isn't a player.
    #[error("This command can only be used by players!")]
    NotAPlayer,

    /// Configuration could not be loaded.
    #[error("configuration: {0}")]
    Config(String),
}

//! Error types for the host layer.

/// Errors that can occur when talking to the main context.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// The main context has shut down; the job was not queued.
    #[error("main context is no longer running")]
    Unavailable,

    /// The job was queued but never produced a reply (it panicked, or the
    /// context shut down before reaching it).
    #[error("main context dropped the reply")]
    ReplyDropped,
}

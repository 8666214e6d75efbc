//! Event bridge errors.

/// Errors surfaced by the queue's registration and lifecycle operations.
///
/// The post path is deliberately infallible: nothing may throw across the
/// native boundary, so `post` reports its outcome as a
/// [`PostStatus`](crate::PostStatus) instead.
#[derive(Debug, thiserror::Error)]
pub enum EventError {
    /// Type code 0 is reserved; codes are 1-based.
    #[error("invalid event type code {code}: codes are 1-based")]
    InvalidType { code: u32 },

    /// The dispatch thread is already running.
    #[error("dispatch thread already started")]
    AlreadyStarted,

    /// The dispatch thread was never started.
    #[error("dispatch thread not running")]
    NotStarted,

    /// The OS refused to spawn the dispatch thread.
    #[error("failed to spawn dispatch thread: {0}")]
    Spawn(#[from] std::io::Error),
}

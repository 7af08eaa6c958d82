//! Error types for the wake lock controller.

/// Errors that can occur while acquiring, holding, or releasing a wake lock.
#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    /// The platform has no way to keep the display awake.
    #[error("Wake locks are not supported on this platform")]
    Unsupported,

    /// The platform refused to grant a wake lock.
    #[error("Wake lock request denied: {0}")]
    AcquireDenied(String),

    /// The platform errored while releasing a held wake lock.
    #[error("Failed to release wake lock: {0}")]
    ReleaseFailed(String),

    /// An I/O error occurred (e.g., persisting the preference).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

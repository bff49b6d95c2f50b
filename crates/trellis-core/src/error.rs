//! Error types for Trellis core systems.

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors raised by the core plumbing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// The task ID is unknown, already ran, or was already cancelled.
    #[error("Invalid or expired task ID {0}")]
    InvalidTask(u64),
}

//! Error types for Horizon Select core.

/// A specialized Result type for core operations.
pub type Result<T> = std::result::Result<T, TimerError>;

/// Timer-specific errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimerError {
    /// The timer ID is invalid, has already fired, or was stopped.
    #[error("Invalid or expired timer ID")]
    InvalidTimerId,
}

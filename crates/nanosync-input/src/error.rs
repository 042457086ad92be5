//! Input error types.

use thiserror::Error;

/// Key injection error type.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("Failed to create virtual keyboard: {0}")]
    Create(#[source] std::io::Error),

    #[error("Failed to write key events: {0}")]
    Write(#[source] std::io::Error),
}

impl From<InputError> for nanosync_core::Error {
    fn from(e: InputError) -> Self {
        Self::Input(e.to_string())
    }
}

/// Result type for input operations.
pub type InputResult<T> = Result<T, InputError>;

//! PulseAudio backend error types.

use thiserror::Error;

/// Audio backend error type.
#[derive(Debug, Error)]
pub enum PulseError {
    #[error("Failed to run pactl: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("pactl {command} failed: {stderr}")]
    CommandFailed { command: String, stderr: String },

    #[error("Unexpected pactl output: {0}")]
    Parse(String),

    #[error("Endpoint not listed: {0}")]
    EndpointNotFound(String),

    #[error("pactl subscribe exited")]
    MonitorExited,
}

impl From<PulseError> for nanosync_core::Error {
    fn from(e: PulseError) -> Self {
        Self::Audio(e.to_string())
    }
}

/// Result type for audio backend operations.
pub type PulseResult<T> = Result<T, PulseError>;

//! Error types for nanosync core.

use thiserror::Error;

/// Structural mismatch while decoding a scene frame.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    #[error("Unexpected {field}: expected {expected:#04x}, found {found:#04x}")]
    BadMarker { field: &'static str, expected: u8, found: u8 },

    #[error("Vendor tag mismatch: {found:02x?}")]
    BadTag { found: Vec<u8> },

    #[error("Frame truncated reading {field}: need {needed} byte(s) at offset {offset}, {available} left")]
    Truncated { field: &'static str, offset: usize, needed: usize, available: usize },

    #[error("{0} trailing byte(s) after scene layout")]
    TrailingBytes(usize),
}

/// Core error type for nanosync operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid scene message: {0}")]
    InvalidSceneMessage(#[from] FrameError),

    #[error("No device answered the scene request after {attempts} attempt(s)")]
    NoDevice { attempts: u32 },

    #[error("Control not found: {0}")]
    ControlNotFound(String),

    #[error("Value {value} outside of range {min}..={max}")]
    OutOfRange { value: f32, min: f32, max: f32 },

    #[error("Device transport error: {0}")]
    Transport(String),

    #[error("Audio subsystem error: {0}")]
    Audio(String),

    #[error("Key injection error: {0}")]
    Input(String),
}

/// Result type alias for nanosync core operations.
pub type Result<T> = std::result::Result<T, Error>;

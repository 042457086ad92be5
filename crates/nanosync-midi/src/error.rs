//! MIDI error types.

use thiserror::Error;

/// MIDI transport error type.
#[derive(Debug, Error)]
pub enum MidiError {
    #[error("No MIDI {direction} port matching '{pattern}'")]
    PortNotFound { direction: &'static str, pattern: String },

    #[error("MIDI init error: {0}")]
    Init(#[from] midir::InitError),

    #[error("MIDI port info error: {0}")]
    PortInfo(#[from] midir::PortInfoError),

    #[error("MIDI connect error: {0}")]
    Connect(String),

    #[error("MIDI send error: {0}")]
    Send(#[from] midir::SendError),
}

impl From<midir::ConnectError<midir::MidiInput>> for MidiError {
    fn from(e: midir::ConnectError<midir::MidiInput>) -> Self {
        Self::Connect(format!("input: {e}"))
    }
}

impl From<midir::ConnectError<midir::MidiOutput>> for MidiError {
    fn from(e: midir::ConnectError<midir::MidiOutput>) -> Self {
        Self::Connect(format!("output: {e}"))
    }
}

impl From<MidiError> for nanosync_core::Error {
    fn from(e: MidiError) -> Self {
        Self::Transport(e.to_string())
    }
}

/// Result type for MIDI operations.
pub type MidiResult<T> = Result<T, MidiError>;

//! nanosync Pulse - Audio server integration.
//!
//! Controls the default sink and source and watches for changes with the
//! `pactl` CLI, so it works with PulseAudio and with pipewire-pulse alike.

pub mod backend;
pub mod error;
pub mod monitor;
pub mod pactl;

pub use backend::PulseAudio;
pub use error::{PulseError, PulseResult};
pub use pactl::Pactl;

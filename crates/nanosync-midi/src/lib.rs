//! nanosync MIDI - Control surface transport.
//!
//! Connects to the nanoKONTROL2 through the host MIDI stack (ALSA on
//! Linux) and adapts it to [`nanosync_core::DeviceTransport`].

pub mod error;
pub mod port;
pub mod transport;

pub use error::{MidiError, MidiResult};
pub use port::{DEFAULT_PORT_PATTERN, list_input_ports};
pub use transport::MidiTransport;

//! Control surface port discovery.

use midir::{MidiInput, MidiInputPort, MidiOutput, MidiOutputPort};
use tracing::debug;

use crate::error::{MidiError, MidiResult};

/// Port name fragment of the factory nanoKONTROL2 ports.
pub const DEFAULT_PORT_PATTERN: &str = "nanoKONTROL2";

/// Find the first input port whose name contains `pattern`.
///
/// # Errors
/// Returns [`MidiError::PortNotFound`] if no port matches.
pub fn find_input_port(midi_in: &MidiInput, pattern: &str) -> MidiResult<(MidiInputPort, String)> {
    for port in midi_in.ports() {
        let Ok(name) = midi_in.port_name(&port) else {
            continue;
        };
        if name.contains(pattern) {
            debug!(port = %name, "Found MIDI input port");
            return Ok((port, name));
        }
    }

    Err(MidiError::PortNotFound { direction: "input", pattern: pattern.to_string() })
}

/// Find the first output port whose name contains `pattern`.
///
/// # Errors
/// Returns [`MidiError::PortNotFound`] if no port matches.
pub fn find_output_port(midi_out: &MidiOutput, pattern: &str) -> MidiResult<(MidiOutputPort, String)> {
    for port in midi_out.ports() {
        let Ok(name) = midi_out.port_name(&port) else {
            continue;
        };
        if name.contains(pattern) {
            debug!(port = %name, "Found MIDI output port");
            return Ok((port, name));
        }
    }

    Err(MidiError::PortNotFound { direction: "output", pattern: pattern.to_string() })
}

/// Names of all input ports, for diagnostics.
///
/// # Errors
/// Returns an error if the MIDI client cannot be created.
pub fn list_input_ports() -> MidiResult<Vec<String>> {
    let midi_in = MidiInput::new("nanosync-list")?;
    Ok(midi_in.ports().iter().filter_map(|port| midi_in.port_name(port).ok()).collect())
}

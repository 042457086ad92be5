//! midir-backed device transport.

use midir::{Ignore, MidiInput, MidiInputConnection, MidiOutput, MidiOutputConnection};
use nanosync_core::{DeviceInbox, DeviceMessage, DeviceTransport};
use tracing::{info, trace};

use crate::error::{MidiError, MidiResult};
use crate::port::{find_input_port, find_output_port};

const CLIENT_NAME: &str = "nanosync";

/// Open connection to the control surface.
///
/// Input arrives on midir's callback thread and is handed to the
/// [`DeviceInbox`]. Dropping the transport closes both ports.
pub struct MidiTransport {
    _input: MidiInputConnection<()>,
    output: MidiOutputConnection,
    port_name: String,
}

impl MidiTransport {
    /// Connect to the first input and output ports matching `pattern`.
    ///
    /// # Errors
    /// Returns an error if no matching port exists or a connection fails.
    pub fn open(pattern: &str, inbox: DeviceInbox) -> MidiResult<Self> {
        let mut midi_in = MidiInput::new(CLIENT_NAME)?;
        // Scene dumps arrive as SysEx, which midir filters by default.
        midi_in.ignore(Ignore::None);
        let midi_out = MidiOutput::new(CLIENT_NAME)?;

        let (in_port, port_name) = find_input_port(&midi_in, pattern)?;
        let (out_port, out_name) = find_output_port(&midi_out, pattern)?;

        let input = midi_in.connect(
            &in_port,
            "nanosync-in",
            move |_stamp, message, _| {
                trace!(len = message.len(), "MIDI input");
                inbox.deliver_raw(message);
            },
            (),
        )?;
        let output = midi_out.connect(&out_port, "nanosync-out")?;

        info!(input = %port_name, output = %out_name, "Control surface connected");

        Ok(Self { _input: input, output, port_name })
    }

    /// Name of the connected input port.
    #[must_use]
    pub fn port_name(&self) -> &str {
        &self.port_name
    }
}

impl DeviceTransport for MidiTransport {
    fn send(&mut self, message: &DeviceMessage) -> nanosync_core::Result<()> {
        let bytes = message.to_bytes();
        trace!(?bytes, "MIDI output");
        self.output.send(&bytes).map_err(MidiError::from)?;
        Ok(())
    }
}

//! [`AudioSubsystem`] implementation on top of `pactl`.

use crossbeam_channel::{Receiver, select};
use nanosync_core::{AudioEvent, AudioSubsystem, Endpoint, EndpointState, Interrupter, Wakeup};

use crate::error::PulseError;
use crate::monitor::SubscribeMonitor;
use crate::pactl::Pactl;

/// Default sink and source control through the PulseAudio CLI.
pub struct PulseAudio {
    pactl: Pactl,
    events: Receiver<AudioEvent>,
    interrupter: Interrupter,
    interrupted: Receiver<()>,
    _monitor: SubscribeMonitor,
}

impl PulseAudio {
    /// Connect using `pactl` from `PATH`.
    ///
    /// # Errors
    /// Returns an error if the server cannot be reached.
    pub fn connect() -> nanosync_core::Result<Self> {
        Self::with_pactl(Pactl::default())
    }

    /// Connect through a specific pactl wrapper.
    ///
    /// # Errors
    /// Returns an error if the server cannot be reached or the event
    /// subscription fails to start.
    pub fn with_pactl(pactl: Pactl) -> nanosync_core::Result<Self> {
        // Fail early when no server answers.
        pactl.default_name(Endpoint::Sink)?;

        let (monitor, events) = SubscribeMonitor::spawn(pactl.program())?;
        let (interrupter, interrupted) = Interrupter::channel();

        Ok(Self { pactl, events, interrupter, interrupted, _monitor: monitor })
    }
}

impl AudioSubsystem for PulseAudio {
    fn interrupter(&self) -> Interrupter {
        self.interrupter.clone()
    }

    fn wait_for_event(&mut self) -> nanosync_core::Result<Wakeup> {
        select! {
            recv(self.events) -> event => {
                let event = event.map_err(|_| PulseError::MonitorExited)?;
                Ok(Wakeup::Event(event))
            }
            recv(self.interrupted) -> _ => Ok(Wakeup::Interrupted),
        }
    }

    fn endpoint_state(&mut self, endpoint: Endpoint) -> nanosync_core::Result<EndpointState> {
        Ok(self.pactl.endpoint_state(endpoint)?)
    }

    fn set_mute(&mut self, endpoint: Endpoint, muted: bool) -> nanosync_core::Result<()> {
        Ok(self.pactl.set_mute(endpoint, muted)?)
    }

    fn set_volume(&mut self, endpoint: Endpoint, volume: f32) -> nanosync_core::Result<()> {
        Ok(self.pactl.set_volume(endpoint, volume)?)
    }
}

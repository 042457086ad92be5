//! Audio subsystem seam.

use crossbeam_channel::{Receiver, Sender, TrySendError, bounded};
use tracing::debug;

use crate::error::Result;
use crate::message::AudioEvent;

/// Default playback or capture endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Sink,
    Source,
}

/// Snapshot of a default endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndpointState {
    /// Server-side index, matched against [`AudioEvent::index`]
    pub index: u32,
    pub muted: bool,
}

/// Why [`AudioSubsystem::wait_for_event`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wakeup {
    /// The audio server reported a change
    Event(AudioEvent),
    /// Another context asked the wait to return early
    Interrupted,
}

/// Cooperative stop-and-return request for a blocking audio wait.
///
/// Requests coalesce: any number of interrupts before the next wait wake it
/// exactly once.
#[derive(Clone, Debug)]
pub struct Interrupter {
    tx: Sender<()>,
}

impl Interrupter {
    /// Create an interrupter and the receiver the waiting side selects on.
    #[must_use]
    pub fn channel() -> (Self, Receiver<()>) {
        let (tx, rx) = bounded(1);
        (Self { tx }, rx)
    }

    /// Ask the current or next wait to return.
    pub fn interrupt(&self) {
        match self.tx.try_send(()) {
            Ok(()) | Err(TrySendError::Full(())) => {}
            Err(TrySendError::Disconnected(())) => {
                debug!("Interrupt requested after the audio wait went away");
            }
        }
    }
}

/// Host audio server as seen by the coordinator.
pub trait AudioSubsystem {
    /// Handle other contexts use to interrupt [`Self::wait_for_event`].
    fn interrupter(&self) -> Interrupter;

    /// Block until the server reports a change or an interrupt arrives.
    ///
    /// # Errors
    /// Returns [`crate::Error::Audio`] if the notification source is gone.
    fn wait_for_event(&mut self) -> Result<Wakeup>;

    /// Current state of the default sink or source.
    ///
    /// # Errors
    /// Returns [`crate::Error::Audio`] if the server cannot be queried.
    fn endpoint_state(&mut self, endpoint: Endpoint) -> Result<EndpointState>;

    /// Mute or unmute the default sink or source.
    ///
    /// # Errors
    /// Returns [`crate::Error::Audio`] if the server rejects the change.
    fn set_mute(&mut self, endpoint: Endpoint, muted: bool) -> Result<()>;

    /// Set the volume of the default sink or source (0.0 - 1.0).
    ///
    /// # Errors
    /// Returns [`crate::Error::Audio`] if the server rejects the change.
    fn set_volume(&mut self, endpoint: Endpoint, volume: f32) -> Result<()>;
}

//! Control surface transport seam.

use tracing::trace;

use crate::audio::Interrupter;
use crate::error::Result;
use crate::message::{DeviceMessage, QueuedEvent};
use crate::queue::EventQueue;

/// Outgoing half of the control surface connection.
///
/// Incoming messages are pushed by the transport's own input context
/// through a [`DeviceInbox`].
#[cfg_attr(test, mockall::automock)]
pub trait DeviceTransport {
    /// Send one message to the device.
    ///
    /// # Errors
    /// Returns [`crate::Error::Transport`] if the message cannot be written.
    fn send(&mut self, message: &DeviceMessage) -> Result<()>;
}

/// Delivery point for messages read from the device.
///
/// Every delivery is queued, then the audio wait is interrupted so the
/// coordinator drains promptly.
#[derive(Clone, Debug)]
pub struct DeviceInbox {
    queue: EventQueue,
    interrupter: Interrupter,
}

impl DeviceInbox {
    #[must_use]
    pub fn new(queue: EventQueue, interrupter: Interrupter) -> Self {
        Self { queue, interrupter }
    }

    /// Queue a parsed message and wake the coordinator.
    pub fn deliver(&self, message: DeviceMessage) {
        trace!(?message, "Device message queued");
        self.queue.push(QueuedEvent::Device(message));
        self.interrupter.interrupt();
    }

    /// Parse raw MIDI bytes and deliver them. Empty buffers are dropped.
    pub fn deliver_raw(&self, bytes: &[u8]) {
        if let Some(message) = DeviceMessage::from_bytes(bytes) {
            self.deliver(message);
        }
    }
}

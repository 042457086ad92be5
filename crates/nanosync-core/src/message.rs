//! Messages flowing through the coordinator queue.

use crate::control::ControlEvent;

const SYSEX_START: u8 = 0xf0;
const SYSEX_END: u8 = 0xf7;
const CONTROL_CHANGE: u8 = 0xb0;

/// A message exchanged with the control surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceMessage {
    /// Control change on a 0-based MIDI channel
    ControlChange { channel: u8, control: u8, value: u8 },
    /// System exclusive body, without the `F0`/`F7` framing
    SysEx(Vec<u8>),
    /// Anything else the surface may emit
    Other(Vec<u8>),
}

impl DeviceMessage {
    /// Control change with channel, control and value clamped to MIDI ranges.
    #[must_use]
    pub fn control_change(channel: u8, control: u8, value: u8) -> Self {
        Self::ControlChange { channel: channel.min(15), control: control & 0x7f, value: value & 0x7f }
    }

    /// Parse one raw MIDI message. Returns `None` for an empty buffer.
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let (&status, rest) = bytes.split_first()?;

        if status == SYSEX_START {
            let body = rest.strip_suffix(&[SYSEX_END]).unwrap_or(rest);
            return Some(Self::SysEx(body.to_vec()));
        }

        match (status & 0xf0, rest) {
            (CONTROL_CHANGE, [control, value, ..]) => Some(Self::ControlChange {
                channel: status & 0x0f,
                control: *control,
                value: *value,
            }),
            _ => Some(Self::Other(bytes.to_vec())),
        }
    }

    /// Serialize to raw MIDI bytes, adding SysEx framing where needed.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Self::ControlChange { channel, control, value } => {
                vec![CONTROL_CHANGE | (channel & 0x0f), control & 0x7f, value & 0x7f]
            }
            Self::SysEx(body) => {
                let mut out = Vec::with_capacity(body.len() + 2);
                out.push(SYSEX_START);
                out.extend_from_slice(body);
                out.push(SYSEX_END);
                out
            }
            Self::Other(bytes) => bytes.clone(),
        }
    }
}

/// Audio server object class a notification refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Facility {
    Sink,
    Source,
    Other,
}

/// What happened to the object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioEventKind {
    New,
    Change,
    Remove,
}

/// Notification from the audio subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioEvent {
    pub kind: AudioEventKind,
    pub facility: Facility,
    /// Server-side index of the object
    pub index: u32,
}

/// One entry of the coordinator queue.
#[derive(Debug, Clone, PartialEq)]
pub enum QueuedEvent {
    /// Delivered by the device input context
    Device(DeviceMessage),
    /// Delivered by the audio notification context
    Audio(AudioEvent),
    /// Synthesized higher-level control event
    Control(ControlEvent),
}

//! Control map derived from a scene dump.
//!
//! Every physical control gets a [`ControlSpec`] with a stable logical name
//! (`slider-group-0`, `transport-play`, ...) and the MIDI address the scene
//! assigns to it. The map answers both directions: by name for outgoing LED
//! commands, by `(channel, control)` for incoming control changes.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::scene::{ControlParams, GroupControl, SceneDump, TransportAction};

/// Shape of a physical control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlKind {
    /// Slider or knob sending a continuous value
    Variable,
    /// Button sending off/on values
    Button,
}

/// Addressable description of one physical control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlSpec {
    /// Logical name, e.g. `mute-group-3`
    pub name: String,
    /// Resolved 0-based MIDI channel
    pub channel: u8,
    /// MIDI control number
    pub control: u8,
    pub kind: ControlKind,
    /// Whether the control has an LED the host can drive
    pub led: bool,
}

impl ControlSpec {
    /// `(channel, control)` address of the spec.
    #[must_use]
    pub fn address(&self) -> (u8, u8) {
        (self.channel, self.control)
    }
}

/// A control change resolved against the map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlEvent {
    pub spec: ControlSpec,
    /// Observed value (0-127)
    pub value: u8,
}

/// Name of a group control, e.g. `knob-group-4`.
#[must_use]
pub fn group_control_name(control: GroupControl, group: usize) -> String {
    format!("{}-group-{group}", control.name())
}

/// Name of a transport control, e.g. `transport-play`.
#[must_use]
pub fn transport_control_name(action: TransportAction) -> String {
    format!("transport-{}", action.name())
}

/// Bidirectional lookup over every control of a scene.
#[derive(Debug, Clone, Default)]
pub struct ControlMap {
    /// Specs in insertion order
    specs: Vec<ControlSpec>,
    by_name: HashMap<String, usize>,
    by_address: HashMap<(u8, u8), usize>,
}

impl ControlMap {
    /// Build the map for a decoded scene.
    ///
    /// Groups come first in slider/knob/solo/mute/rec order, then the
    /// transport buttons. If two controls share an address the later one
    /// wins the address lookup.
    #[must_use]
    pub fn build(scene: &SceneDump) -> Self {
        let mut map = Self::default();

        for (index, group) in scene.groups.iter().enumerate() {
            let channel = scene.resolve_channel(group.midi_channel);

            for control in GroupControl::ALL {
                let params = group.control(control);
                let kind = match params {
                    ControlParams::Variable(_) => ControlKind::Variable,
                    ControlParams::Button(_) => ControlKind::Button,
                };
                map.insert(ControlSpec {
                    name: group_control_name(control, index),
                    channel,
                    control: params.control_number(),
                    kind,
                    led: kind == ControlKind::Button,
                });
            }
        }

        let channel = scene.resolve_channel(scene.transport.midi_channel);
        for action in TransportAction::ALL {
            map.insert(ControlSpec {
                name: transport_control_name(action),
                channel,
                control: scene.transport.button(action).control_number,
                kind: ControlKind::Button,
                led: false,
            });
        }

        debug!(controls = map.len(), addresses = map.address_count(), "Control map built");
        map
    }

    fn insert(&mut self, spec: ControlSpec) {
        let slot = self.specs.len();
        let address = spec.address();

        if let Some(previous) = self.by_address.insert(address, slot) {
            warn!(
                channel = address.0,
                control = address.1,
                replaced = %self.specs[previous].name,
                by = %spec.name,
                "Two controls share a MIDI address"
            );
        }
        self.by_name.insert(spec.name.clone(), slot);
        self.specs.push(spec);
    }

    /// Get a control by logical name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ControlSpec> {
        self.by_name.get(name).map(|&slot| &self.specs[slot])
    }

    /// Classify an incoming control change address.
    #[must_use]
    pub fn lookup(&self, channel: u8, control: u8) -> Option<&ControlSpec> {
        self.by_address.get(&(channel, control)).map(|&slot| &self.specs[slot])
    }

    /// Iterate controls in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &ControlSpec> {
        self.specs.iter()
    }

    /// Iterate controls that carry an LED, in insertion order.
    pub fn leds(&self) -> impl Iterator<Item = &ControlSpec> {
        self.specs.iter().filter(|spec| spec.led)
    }

    /// Number of named controls.
    #[must_use]
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Number of distinct `(channel, control)` addresses.
    #[must_use]
    pub fn address_count(&self) -> usize {
        self.by_address.len()
    }
}

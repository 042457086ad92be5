//! Audio actions bound to named controls.
//!
//! Bindings are keyed by control name so they survive scene changes that
//! move a control to a different MIDI address.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::audio::Endpoint;
use crate::keys::KeyName;

/// What a control does when it moves.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ControlAction {
    /// Flip the default sink mute when the button is released
    ToggleSinkMute,
    /// Flip the default source mute when the button is released
    ToggleSourceMute,
    /// Follow the control value with the default sink volume
    SinkVolume,
    /// Follow the control value with the default source volume
    SourceVolume,
    /// Hold keys down while the button is pressed (value 127)
    Key(Vec<KeyName>),
}

impl ControlAction {
    /// Endpoint the action applies to, if it is an audio action.
    #[must_use]
    pub fn endpoint(&self) -> Option<Endpoint> {
        match self {
            Self::ToggleSinkMute | Self::SinkVolume => Some(Endpoint::Sink),
            Self::ToggleSourceMute | Self::SourceVolume => Some(Endpoint::Source),
            Self::Key(_) => None,
        }
    }
}

/// Control name to action table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Bindings(HashMap<String, ControlAction>);

impl Bindings {
    #[must_use]
    pub fn new(bindings: HashMap<String, ControlAction>) -> Self {
        Self(bindings)
    }

    /// Action bound to a control, if any.
    #[must_use]
    pub fn action_for(&self, control: &str) -> Option<&ControlAction> {
        self.0.get(control)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Control names with a binding.
    pub fn controls(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl Default for Bindings {
    /// First fader group drives playback, second drives capture. Transport
    /// buttons send media keys; the marker buttons send Meta shortcuts.
    fn default() -> Self {
        let key = |keys: &[KeyName]| ControlAction::Key(keys.to_vec());

        Self(HashMap::from([
            ("mute-group-0".to_string(), ControlAction::ToggleSinkMute),
            ("mute-group-1".to_string(), ControlAction::ToggleSourceMute),
            ("slider-group-0".to_string(), ControlAction::SinkVolume),
            ("slider-group-1".to_string(), ControlAction::SourceVolume),
            ("transport-stop".to_string(), key(&[KeyName::Stop])),
            ("transport-play".to_string(), key(&[KeyName::Play])),
            ("transport-prev_track".to_string(), key(&[KeyName::PreviousSong])),
            ("transport-next_track".to_string(), key(&[KeyName::NextSong])),
            ("transport-marker_set".to_string(), key(&[KeyName::LeftMeta, KeyName::Home])),
            ("transport-prev_marker".to_string(), key(&[KeyName::LeftMeta, KeyName::PageUp])),
            ("transport-next_marker".to_string(), key(&[KeyName::LeftMeta, KeyName::PageDown])),
        ]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bindings() {
        let bindings = Bindings::default();
        assert_eq!(bindings.len(), 11);
        assert_eq!(bindings.action_for("mute-group-0"), Some(&ControlAction::ToggleSinkMute));
        assert_eq!(bindings.action_for("slider-group-1"), Some(&ControlAction::SourceVolume));
        assert_eq!(bindings.action_for("transport-play"), Some(&ControlAction::Key(vec![KeyName::Play])));
        assert_eq!(
            bindings.action_for("transport-next_marker"),
            Some(&ControlAction::Key(vec![KeyName::LeftMeta, KeyName::PageDown]))
        );
        assert_eq!(bindings.action_for("transport-cycle"), None);
    }

    #[test]
    fn test_action_endpoints() {
        assert_eq!(ControlAction::ToggleSinkMute.endpoint(), Some(Endpoint::Sink));
        assert_eq!(ControlAction::SourceVolume.endpoint(), Some(Endpoint::Source));
        assert_eq!(ControlAction::Key(vec![KeyName::Stop]).endpoint(), None);
    }

    #[test]
    fn test_bindings_from_toml() {
        let bindings: Bindings = toml::from_str(
            r#"
"mute-group-2" = "toggle-sink-mute"
"transport-cycle" = { key = ["left-ctrl", "space"] }
"#,
        )
        .unwrap();

        assert_eq!(bindings.action_for("mute-group-2"), Some(&ControlAction::ToggleSinkMute));
        assert_eq!(
            bindings.action_for("transport-cycle"),
            Some(&ControlAction::Key(vec![KeyName::LeftCtrl, KeyName::Space]))
        );
    }
}

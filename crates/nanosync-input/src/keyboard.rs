//! uinput virtual keyboard.

use evdev::uinput::{VirtualDevice, VirtualDeviceBuilder};
use evdev::{AttributeSet, EventType, InputEvent, Key};
use nanosync_core::{KeyInjector, KeyName};
use tracing::{debug, info};

use crate::error::{InputError, InputResult};

/// Name the virtual keyboard registers under.
pub const VIRTUAL_KEYBOARD_NAME: &str = "nanosync virtual keyboard";

const KEY_PRESSED: i32 = 1;
const KEY_RELEASED: i32 = 0;

/// evdev key code for a bindable key.
#[must_use]
pub fn evdev_key(key: KeyName) -> Key {
    match key {
        KeyName::Play => Key::KEY_PLAY,
        KeyName::PlayPause => Key::KEY_PLAYPAUSE,
        KeyName::Stop => Key::KEY_STOP,
        KeyName::PreviousSong => Key::KEY_PREVIOUSSONG,
        KeyName::NextSong => Key::KEY_NEXTSONG,
        KeyName::Record => Key::KEY_RECORD,
        KeyName::Rewind => Key::KEY_REWIND,
        KeyName::FastForward => Key::KEY_FASTFORWARD,
        KeyName::Mute => Key::KEY_MUTE,
        KeyName::VolumeUp => Key::KEY_VOLUMEUP,
        KeyName::VolumeDown => Key::KEY_VOLUMEDOWN,
        KeyName::LeftMeta => Key::KEY_LEFTMETA,
        KeyName::LeftCtrl => Key::KEY_LEFTCTRL,
        KeyName::LeftShift => Key::KEY_LEFTSHIFT,
        KeyName::LeftAlt => Key::KEY_LEFTALT,
        KeyName::Home => Key::KEY_HOME,
        KeyName::End => Key::KEY_END,
        KeyName::PageUp => Key::KEY_PAGEUP,
        KeyName::PageDown => Key::KEY_PAGEDOWN,
        KeyName::Left => Key::KEY_LEFT,
        KeyName::Right => Key::KEY_RIGHT,
        KeyName::Up => Key::KEY_UP,
        KeyName::Down => Key::KEY_DOWN,
        KeyName::Space => Key::KEY_SPACE,
    }
}

/// Key events for one press or release of `keys`, in binding order.
fn key_events(keys: &[KeyName], pressed: bool) -> Vec<InputEvent> {
    let value = if pressed { KEY_PRESSED } else { KEY_RELEASED };
    keys.iter()
        .map(|&key| InputEvent::new(EventType::KEY, evdev_key(key).code(), value))
        .collect()
}

/// Virtual keyboard able to send every [`KeyName`].
pub struct VirtualKeyboard {
    device: VirtualDevice,
}

impl VirtualKeyboard {
    /// Register the virtual keyboard with uinput.
    ///
    /// # Errors
    /// Fails if `/dev/uinput` cannot be opened, usually for lack of
    /// permission.
    pub fn create() -> InputResult<Self> {
        let mut keys = AttributeSet::<Key>::new();
        for key in KeyName::ALL {
            keys.insert(evdev_key(key));
        }

        let device = VirtualDeviceBuilder::new()
            .and_then(|builder| builder.name(VIRTUAL_KEYBOARD_NAME).with_keys(&keys))
            .and_then(VirtualDeviceBuilder::build)
            .map_err(InputError::Create)?;

        info!(name = VIRTUAL_KEYBOARD_NAME, "Virtual keyboard created");
        Ok(Self { device })
    }
}

impl KeyInjector for VirtualKeyboard {
    fn send_keys(&mut self, keys: &[KeyName], pressed: bool) -> nanosync_core::Result<()> {
        debug!(?keys, pressed, "Injecting keys");
        // emit() appends the SYN_REPORT.
        self.device
            .emit(&key_events(keys, pressed))
            .map_err(InputError::Write)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_every_key_has_distinct_code() {
        let codes: HashSet<u16> = KeyName::ALL.iter().map(|&key| evdev_key(key).code()).collect();
        assert_eq!(codes.len(), KeyName::ALL.len());
    }

    #[test]
    fn test_transport_keys() {
        assert_eq!(evdev_key(KeyName::Stop), Key::KEY_STOP);
        assert_eq!(evdev_key(KeyName::Play), Key::KEY_PLAY);
        assert_eq!(evdev_key(KeyName::PreviousSong), Key::KEY_PREVIOUSSONG);
        assert_eq!(evdev_key(KeyName::NextSong), Key::KEY_NEXTSONG);
    }

    #[test]
    fn test_chord_events_keep_binding_order() {
        let events = key_events(&[KeyName::LeftMeta, KeyName::PageUp], true);

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].code(), Key::KEY_LEFTMETA.code());
        assert_eq!(events[1].code(), Key::KEY_PAGEUP.code());
        assert!(events.iter().all(|event| event.event_type() == EventType::KEY && event.value() == KEY_PRESSED));
    }

    #[test]
    fn test_release_events() {
        let events = key_events(&[KeyName::Stop], false);
        assert_eq!(events[0].value(), KEY_RELEASED);
    }
}

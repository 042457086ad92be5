//! Synthetic key events.
//!
//! Transport buttons can be bound to keys so media players and desktop
//! shortcuts react to them. Injection happens behind [`KeyInjector`].

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::Result;

/// Keys a control can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KeyName {
    Play,
    PlayPause,
    Stop,
    PreviousSong,
    NextSong,
    Record,
    Rewind,
    FastForward,
    Mute,
    VolumeUp,
    VolumeDown,
    LeftMeta,
    LeftCtrl,
    LeftShift,
    LeftAlt,
    Home,
    End,
    PageUp,
    PageDown,
    Left,
    Right,
    Up,
    Down,
    Space,
}

impl KeyName {
    /// Every supported key.
    pub const ALL: [Self; 24] = [
        Self::Play,
        Self::PlayPause,
        Self::Stop,
        Self::PreviousSong,
        Self::NextSong,
        Self::Record,
        Self::Rewind,
        Self::FastForward,
        Self::Mute,
        Self::VolumeUp,
        Self::VolumeDown,
        Self::LeftMeta,
        Self::LeftCtrl,
        Self::LeftShift,
        Self::LeftAlt,
        Self::Home,
        Self::End,
        Self::PageUp,
        Self::PageDown,
        Self::Left,
        Self::Right,
        Self::Up,
        Self::Down,
        Self::Space,
    ];
}

/// Sink for synthetic key presses.
#[cfg_attr(test, mockall::automock)]
pub trait KeyInjector {
    /// Press or release `keys` in order, then flush them as one report.
    ///
    /// # Errors
    /// Returns [`crate::Error::Input`] if the events cannot be written.
    fn send_keys(&mut self, keys: &[KeyName], pressed: bool) -> Result<()>;
}

impl<K: KeyInjector + ?Sized> KeyInjector for Box<K> {
    fn send_keys(&mut self, keys: &[KeyName], pressed: bool) -> Result<()> {
        (**self).send_keys(keys, pressed)
    }
}

/// Injector used when no virtual keyboard is available. Drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoKeys;

impl KeyInjector for NoKeys {
    fn send_keys(&mut self, keys: &[KeyName], pressed: bool) -> Result<()> {
        trace!(?keys, pressed, "Key injection disabled, dropping keys");
        Ok(())
    }
}

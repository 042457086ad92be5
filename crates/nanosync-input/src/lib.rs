//! nanosync input - Key injection.
//!
//! Registers a uinput virtual keyboard and adapts it to
//! [`nanosync_core::KeyInjector`], so bound buttons can send media keys and
//! desktop shortcuts.

pub mod error;
pub mod keyboard;

pub use error::{InputError, InputResult};
pub use keyboard::{VIRTUAL_KEYBOARD_NAME, VirtualKeyboard, evdev_key};

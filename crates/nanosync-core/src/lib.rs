//! nanosync Core - Scene codec, control map and event coordination.
//!
//! This crate holds the device protocol and the coordinator. The MIDI
//! transport, the audio backend and key injection plug in through
//! [`DeviceTransport`], [`AudioSubsystem`] and [`KeyInjector`].

pub mod action;
pub mod audio;
pub mod codec;
pub mod control;
pub mod coordinator;
pub mod error;
pub mod keys;
pub mod message;
pub mod queue;
pub mod scale;
pub mod scene;
pub mod transport;

pub use action::{Bindings, ControlAction};
pub use audio::{AudioSubsystem, Endpoint, EndpointState, Interrupter, Wakeup};
pub use control::{ControlEvent, ControlKind, ControlMap, ControlSpec};
pub use coordinator::{Coordinator, CoordinatorConfig, DiscoveryConfig, Phase, ShutdownHandle};
pub use error::{Error, FrameError, Result};
pub use keys::{KeyInjector, KeyName, NoKeys};
pub use message::{AudioEvent, AudioEventKind, DeviceMessage, Facility, QueuedEvent};
pub use queue::EventQueue;
pub use scale::Scaler;
pub use scene::{SceneDump, parse_scene_message, scene_request};
pub use transport::{DeviceInbox, DeviceTransport};

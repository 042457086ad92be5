//! Event coordinator.
//!
//! Owns the scene, the control map and both collaborators. It runs on a
//! single thread: discovery first, then the LED self-test, then the main
//! loop that alternates between a blocking audio wait and draining the
//! shared queue. Device input lands in the queue from the transport's own
//! context and interrupts the audio wait.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::sleep;
use std::time::Duration;

use tracing::{debug, info, trace, warn};

use crate::action::{Bindings, ControlAction};
use crate::audio::{AudioSubsystem, Endpoint, Interrupter, Wakeup};
use crate::control::{ControlEvent, ControlMap};
use crate::error::{Error, Result};
use crate::keys::KeyInjector;
use crate::message::{AudioEvent, DeviceMessage, Facility, QueuedEvent};
use crate::queue::EventQueue;
use crate::scale::Scaler;
use crate::scene::{SceneDump, parse_scene_message, scene_request};
use crate::transport::DeviceTransport;

const LED_ON: u8 = 127;
const LED_OFF: u8 = 0;
/// Control value that holds bound keys down.
const KEY_DOWN: u8 = 127;

/// Bounds of the scene discovery handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscoveryConfig {
    /// Number of scene requests sent before giving up
    pub retries: u32,
    /// Queue polls per request
    pub polls_per_attempt: u32,
    /// Maximum wait of a single poll
    pub poll_interval: Duration,
    /// Channel encoded into the scene request
    pub request_channel: u8,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            retries: 5,
            polls_per_attempt: 20,
            poll_interval: Duration::from_millis(50),
            request_channel: 0,
        }
    }
}

/// Coordinator settings.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinatorConfig {
    pub discovery: DiscoveryConfig,
    /// Pause after each LED command of the self-test
    pub led_test_delay: Duration,
    /// Control whose LED mirrors the default sink mute
    pub sink_mute_led: Option<String>,
    /// Control whose LED mirrors the default source mute
    pub source_mute_led: Option<String>,
    pub bindings: Bindings,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            discovery: DiscoveryConfig::default(),
            led_test_delay: Duration::from_millis(10),
            sink_mute_led: Some("mute-group-0".to_string()),
            source_mute_led: Some("mute-group-1".to_string()),
            bindings: Bindings::default(),
        }
    }
}

/// Lifecycle of the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// No scene known
    #[default]
    Idle,
    /// Scene request sent, waiting for the dump
    AwaitingSceneDump,
    /// Control map built, dispatching events
    Ready,
}

/// Requests the main loop to stop after its current drain.
#[derive(Clone, Debug)]
pub struct ShutdownHandle {
    requested: Arc<AtomicBool>,
    interrupter: Interrupter,
}

impl ShutdownHandle {
    fn new(interrupter: Interrupter) -> Self {
        Self { requested: Arc::new(AtomicBool::new(false)), interrupter }
    }

    /// Flag the shutdown and wake the audio wait.
    pub fn request(&self) {
        self.requested.store(true, Ordering::SeqCst);
        self.interrupter.interrupt();
    }

    #[must_use]
    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }
}

/// Single-threaded coordinator between the control surface and the audio
/// subsystem.
pub struct Coordinator<T, A, K> {
    transport: T,
    audio: A,
    keys: K,
    queue: EventQueue,
    config: CoordinatorConfig,
    phase: Phase,
    scene: Option<SceneDump>,
    controls: ControlMap,
    /// Last mute state mirrored onto an LED
    mirrored: HashMap<Endpoint, bool>,
    scaler: Scaler,
    shutdown: ShutdownHandle,
}

impl<T: DeviceTransport, A: AudioSubsystem, K: KeyInjector> Coordinator<T, A, K> {
    /// Create an idle coordinator. `queue` must be the queue the transport
    /// delivers into.
    pub fn new(transport: T, audio: A, keys: K, queue: EventQueue, config: CoordinatorConfig) -> Self {
        let shutdown = ShutdownHandle::new(audio.interrupter());
        Self {
            transport,
            audio,
            keys,
            queue,
            config,
            phase: Phase::Idle,
            scene: None,
            controls: ControlMap::default(),
            mirrored: HashMap::new(),
            scaler: Scaler::midi_to_unit(),
            shutdown,
        }
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn scene(&self) -> Option<&SceneDump> {
        self.scene.as_ref()
    }

    #[must_use]
    pub fn controls(&self) -> &ControlMap {
        &self.controls
    }

    #[must_use]
    pub fn queue(&self) -> &EventQueue {
        &self.queue
    }

    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    #[must_use]
    pub fn audio(&self) -> &A {
        &self.audio
    }

    /// Handle for stopping [`Self::run`] from another context.
    #[must_use]
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.shutdown.clone()
    }

    /// Discover the scene, light the LEDs, then dispatch events until a
    /// shutdown is requested.
    ///
    /// # Errors
    /// Returns [`Error::NoDevice`] if discovery fails, or the audio
    /// subsystem error that ended the wait loop.
    pub fn run(&mut self) -> Result<()> {
        self.discover()?;

        if let Err(e) = self.led_self_test() {
            warn!(error = %e, "LED self-test failed");
        }
        self.sync_mute_leds();

        info!(controls = self.controls.len(), "Coordinator ready");

        while !self.shutdown.is_requested() {
            self.run_cycle()?;
        }

        info!("Shutdown requested, leaving event loop");
        Ok(())
    }

    /// Request the current scene and wait for a valid dump.
    ///
    /// # Errors
    /// Returns [`Error::NoDevice`] once every attempt has gone unanswered.
    pub fn discover(&mut self) -> Result<()> {
        let DiscoveryConfig { retries, polls_per_attempt, poll_interval, request_channel } =
            self.config.discovery;
        let request = DeviceMessage::SysEx(scene_request(request_channel).to_vec());

        for attempt in 1..=retries {
            self.phase = Phase::AwaitingSceneDump;
            debug!(attempt, retries, "Sending current scene dump request");
            if let Err(e) = self.transport.send(&request) {
                warn!(attempt, error = %e, "Failed to send scene request");
            }

            for _ in 0..polls_per_attempt {
                let Some(event) = self.queue.pop_timeout(poll_interval) else {
                    continue;
                };

                match event {
                    QueuedEvent::Device(DeviceMessage::SysEx(body)) => {
                        match parse_scene_message(&body) {
                            Ok(scene) => {
                                info!(attempt, "Scene dump received");
                                self.apply_scene(scene);
                                return Ok(());
                            }
                            Err(e) => {
                                info!(error = %e, len = body.len(), "Received unknown sysex message");
                            }
                        }
                    }
                    other => debug!(event = ?other, "Discarding event while waiting for scene dump"),
                }
            }

            warn!(attempt, retries, "No scene dump received");
        }

        self.phase = Phase::Idle;
        Err(Error::NoDevice { attempts: retries })
    }

    /// Replace the scene and control map wholesale and enter [`Phase::Ready`].
    pub fn apply_scene(&mut self, scene: SceneDump) {
        self.controls = ControlMap::build(&scene);
        self.scene = Some(scene);
        self.mirrored.clear();
        self.phase = Phase::Ready;

        for control in self.unmapped_bindings() {
            warn!(control, "Binding names a control the scene does not have");
        }
    }

    /// Bound control names missing from the current control map, sorted.
    #[must_use]
    pub fn unmapped_bindings(&self) -> Vec<&str> {
        let mut unmapped: Vec<&str> = self
            .config
            .bindings
            .controls()
            .filter(|name| self.controls.get(name).is_none())
            .collect();
        unmapped.sort_unstable();
        unmapped
    }

    /// Light every LED control in map order, then turn them off again in
    /// the same order.
    ///
    /// # Errors
    /// Returns the first transport error.
    pub fn led_self_test(&mut self) -> Result<()> {
        let leds: Vec<(u8, u8)> = self.controls.leds().map(|spec| spec.address()).collect();
        debug!(count = leds.len(), "Running LED self-test");

        for value in [LED_ON, LED_OFF] {
            for &(channel, control) in &leds {
                self.transport.send(&DeviceMessage::control_change(channel, control, value))?;
                if !self.config.led_test_delay.is_zero() {
                    sleep(self.config.led_test_delay);
                }
            }
        }

        Ok(())
    }

    /// Switch the LED of a named control.
    ///
    /// # Errors
    /// Returns [`Error::ControlNotFound`] for an unknown name, or the
    /// transport error.
    pub fn set_led(&mut self, name: &str, on: bool) -> Result<()> {
        let spec = self.controls.get(name).ok_or_else(|| Error::ControlNotFound(name.to_string()))?;
        let message =
            DeviceMessage::control_change(spec.channel, spec.control, if on { LED_ON } else { LED_OFF });

        debug!(name, on, "Set LED");
        self.transport.send(&message)
    }

    /// Prime the mute LEDs from the current endpoint state.
    pub fn sync_mute_leds(&mut self) {
        for endpoint in [Endpoint::Sink, Endpoint::Source] {
            let result = self
                .audio
                .endpoint_state(endpoint)
                .and_then(|state| self.mirror_mute(endpoint, state.muted));
            if let Err(e) = result {
                warn!(?endpoint, error = %e, "Failed to sync mute LED");
            }
        }
    }

    /// Wait for the audio subsystem once, then drain the queue.
    ///
    /// # Errors
    /// Returns the audio subsystem error if the wait fails.
    pub fn run_cycle(&mut self) -> Result<usize> {
        match self.audio.wait_for_event()? {
            Wakeup::Event(event) => self.queue.push(QueuedEvent::Audio(event)),
            Wakeup::Interrupted => trace!("Audio wait interrupted"),
        }
        Ok(self.drain_queue())
    }

    /// Handle every queued event in FIFO order. Returns the number handled.
    pub fn drain_queue(&mut self) -> usize {
        let mut handled = 0;

        while let Some(event) = self.queue.try_pop() {
            handled += 1;
            trace!(?event, "Handling queued event");

            let result = match event {
                QueuedEvent::Device(message) => self.handle_device_message(message),
                QueuedEvent::Audio(event) => self.handle_audio_event(event),
                QueuedEvent::Control(event) => self.handle_control_event(&event),
            };

            if let Err(e) = result {
                warn!(error = %e, "Failed to handle event");
            }
        }

        handled
    }

    fn handle_device_message(&mut self, message: DeviceMessage) -> Result<()> {
        match message {
            DeviceMessage::ControlChange { channel, control, value } => {
                let Some(spec) = self.controls.lookup(channel, control) else {
                    trace!(channel, control, value, "Unmapped control change");
                    return Ok(());
                };

                debug!(channel, control, value, name = %spec.name, "Control change");
                let event = ControlEvent { spec: spec.clone(), value };
                self.handle_control_event(&event)
            }
            DeviceMessage::SysEx(body) => {
                match parse_scene_message(&body) {
                    Ok(scene) => {
                        info!("Scene dump received, rebuilding control map");
                        self.apply_scene(scene);
                        self.sync_mute_leds();
                    }
                    Err(e) => debug!(error = %e, "Ignoring sysex message"),
                }
                Ok(())
            }
            DeviceMessage::Other(bytes) => {
                trace!(?bytes, "Ignoring device message");
                Ok(())
            }
        }
    }

    fn handle_control_event(&mut self, event: &ControlEvent) -> Result<()> {
        let Some(action) = self.config.bindings.action_for(&event.spec.name).cloned() else {
            return Ok(());
        };

        match action {
            ControlAction::ToggleSinkMute => self.toggle_mute(Endpoint::Sink, event.value),
            ControlAction::ToggleSourceMute => self.toggle_mute(Endpoint::Source, event.value),
            ControlAction::SinkVolume => self.follow_volume(Endpoint::Sink, event.value),
            ControlAction::SourceVolume => self.follow_volume(Endpoint::Source, event.value),
            ControlAction::Key(keys) => {
                let pressed = event.value == KEY_DOWN;
                info!(?keys, pressed, "Key");
                self.keys.send_keys(&keys, pressed)
            }
        }
    }

    fn toggle_mute(&mut self, endpoint: Endpoint, value: u8) -> Result<()> {
        // Buttons act on release.
        if value != 0 {
            return Ok(());
        }
        let state = self.audio.endpoint_state(endpoint)?;
        info!(?endpoint, muted = !state.muted, "Toggle mute");
        self.audio.set_mute(endpoint, !state.muted)
    }

    fn follow_volume(&mut self, endpoint: Endpoint, value: u8) -> Result<()> {
        let volume = self.scaler.scale(f32::from(value))?;
        debug!(?endpoint, volume, "Set volume");
        self.audio.set_volume(endpoint, volume)
    }

    fn handle_audio_event(&mut self, event: AudioEvent) -> Result<()> {
        let endpoint = match event.facility {
            Facility::Sink => Endpoint::Sink,
            Facility::Source => Endpoint::Source,
            Facility::Other => return Ok(()),
        };

        let state = self.audio.endpoint_state(endpoint)?;
        if state.index != event.index {
            trace!(?endpoint, index = event.index, "Change on non-default endpoint");
            return Ok(());
        }

        self.mirror_mute(endpoint, state.muted)
    }

    fn mirror_mute(&mut self, endpoint: Endpoint, muted: bool) -> Result<()> {
        if self.mirrored.get(&endpoint) == Some(&muted) {
            return Ok(());
        }

        let led = match endpoint {
            Endpoint::Sink => self.config.sink_mute_led.clone(),
            Endpoint::Source => self.config.source_mute_led.clone(),
        };
        let Some(led) = led else {
            return Ok(());
        };

        info!(?endpoint, muted, led = %led, "Mirroring mute state");
        self.set_led(&led, muted)?;
        self.mirrored.insert(endpoint, muted);
        Ok(())
    }
}

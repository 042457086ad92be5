//! nanosync daemon - nanoKONTROL2 to audio server bridge.
//!
//! Discovers the control surface scene, then mirrors mute state onto its
//! LEDs and turns its controls into mute, volume and key events.

use anyhow::{Context, Result};
use nanosync_core::{AudioSubsystem, Coordinator, DeviceInbox, EventQueue, KeyInjector, NoKeys};
use nanosync_input::VirtualKeyboard;
use nanosync_midi::MidiTransport;
use nanosync_pulse::PulseAudio;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod signals;

fn main() -> Result<()> {
    let config = config::load_config()?;

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(&config.daemon.log_level))
                .context("Invalid log level")?,
        )
        .init();

    info!(version = env!("CARGO_PKG_VERSION"), "Starting nanosync daemon");

    let audio = PulseAudio::connect().context("Failed to connect to the audio server")?;
    info!("Audio server connected");

    let queue = EventQueue::new();
    let inbox = DeviceInbox::new(queue.clone(), audio.interrupter());
    let transport = match MidiTransport::open(&config.device.port_name, inbox) {
        Ok(transport) => transport,
        Err(e) => {
            if let Ok(ports) = nanosync_midi::list_input_ports() {
                warn!(?ports, "Available MIDI input ports");
            }
            return Err(e).with_context(|| format!("Failed to open MIDI port '{}'", config.device.port_name));
        }
    };
    info!(port = transport.port_name(), "Control surface opened");

    let keys: Box<dyn KeyInjector> = match VirtualKeyboard::create() {
        Ok(keyboard) => Box::new(keyboard),
        Err(e) => {
            warn!(error = %e, "Key bindings disabled");
            Box::new(NoKeys)
        }
    };

    let mut coordinator = Coordinator::new(transport, audio, keys, queue, config.coordinator_config());
    signals::setup_signal_handlers(coordinator.shutdown_handle())?;

    coordinator.run().context("Coordinator stopped")?;

    info!("nanosync daemon stopped");
    Ok(())
}


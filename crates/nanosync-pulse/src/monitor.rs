//! `pactl subscribe` event monitor.
//!
//! The subscription runs as a child process. A dedicated thread reads its
//! output and forwards sink and source events over a channel.

use std::io::{BufRead, BufReader};
use std::process::{Child, ChildStdout, Command, Stdio};
use std::thread::JoinHandle;

use crossbeam_channel::{Receiver, Sender, unbounded};
use nanosync_core::{AudioEvent, AudioEventKind, Facility};
use tracing::{debug, info, trace, warn};

use crate::error::{PulseError, PulseResult};

/// Running `pactl subscribe` process and its reader thread.
///
/// Dropping the monitor kills the process, which ends the thread.
pub struct SubscribeMonitor {
    child: Child,
    reader: Option<JoinHandle<()>>,
}

impl SubscribeMonitor {
    /// Start the subscription.
    ///
    /// # Errors
    /// Returns an error if the process or the reader thread cannot start.
    pub fn spawn(program: &str) -> PulseResult<(Self, Receiver<AudioEvent>)> {
        let mut child = Command::new(program)
            .arg("subscribe")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| PulseError::Parse("subscribe has no stdout".to_string()))?;
        let (event_tx, event_rx) = unbounded();

        let reader = std::thread::Builder::new()
            .name("pactl-subscribe".to_string())
            .spawn(move || read_events(stdout, &event_tx));

        let reader = match reader {
            Ok(handle) => handle,
            Err(e) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(e.into());
            }
        };

        info!(pid = child.id(), "Subscribed to audio server events");
        Ok((Self { child, reader: Some(reader) }, event_rx))
    }
}

impl Drop for SubscribeMonitor {
    fn drop(&mut self) {
        if let Err(e) = self.child.kill() {
            debug!(error = %e, "pactl subscribe already exited");
        }
        let _ = self.child.wait();
        if let Some(reader) = self.reader.take() {
            let _ = reader.join();
        }
    }
}

fn read_events(stdout: ChildStdout, event_tx: &Sender<AudioEvent>) {
    for line in BufReader::new(stdout).lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!(error = %e, "Failed to read pactl subscribe output");
                break;
            }
        };

        let Some(event) = parse_event_line(&line) else {
            trace!(line = %line, "Ignoring subscribe line");
            continue;
        };
        if event.facility == Facility::Other {
            continue;
        }

        if event_tx.send(event).is_err() {
            break;
        }
    }

    debug!("pactl subscribe reader exiting");
}

/// Parse a line like `Event 'change' on sink #53`.
fn parse_event_line(line: &str) -> Option<AudioEvent> {
    let rest = line.trim().strip_prefix("Event '")?;
    let (kind, rest) = rest.split_once("' on ")?;
    let (facility, index) = rest.rsplit_once(" #")?;

    let kind = match kind {
        "new" => AudioEventKind::New,
        "change" => AudioEventKind::Change,
        "remove" => AudioEventKind::Remove,
        _ => return None,
    };
    let facility = match facility {
        "sink" => Facility::Sink,
        "source" => Facility::Source,
        _ => Facility::Other,
    };

    Some(AudioEvent { kind, facility, index: index.parse().ok()? })
}

//! `pactl` command wrapper.
//!
//! Works against PulseAudio and against PipeWire through pipewire-pulse.

use std::process::Command;

use nanosync_core::{Endpoint, EndpointState};
use tracing::{debug, warn};

use crate::error::{PulseError, PulseResult};

/// Thin wrapper around the `pactl` binary.
#[derive(Debug, Clone)]
pub struct Pactl {
    program: String,
}

impl Default for Pactl {
    fn default() -> Self {
        Self::new("pactl")
    }
}

impl Pactl {
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self { program: program.into() }
    }

    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Name of the current default sink or source.
    ///
    /// # Errors
    /// Returns an error if pactl fails.
    pub fn default_name(&self, endpoint: Endpoint) -> PulseResult<String> {
        let command = match endpoint {
            Endpoint::Sink => "get-default-sink",
            Endpoint::Source => "get-default-source",
        };
        let name = self.run(&[command])?.trim().to_string();
        if name.is_empty() {
            return Err(PulseError::Parse(format!("{command} returned nothing")));
        }
        Ok(name)
    }

    /// Server index of the named sink or source.
    ///
    /// # Errors
    /// Returns an error if pactl fails or the endpoint is not listed.
    pub fn index_of(&self, endpoint: Endpoint, name: &str) -> PulseResult<u32> {
        let listing = self.run(&["list", "short", list_kind(endpoint)])?;
        parse_short_index(&listing, name).ok_or_else(|| PulseError::EndpointNotFound(name.to_string()))
    }

    /// Mute state of the named sink or source.
    ///
    /// # Errors
    /// Returns an error if pactl fails or prints something unexpected.
    pub fn mute(&self, endpoint: Endpoint, name: &str) -> PulseResult<bool> {
        let command = match endpoint {
            Endpoint::Sink => "get-sink-mute",
            Endpoint::Source => "get-source-mute",
        };
        let output = self.run(&[command, name])?;
        parse_mute(&output).ok_or_else(|| PulseError::Parse(output.trim().to_string()))
    }

    /// Index and mute state of the default endpoint.
    ///
    /// # Errors
    /// Returns an error if any query fails.
    pub fn endpoint_state(&self, endpoint: Endpoint) -> PulseResult<EndpointState> {
        let name = self.default_name(endpoint)?;
        let index = self.index_of(endpoint, &name)?;
        let muted = self.mute(endpoint, &name)?;
        Ok(EndpointState { index, muted })
    }

    /// Mute or unmute the default endpoint.
    ///
    /// # Errors
    /// Returns an error if pactl fails.
    pub fn set_mute(&self, endpoint: Endpoint, muted: bool) -> PulseResult<()> {
        let command = match endpoint {
            Endpoint::Sink => "set-sink-mute",
            Endpoint::Source => "set-source-mute",
        };
        self.run(&[command, default_target(endpoint), if muted { "1" } else { "0" }])?;
        debug!(?endpoint, muted, "Mute set via pactl");
        Ok(())
    }

    /// Set the default endpoint volume.
    ///
    /// # Arguments
    /// * `volume` - Volume level from 0.0 to 1.0
    ///
    /// # Errors
    /// Returns an error if pactl fails.
    pub fn set_volume(&self, endpoint: Endpoint, volume: f32) -> PulseResult<()> {
        let command = match endpoint {
            Endpoint::Sink => "set-sink-volume",
            Endpoint::Source => "set-source-volume",
        };
        let percent = volume_percent(volume);
        self.run(&[command, default_target(endpoint), &format!("{percent}%")])?;
        debug!(?endpoint, percent, "Volume set via pactl");
        Ok(())
    }

    fn run(&self, args: &[&str]) -> PulseResult<String> {
        let output = Command::new(&self.program).args(args).output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            warn!(command = args.join(" "), stderr = %stderr, "pactl failed");
            return Err(PulseError::CommandFailed { command: args.join(" "), stderr });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

fn list_kind(endpoint: Endpoint) -> &'static str {
    match endpoint {
        Endpoint::Sink => "sinks",
        Endpoint::Source => "sources",
    }
}

fn default_target(endpoint: Endpoint) -> &'static str {
    match endpoint {
        Endpoint::Sink => "@DEFAULT_SINK@",
        Endpoint::Source => "@DEFAULT_SOURCE@",
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn volume_percent(volume: f32) -> u32 {
    (volume.clamp(0.0, 1.0) * 100.0).round() as u32
}

/// Find the index column of `name` in `pactl list short` output.
///
/// Lines look like `53\talsa_output.pci-0000_00_1f.3.analog-stereo\tPipeWire\ts32le 2ch 48000Hz\tRUNNING`.
fn parse_short_index(listing: &str, name: &str) -> Option<u32> {
    listing.lines().find_map(|line| {
        let mut fields = line.split('\t');
        let index = fields.next()?.trim();
        (fields.next()?.trim() == name).then(|| index.parse().ok()).flatten()
    })
}

/// Parse `Mute: yes` / `Mute: no`.
fn parse_mute(output: &str) -> Option<bool> {
    let value = output.trim().strip_prefix("Mute:")?.trim();
    match value {
        "yes" => Some(true),
        "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    const SINKS: &str = "\
48\talsa_output.usb-headset.analog-stereo\tPipeWire\ts16le 2ch 48000Hz\tSUSPENDED
53\talsa_output.pci-0000_00_1f.3.analog-stereo\tPipeWire\ts32le 2ch 48000Hz\tRUNNING
";

    #[test]
    fn test_parse_short_index() {
        assert_eq!(parse_short_index(SINKS, "alsa_output.pci-0000_00_1f.3.analog-stereo"), Some(53));
        assert_eq!(parse_short_index(SINKS, "alsa_output.usb-headset.analog-stereo"), Some(48));
        assert_eq!(parse_short_index(SINKS, "alsa_output.usb-headset"), None);
        assert_eq!(parse_short_index("", "anything"), None);
    }

    #[test]
    fn test_parse_mute() {
        assert_eq!(parse_mute("Mute: yes\n"), Some(true));
        assert_eq!(parse_mute("Mute: no"), Some(false));
        assert_eq!(parse_mute("Stummschaltung: ja"), None);
    }

    #[test]
    fn test_volume_percent_clamps() {
        assert_eq!(volume_percent(0.0), 0);
        assert_eq!(volume_percent(0.5), 50);
        assert_eq!(volume_percent(1.0), 100);
        assert_eq!(volume_percent(1.7), 100);
        assert_eq!(volume_percent(-0.2), 0);
    }

    #[test]
    fn test_missing_binary_reports_spawn_error() {
        let pactl = Pactl::new("/nonexistent/pactl");
        assert_matches!(pactl.default_name(Endpoint::Sink), Err(PulseError::Spawn(_)));
    }
}

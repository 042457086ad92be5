//! Daemon configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use nanosync_core::{Bindings, CoordinatorConfig, DiscoveryConfig};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Daemon configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Daemon settings
    #[serde(default)]
    pub daemon: DaemonConfig,
    /// Control surface settings
    #[serde(default)]
    pub device: DeviceConfig,
    /// Scene discovery settings
    #[serde(default)]
    pub discovery: DiscoverySettings,
    /// LED settings
    #[serde(default)]
    pub leds: LedConfig,
    /// Control name to action
    #[serde(default)]
    pub bindings: Bindings,
}

impl Config {
    /// Coordinator settings derived from this configuration.
    #[must_use]
    pub fn coordinator_config(&self) -> CoordinatorConfig {
        CoordinatorConfig {
            discovery: DiscoveryConfig {
                retries: self.discovery.retries,
                polls_per_attempt: self.discovery.polls_per_attempt,
                poll_interval: Duration::from_millis(self.discovery.poll_interval_ms),
                request_channel: self.discovery.request_channel & 0x0f,
            },
            led_test_delay: Duration::from_millis(self.leds.self_test_delay_ms),
            sink_mute_led: non_empty(&self.leds.sink_mute),
            source_mute_led: non_empty(&self.leds.source_mute),
            bindings: self.bindings.clone(),
        }
    }
}

fn non_empty(name: &str) -> Option<String> {
    (!name.is_empty()).then(|| name.to_string())
}

/// Daemon-specific settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self { log_level: default_log_level() }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Control surface settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// Substring matched against MIDI port names
    #[serde(default = "default_port_name")]
    pub port_name: String,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self { port_name: default_port_name() }
    }
}

fn default_port_name() -> String {
    nanosync_midi::DEFAULT_PORT_PATTERN.to_string()
}

/// Scene discovery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoverySettings {
    #[serde(default = "default_retries")]
    pub retries: u32,
    #[serde(default = "default_polls_per_attempt")]
    pub polls_per_attempt: u32,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// MIDI channel of the scene request (0-15)
    #[serde(default)]
    pub request_channel: u8,
}

impl Default for DiscoverySettings {
    fn default() -> Self {
        Self {
            retries: default_retries(),
            polls_per_attempt: default_polls_per_attempt(),
            poll_interval_ms: default_poll_interval_ms(),
            request_channel: 0,
        }
    }
}

fn default_retries() -> u32 {
    5
}

fn default_polls_per_attempt() -> u32 {
    20
}

fn default_poll_interval_ms() -> u64 {
    50
}

/// LED settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedConfig {
    /// Pause between self-test steps
    #[serde(default = "default_self_test_delay_ms")]
    pub self_test_delay_ms: u64,
    /// Control mirroring the default sink mute, empty to disable
    #[serde(default = "default_sink_mute")]
    pub sink_mute: String,
    /// Control mirroring the default source mute, empty to disable
    #[serde(default = "default_source_mute")]
    pub source_mute: String,
}

impl Default for LedConfig {
    fn default() -> Self {
        Self {
            self_test_delay_ms: default_self_test_delay_ms(),
            sink_mute: default_sink_mute(),
            source_mute: default_source_mute(),
        }
    }
}

fn default_self_test_delay_ms() -> u64 {
    10
}

fn default_sink_mute() -> String {
    "mute-group-0".to_string()
}

fn default_source_mute() -> String {
    "mute-group-1".to_string()
}

/// Load configuration from the default location or defaults.
pub fn load_config() -> Result<Config> {
    load_config_from(&config_path()?)
}

/// Load configuration from `config_path`, falling back to defaults when the
/// file does not exist.
pub fn load_config_from(config_path: &Path) -> Result<Config> {
    if config_path.exists() {
        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {config_path:?}"))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {config_path:?}"))?;
        Ok(config)
    } else {
        info!(?config_path, "Config file not found, using defaults");
        Ok(Config::default())
    }
}

/// Get the configuration file path.
fn config_path() -> Result<PathBuf> {
    let dirs =
        ProjectDirs::from("org", "nanosync", "nanosync").context("Could not determine config directory")?;
    Ok(dirs.config_dir().join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use nanosync_core::ControlAction;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(&dir.path().join("config.toml")).unwrap();

        assert_eq!(config.daemon.log_level, "info");
        assert_eq!(config.device.port_name, "nanoKONTROL2");
        assert_eq!(config.coordinator_config(), CoordinatorConfig::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[discovery]
retries = 2
poll_interval_ms = 100

[leds]
source_mute = ""

[bindings]
"knob-group-7" = "sink-volume"
"solo-group-0" = "toggle-source-mute"
"#,
        )
        .unwrap();

        let config = load_config_from(&path).unwrap();
        let coordinator = config.coordinator_config();

        assert_eq!(coordinator.discovery.retries, 2);
        assert_eq!(coordinator.discovery.polls_per_attempt, 20);
        assert_eq!(coordinator.discovery.poll_interval, Duration::from_millis(100));
        assert_eq!(coordinator.sink_mute_led.as_deref(), Some("mute-group-0"));
        assert_eq!(coordinator.source_mute_led, None);
        assert_eq!(coordinator.bindings.len(), 2);
        assert_eq!(coordinator.bindings.action_for("knob-group-7"), Some(&ControlAction::SinkVolume));
        assert_eq!(coordinator.bindings.action_for("mute-group-0"), None);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[bindings]\n\"mute-group-0\" = \"explode\"\n").unwrap();

        assert!(load_config_from(&path).is_err());
    }
}

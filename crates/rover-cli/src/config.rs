//! Configuration vault – reads/writes `~/.rover/config.toml`.

use rover_types::RoverError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Persisted configuration stored in `~/.rover/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Serial device the motor controller hangs off.
    #[serde(default = "default_serial_device")]
    pub serial_device: String,

    /// `host:port` the telemetry reporter broadcasts to.
    #[serde(default = "default_broadcast_addr")]
    pub broadcast_addr: String,

    /// Camera selection: `"sim"` for the synthetic camera, `"none"` to run
    /// without perception. Real capture devices plug in behind the
    /// `Camera` trait and are wired here when a driver exists.
    #[serde(default = "default_camera")]
    pub camera: String,

    /// Scene for the simulated camera: `finish`, `track-right`,
    /// `track-center`, or `dark`.
    #[serde(default = "default_sim_scene")]
    pub sim_scene: String,

    /// Speed commanded when the track is clear.
    #[serde(default = "default_cruise_speed")]
    pub cruise_speed: u8,

    /// Decision-loop cadence in milliseconds.
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,

    /// Victory-dance dwell in seconds.
    #[serde(default = "default_dwell_secs")]
    pub dwell_secs: u64,

    /// Telemetry broadcast cadence in milliseconds.
    #[serde(default = "default_report_interval_ms")]
    pub report_interval_ms: u64,
}

fn default_serial_device() -> String {
    "/dev/ttyACM0".to_string()
}
fn default_broadcast_addr() -> String {
    "127.0.0.1:9010".to_string()
}
fn default_camera() -> String {
    "none".to_string()
}
fn default_sim_scene() -> String {
    "track-center".to_string()
}
fn default_cruise_speed() -> u8 {
    127
}
fn default_tick_ms() -> u64 {
    1000
}
fn default_dwell_secs() -> u64 {
    10
}
fn default_report_interval_ms() -> u64 {
    1000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            serial_device: default_serial_device(),
            broadcast_addr: default_broadcast_addr(),
            camera: default_camera(),
            sim_scene: default_sim_scene(),
            cruise_speed: default_cruise_speed(),
            tick_ms: default_tick_ms(),
            dwell_secs: default_dwell_secs(),
            report_interval_ms: default_report_interval_ms(),
        }
    }
}

/// Return the path to `~/.rover/config.toml`.
pub fn config_path() -> PathBuf {
    config_path_for_home(
        &std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .unwrap_or_else(|_| ".".to_string()),
    )
}

/// Build the config path relative to the given home directory.
/// Extracted for testability without mutating environment variables.
pub(crate) fn config_path_for_home(home: &str) -> PathBuf {
    PathBuf::from(home).join(".rover").join("config.toml")
}

/// Load the config from disk. Returns `None` if the file does not exist.
pub fn load() -> Result<Option<Config>, RoverError> {
    load_from(&config_path())
}

/// Load the config from a specific path.
pub(crate) fn load_from(path: &Path) -> Result<Option<Config>, RoverError> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path).map_err(|e| {
        RoverError::Config(format!("failed to read config at {}: {}", path.display(), e))
    })?;
    let mut cfg: Config = toml::from_str(&raw)
        .map_err(|e| RoverError::Config(format!("failed to parse config: {e}")))?;
    apply_env_overrides(&mut cfg);
    Ok(Some(cfg))
}

/// Persist the config, creating `~/.rover/` if needed.
pub fn save(cfg: &Config) -> Result<(), RoverError> {
    save_to(cfg, &config_path())
}

pub(crate) fn save_to(cfg: &Config, path: &Path) -> Result<(), RoverError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            RoverError::Config(format!("failed to create {}: {}", parent.display(), e))
        })?;
    }
    let raw = toml::to_string_pretty(cfg)
        .map_err(|e| RoverError::Config(format!("failed to serialise config: {e}")))?;
    fs::write(path, raw).map_err(|e| {
        RoverError::Config(format!("failed to write config at {}: {}", path.display(), e))
    })
}

/// Per-deployment overrides without editing the file.
fn apply_env_overrides(cfg: &mut Config) {
    if let Ok(dev) = std::env::var("ROVER_SERIAL_DEVICE") {
        cfg.serial_device = dev;
    }
    if let Ok(addr) = std::env::var("ROVER_BROADCAST_ADDR") {
        cfg.broadcast_addr = addr;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_path_is_under_home() {
        let path = config_path_for_home("/home/pilot");
        assert_eq!(path, PathBuf::from("/home/pilot/.rover/config.toml"));
    }

    #[test]
    fn missing_file_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        assert!(load_from(&path).unwrap().is_none());
    }

    #[test]
    fn save_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.serial_device = "/dev/ttyUSB3".to_string();
        cfg.cruise_speed = 90;
        save_to(&cfg, &path).unwrap();

        let back = load_from(&path).unwrap().unwrap();
        assert_eq!(back.serial_device, "/dev/ttyUSB3");
        assert_eq!(back.cruise_speed, 90);
        assert_eq!(back.tick_ms, 1000);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "camera = \"sim\"\n").unwrap();

        let cfg = load_from(&path).unwrap().unwrap();
        assert_eq!(cfg.camera, "sim");
        assert_eq!(cfg.serial_device, "/dev/ttyACM0");
        assert_eq!(cfg.cruise_speed, 127);
    }

    #[test]
    fn garbage_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "not = [valid").unwrap();
        assert!(load_from(&path).is_err());
    }
}

//! # Thermostat Configuration
//!
//! Every section is optional; a missing file section falls back to defaults that
//! run the host fully simulated.
//!
//! ## Example: TOML Configuration
//!
//! ```toml
//! [control]
//! initial_target = 21.0
//! sample_interval_ms = 5000
//! port_timeout_ms = 2000
//!
//! [sensor]
//! kind = "one_wire"
//! device = "/sys/bus/w1/devices/28-000005e2fdc3/w1_slave"
//!
//! [heater]
//! kind = "command"
//! on = ["plugctl", "--device", "heater", "on"]
//! off = ["plugctl", "--device", "heater", "off"]
//!
//! [web]
//! bind = "0.0.0.0:5000"
//! ```

// src/config.rs - Single configuration file
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Main configuration struct for the control loop, sensor, heater and web API.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub control: ControlConfig,
    #[serde(default)]
    pub sensor: SensorConfig,
    #[serde(default)]
    pub heater: HeaterConfig,
    #[serde(default)]
    pub web: WebConfig,
}

/// Sampling loop and control state settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ControlConfig {
    /// Target at startup, °C. Clamped into the safety range.
    #[serde(default = "default_initial_target")]
    pub initial_target: f64,
    #[serde(default = "default_sample_interval_ms")]
    pub sample_interval_ms: u64,
    /// Upper bound for any single sensor or heater call.
    #[serde(default = "default_port_timeout_ms")]
    pub port_timeout_ms: u64,
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,
    /// How many of the most recent readings `/api/status` includes.
    #[serde(default = "default_status_history_len")]
    pub status_history_len: usize,
    #[serde(default = "default_true")]
    pub heater_off_on_shutdown: bool,
}

impl ControlConfig {
    pub fn sample_interval(&self) -> Duration {
        Duration::from_millis(self.sample_interval_ms)
    }

    pub fn port_timeout(&self) -> Duration {
        Duration::from_millis(self.port_timeout_ms)
    }
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            initial_target: default_initial_target(),
            sample_interval_ms: default_sample_interval_ms(),
            port_timeout_ms: default_port_timeout_ms(),
            history_capacity: default_history_capacity(),
            status_history_len: default_status_history_len(),
            heater_off_on_shutdown: true,
        }
    }
}

/// Temperature sensor selection.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SensorConfig {
    Simulated(SimulationConfig),
    /// DS18B20 on the Linux 1-Wire bus.
    OneWire { device: PathBuf },
}

impl Default for SensorConfig {
    fn default() -> Self {
        SensorConfig::Simulated(SimulationConfig::default())
    }
}

/// Parameters of the simulated room.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SimulationConfig {
    #[serde(default = "default_ambient_temp")]
    pub ambient_temp: f64,
    #[serde(default = "default_initial_temp")]
    pub initial_temp: f64,
    /// °C gained per simulated second while the heater runs.
    #[serde(default = "default_heat_rate")]
    pub heat_rate: f64,
    /// Fraction of the room/ambient difference lost per simulated second.
    #[serde(default = "default_loss_rate")]
    pub loss_rate: f64,
    /// Peak amplitude of uniform read noise, °C.
    #[serde(default = "default_noise")]
    pub noise: f64,
    /// Probability that a read fails outright.
    #[serde(default)]
    pub dropout_rate: f64,
    /// Simulated seconds per wall-clock second.
    #[serde(default = "default_time_scale")]
    pub time_scale: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            ambient_temp: default_ambient_temp(),
            initial_temp: default_initial_temp(),
            heat_rate: default_heat_rate(),
            loss_rate: default_loss_rate(),
            noise: default_noise(),
            dropout_rate: 0.0,
            time_scale: default_time_scale(),
        }
    }
}

/// Heater actuator selection.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HeaterConfig {
    #[default]
    Simulated,
    /// External program per state, e.g. a smart-plug CLI.
    Command { on: Vec<String>, off: Vec<String> },
}

/// HTTP API settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WebConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self { bind: default_bind() }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let control = &self.control;
        if control.sample_interval_ms == 0 {
            return Err(ConfigError::Invalid("control.sample_interval_ms must be > 0".into()));
        }
        if control.port_timeout_ms == 0 {
            return Err(ConfigError::Invalid("control.port_timeout_ms must be > 0".into()));
        }
        // sensor read + heater command must fit in one period
        if control.port_timeout_ms.saturating_mul(2) > control.sample_interval_ms {
            return Err(ConfigError::Invalid(format!(
                "control.port_timeout_ms ({}) must be at most half of sample_interval_ms ({})",
                control.port_timeout_ms, control.sample_interval_ms
            )));
        }
        if control.history_capacity == 0 {
            return Err(ConfigError::Invalid("control.history_capacity must be > 0".into()));
        }
        if !control.initial_target.is_finite() {
            return Err(ConfigError::Invalid("control.initial_target must be a finite number".into()));
        }

        if let SensorConfig::Simulated(sim) = &self.sensor {
            let fields = [
                ("ambient_temp", sim.ambient_temp),
                ("initial_temp", sim.initial_temp),
                ("heat_rate", sim.heat_rate),
                ("loss_rate", sim.loss_rate),
                ("noise", sim.noise),
                ("dropout_rate", sim.dropout_rate),
                ("time_scale", sim.time_scale),
            ];
            if let Some((name, _)) = fields.iter().find(|(_, value)| !value.is_finite()) {
                return Err(ConfigError::Invalid(format!("sensor.{} must be a finite number", name)));
            }
            if !(0.0..=1.0).contains(&sim.dropout_rate) {
                return Err(ConfigError::Invalid("sensor.dropout_rate must be within [0, 1]".into()));
            }
            if !(0.0..=1.0).contains(&sim.loss_rate) {
                return Err(ConfigError::Invalid("sensor.loss_rate must be within [0, 1]".into()));
            }
            if sim.noise < 0.0 || sim.heat_rate < 0.0 || sim.time_scale <= 0.0 {
                return Err(ConfigError::Invalid(
                    "sensor.noise and sensor.heat_rate must be >= 0, sensor.time_scale > 0".into(),
                ));
            }
        }

        if let HeaterConfig::Command { on, off } = &self.heater {
            if on.is_empty() || off.is_empty() {
                return Err(ConfigError::Invalid("heater.on and heater.off need at least a program name".into()));
            }
        }
        Ok(())
    }
}

pub fn load_config(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

fn default_initial_target() -> f64 { 20.0 }
fn default_sample_interval_ms() -> u64 { 5_000 }
fn default_port_timeout_ms() -> u64 { 2_000 }
fn default_history_capacity() -> usize { 120 }
fn default_status_history_len() -> usize { 20 }
fn default_true() -> bool { true }
fn default_ambient_temp() -> f64 { 12.0 }
fn default_initial_temp() -> f64 { 18.0 }
fn default_heat_rate() -> f64 { 0.02 }
fn default_loss_rate() -> f64 { 0.001 }
fn default_noise() -> f64 { 0.05 }
fn default_time_scale() -> f64 { 1.0 }
fn default_bind() -> String { "0.0.0.0:5000".to_string() }

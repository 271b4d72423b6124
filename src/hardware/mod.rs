// src/hardware/mod.rs - Sensor and heater ports
//! Hardware seams of the thermostat.
//!
//! The control core only ever talks to [`TemperatureSensor`] and [`HeaterSwitch`].
//! Concrete drivers are picked from [`crate::config::Config`] by [`build_ports`].

pub mod sim;
pub mod switch;
pub mod temperature;

use crate::config::{Config, HeaterConfig, SensorConfig};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

pub use sim::{RecordingHeater, ScriptStep, ScriptedSensor, SimulatedHeater, SimulatedRoom, SimulatedSensor};
pub use switch::CommandHeater;
pub use temperature::OneWireSensor;

#[derive(Debug, Error)]
pub enum HardwareError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("timed out after {0:?}")]
    Timeout(Duration),
    #[error("invalid reading: {0}")]
    InvalidReading(String),
    #[error("command failed: {0}")]
    CommandFailed(String),
    #[error("device fault: {0}")]
    Fault(String),
}

/// Source of room temperature readings in °C.
#[async_trait]
pub trait TemperatureSensor: Send + Sync {
    async fn read(&self) -> Result<f64, HardwareError>;
    fn name(&self) -> &str;
}

/// Binary heater output. Setting the same state twice must be harmless.
#[async_trait]
pub trait HeaterSwitch: Send + Sync {
    async fn set(&self, on: bool) -> Result<(), HardwareError>;
    fn name(&self) -> &str;
}

/// Instantiate the configured sensor and heater.
///
/// A simulated sensor and simulated heater share one [`SimulatedRoom`] so the
/// heater actually warms what the sensor measures.
pub fn build_ports(
    config: &Config,
) -> Result<(Arc<dyn TemperatureSensor>, Arc<dyn HeaterSwitch>), HardwareError> {
    let (sensor, room): (Arc<dyn TemperatureSensor>, Option<Arc<SimulatedRoom>>) = match &config.sensor {
        SensorConfig::Simulated(sim) => {
            let room = Arc::new(SimulatedRoom::new(sim));
            let sensor: Arc<dyn TemperatureSensor> = Arc::new(SimulatedSensor::new(room.clone(), sim));
            (sensor, Some(room))
        }
        SensorConfig::OneWire { device } => {
            let sensor: Arc<dyn TemperatureSensor> = Arc::new(OneWireSensor::new(device.clone()));
            (sensor, None)
        }
    };

    let heater: Arc<dyn HeaterSwitch> = match (&config.heater, room) {
        (HeaterConfig::Simulated, Some(room)) => Arc::new(SimulatedHeater::new(room)),
        (HeaterConfig::Simulated, None) => {
            tracing::warn!("Simulated heater is not linked to a simulated room; it only records commands");
            Arc::new(RecordingHeater::new())
        }
        (HeaterConfig::Command { on, off }, _) => Arc::new(CommandHeater::new(on.clone(), off.clone())?),
    };

    tracing::info!("Sensor: {}, heater: {}", sensor.name(), heater.name());
    Ok((sensor, heater))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[tokio::test]
    async fn test_default_ports_are_simulated_and_linked() {
        let (sensor, heater) = build_ports(&Config::default()).unwrap();
        assert_eq!(sensor.name(), "simulated");
        assert_eq!(heater.name(), "simulated");
        assert!(heater.set(true).await.is_ok());
    }

    #[test]
    fn test_one_wire_with_simulated_heater_falls_back_to_recorder() {
        let mut config = Config::default();
        config.sensor = SensorConfig::OneWire { device: PathBuf::from("/nonexistent/w1_slave") };
        let (sensor, heater) = build_ports(&config).unwrap();
        assert_eq!(sensor.name(), "one_wire");
        assert_eq!(heater.name(), "recording");
    }
}

use crate::hardware::HardwareError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ControlError {
    #[error("sensor unavailable: {0}")]
    SensorUnavailable(#[source] HardwareError),
    #[error("heater command failed: {0}")]
    ActuatorCommandFailed(#[source] HardwareError),
    #[error("{0}")]
    InvalidRequest(String),
}

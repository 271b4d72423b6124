//! The single shared record of what the thermostat knows and wants.

use super::error::ControlError;
use super::history::{HistoryBuffer, Reading};

/// Lowest target the thermostat accepts, °C.
pub const MIN_TARGET: f64 = 10.0;
/// Highest target the thermostat accepts, °C.
pub const MAX_TARGET: f64 = 30.0;

/// Clamp a finite target into `[MIN_TARGET, MAX_TARGET]`.
pub fn clamp_target(target: f64) -> f64 {
    target.clamp(MIN_TARGET, MAX_TARGET)
}

/// Control state. Lives behind the controller's lock; fields are private so
/// the target can only be written through the clamp.
#[derive(Debug, Clone)]
pub struct ControlState {
    current_temperature: Option<f64>,
    target_temperature: f64,
    auto_mode: bool,
    heater_on: bool,
    history: HistoryBuffer,
}

/// Consistent copy of the state taken under the lock.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusSnapshot {
    pub current_temperature: Option<f64>,
    pub target_temperature: f64,
    pub heater_on: bool,
    pub auto_mode: bool,
    pub history: Vec<Reading>,
}

impl ControlState {
    /// Fresh state: automatic mode, heater off, no readings yet.
    pub fn new(initial_target: f64, history_capacity: usize) -> Self {
        let target = if initial_target.is_finite() {
            clamp_target(initial_target)
        } else {
            MIN_TARGET
        };
        if target != initial_target {
            tracing::warn!("Initial target {} clamped to {:.1}°C", initial_target, target);
        }
        Self {
            current_temperature: None,
            target_temperature: target,
            auto_mode: true,
            heater_on: false,
            history: HistoryBuffer::new(history_capacity),
        }
    }

    pub fn current_temperature(&self) -> Option<f64> {
        self.current_temperature
    }

    pub fn target_temperature(&self) -> f64 {
        self.target_temperature
    }

    /// Store a new target and return the effective (clamped) value.
    pub fn set_target_temperature(&mut self, target: f64) -> Result<f64, ControlError> {
        if !target.is_finite() {
            return Err(ControlError::InvalidRequest(format!(
                "target must be a finite number, got {}",
                target
            )));
        }
        self.target_temperature = clamp_target(target);
        Ok(self.target_temperature)
    }

    pub fn auto_mode(&self) -> bool {
        self.auto_mode
    }

    pub fn set_auto_mode(&mut self, auto: bool) {
        self.auto_mode = auto;
    }

    pub fn heater_on(&self) -> bool {
        self.heater_on
    }

    /// Record a heater state the actuator has confirmed.
    pub(crate) fn confirm_heater(&mut self, on: bool) {
        self.heater_on = on;
    }

    /// Store a successful sample as the current value and in history.
    pub fn record_reading(&mut self, reading: Reading) {
        self.current_temperature = Some(reading.celsius);
        self.history.push(reading);
    }

    pub fn history(&self) -> &HistoryBuffer {
        &self.history
    }

    /// Snapshot with the `history_len` most recent readings.
    pub fn snapshot(&self, history_len: usize) -> StatusSnapshot {
        StatusSnapshot {
            current_temperature: self.current_temperature,
            target_temperature: self.target_temperature,
            heater_on: self.heater_on,
            auto_mode: self.auto_mode,
            history: self.history.recent(history_len),
        }
    }
}

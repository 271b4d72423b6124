//! Control core: shared state, hysteresis decisions and the sampling loop.
//!
//! [`Controller`] is the one handle to the process-wide [`ControlState`]. It is
//! cheap to clone; the sampling task and every HTTP handler hold a copy.

pub mod error;
pub mod history;
pub mod hysteresis;
pub mod sampler;
pub mod state;

pub use error::ControlError;
pub use history::{HistoryBuffer, Reading};
pub use hysteresis::{HYSTERESIS_BAND, decide};
pub use sampler::{CycleOutcome, spawn_sampling_loop};
pub use state::{ControlState, MAX_TARGET, MIN_TARGET, StatusSnapshot};

use crate::config::ControlConfig;
use crate::hardware::{HardwareError, HeaterSwitch, TemperatureSensor};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

struct Inner {
    state: Mutex<ControlState>,
    // serializes heater commands; never held together with I/O on `state`
    command_gate: Mutex<()>,
    sensor: Arc<dyn TemperatureSensor>,
    heater: Arc<dyn HeaterSwitch>,
    port_timeout: Duration,
    status_history_len: usize,
}

#[derive(Clone)]
pub struct Controller {
    inner: Arc<Inner>,
}

impl Controller {
    pub fn new(
        config: &ControlConfig,
        sensor: Arc<dyn TemperatureSensor>,
        heater: Arc<dyn HeaterSwitch>,
    ) -> Self {
        let state = ControlState::new(config.initial_target, config.history_capacity);
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(state),
                command_gate: Mutex::new(()),
                sensor,
                heater,
                port_timeout: config.port_timeout(),
                status_history_len: config.status_history_len,
            }),
        }
    }

    /// Current status with the configured number of recent readings.
    pub async fn status(&self) -> StatusSnapshot {
        self.inner.state.lock().await.snapshot(self.inner.status_history_len)
    }

    /// Copy of the whole history buffer.
    pub async fn history(&self) -> HistoryBuffer {
        self.inner.state.lock().await.history().clone()
    }

    /// Set the target and return the effective, clamped value.
    pub async fn set_target(&self, target: f64) -> Result<f64, ControlError> {
        let effective = self.inner.state.lock().await.set_target_temperature(target)?;
        if effective != target {
            tracing::info!("Target {} clamped to {:.1}°C", target, effective);
        } else {
            tracing::info!("Target set to {:.1}°C", effective);
        }
        Ok(effective)
    }

    /// Switch between automatic and manual control.
    ///
    /// The heater keeps its state either way; the next sampling cycle picks up
    /// automatic control again. Waits for any in-flight heater command, so no
    /// command decided under the old mode lands after the switch.
    pub async fn set_auto_mode(&self, auto: bool) -> bool {
        let _gate = self.inner.command_gate.lock().await;
        let mut state = self.inner.state.lock().await;
        if state.auto_mode() != auto {
            tracing::info!("Switching to {} mode", if auto { "automatic" } else { "manual" });
        }
        state.set_auto_mode(auto);
        auto
    }

    /// Manually command the heater. Only allowed in manual mode.
    pub async fn set_heater(&self, on: bool) -> Result<bool, ControlError> {
        let _gate = self.inner.command_gate.lock().await;
        if self.inner.state.lock().await.auto_mode() {
            return Err(ControlError::InvalidRequest(
                "cannot control the heater manually in auto mode".to_string(),
            ));
        }

        self.command_heater(on)
            .await
            .map_err(ControlError::ActuatorCommandFailed)?;
        self.inner.state.lock().await.confirm_heater(on);
        tracing::info!("Heater turned {} manually", on_off(on));
        Ok(on)
    }

    /// Best-effort heater off, used when the host stops.
    pub async fn shutdown(&self) -> Result<(), ControlError> {
        let _gate = self.inner.command_gate.lock().await;
        self.command_heater(false)
            .await
            .map_err(ControlError::ActuatorCommandFailed)?;
        self.inner.state.lock().await.confirm_heater(false);
        tracing::info!("Heater switched off for shutdown");
        Ok(())
    }

    async fn read_sensor(&self) -> Result<f64, HardwareError> {
        let timeout = self.inner.port_timeout;
        match tokio::time::timeout(timeout, self.inner.sensor.read()).await {
            Ok(Ok(celsius)) if celsius.is_finite() => Ok(celsius),
            Ok(Ok(celsius)) => Err(HardwareError::InvalidReading(format!("non-finite value {}", celsius))),
            Ok(Err(e)) => Err(e),
            Err(_) => Err(HardwareError::Timeout(timeout)),
        }
    }

    async fn command_heater(&self, on: bool) -> Result<(), HardwareError> {
        let timeout = self.inner.port_timeout;
        match tokio::time::timeout(timeout, self.inner.heater.set(on)).await {
            Ok(result) => result,
            Err(_) => Err(HardwareError::Timeout(timeout)),
        }
    }
}

pub(crate) fn on_off(on: bool) -> &'static str {
    if on { "ON" } else { "OFF" }
}

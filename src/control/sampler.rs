// src/control/sampler.rs - Periodic sample / decide / act loop
use super::hysteresis::decide;
use super::{ControlError, Controller, Reading, on_off};
use chrono::Local;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// What one sampling cycle observed and did.
#[derive(Debug, Default)]
pub struct CycleOutcome {
    /// Reading taken this cycle, if the sensor answered.
    pub reading: Option<f64>,
    /// Heater state recorded at the end of the cycle.
    pub heater_on: bool,
    /// Command confirmed by the heater this cycle.
    pub commanded: Option<bool>,
    pub sensor_error: Option<ControlError>,
    pub actuator_error: Option<ControlError>,
}

impl Controller {
    /// Run one acquire / decide / act cycle. Port failures are reported in the
    /// outcome and never abort the cycle.
    pub async fn run_cycle(&self) -> CycleOutcome {
        let mut outcome = CycleOutcome::default();

        match self.read_sensor().await {
            Ok(celsius) => {
                self.inner
                    .state
                    .lock()
                    .await
                    .record_reading(Reading::new(Local::now(), celsius));
                tracing::debug!("Sampled {:.2}°C", celsius);
                outcome.reading = Some(celsius);
            }
            Err(e) => {
                tracing::warn!("Sensor read failed, keeping last known temperature: {}", e);
                outcome.sensor_error = Some(ControlError::SensorUnavailable(e));
            }
        }

        let _gate = self.inner.command_gate.lock().await;
        let (auto_mode, current, target, prior) = {
            let state = self.inner.state.lock().await;
            (
                state.auto_mode(),
                state.current_temperature(),
                state.target_temperature(),
                state.heater_on(),
            )
        };
        outcome.heater_on = prior;
        if !auto_mode {
            return outcome;
        }

        let next = decide(current, target, prior);
        if next == prior {
            return outcome;
        }

        match self.command_heater(next).await {
            Ok(()) => {
                self.inner.state.lock().await.confirm_heater(next);
                tracing::info!(
                    "Heater turned {} (current {:?}°C, target {:.1}°C)",
                    on_off(next),
                    current,
                    target
                );
                outcome.heater_on = next;
                outcome.commanded = Some(next);
            }
            Err(e) => {
                tracing::warn!("Heater command {} failed, will retry next cycle: {}", on_off(next), e);
                outcome.actuator_error = Some(ControlError::ActuatorCommandFailed(e));
            }
        }
        outcome
    }
}

/// Spawn the sampling loop. It runs one cycle per `period` until a message
/// arrives on `shutdown_rx` or its sender is dropped.
pub fn spawn_sampling_loop(
    controller: Controller,
    period: Duration,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> JoinHandle<()> {
    let period = period.max(Duration::from_millis(1));
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tracing::info!("Sampling loop started, period {:?}", period);
        loop {
            tokio::select! {
                biased;
                _ = shutdown_rx.recv() => {
                    tracing::info!("Sampling loop shutting down");
                    break;
                }
                _ = interval.tick() => {
                    controller.run_cycle().await;
                }
            }
        }
    })
}

//! Simulated and scripted hardware.
//!
//! `SimulatedRoom` is a first-order thermal model: the heater adds a fixed
//! rate, the room loses heat proportionally to its difference from ambient.

use super::{HardwareError, HeaterSwitch, TemperatureSensor};
use crate::config::SimulationConfig;
use async_trait::async_trait;
use rand::Rng;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

// integration step for the thermal model, simulated seconds
const MAX_STEP_SECS: f64 = 1.0;

#[derive(Debug)]
struct RoomState {
    temperature: f64,
    heater_on: bool,
    last_sync: Instant,
}

#[derive(Debug)]
pub struct SimulatedRoom {
    state: Mutex<RoomState>,
    ambient: f64,
    heat_rate: f64,
    loss_rate: f64,
    time_scale: f64,
}

impl SimulatedRoom {
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            state: Mutex::new(RoomState {
                temperature: config.initial_temp,
                heater_on: false,
                last_sync: Instant::now(),
            }),
            ambient: config.ambient_temp,
            heat_rate: config.heat_rate,
            loss_rate: config.loss_rate,
            time_scale: config.time_scale,
        }
    }

    pub async fn temperature(&self) -> f64 {
        self.state.lock().await.temperature
    }

    pub async fn heater_on(&self) -> bool {
        self.state.lock().await.heater_on
    }

    /// Advance the model by `dt` of simulated time.
    pub async fn step(&self, dt: Duration) {
        let mut state = self.state.lock().await;
        self.advance(&mut state, dt.as_secs_f64());
        state.last_sync = Instant::now();
    }

    /// Advance the model by the wall-clock time since the last sync, scaled.
    pub async fn sync(&self) {
        let mut state = self.state.lock().await;
        let now = Instant::now();
        let elapsed = now.duration_since(state.last_sync).as_secs_f64() * self.time_scale;
        self.advance(&mut state, elapsed);
        state.last_sync = now;
    }

    async fn set_heater(&self, on: bool) {
        self.sync().await;
        self.state.lock().await.heater_on = on;
    }

    fn advance(&self, state: &mut RoomState, mut secs: f64) {
        let gain = if state.heater_on { self.heat_rate } else { 0.0 };
        while secs > 0.0 {
            let h = secs.min(MAX_STEP_SECS);
            state.temperature += (gain - self.loss_rate * (state.temperature - self.ambient)) * h;
            secs -= h;
        }
    }
}

/// Reads the simulated room, with optional noise and dropouts.
pub struct SimulatedSensor {
    room: Arc<SimulatedRoom>,
    noise: f64,
    dropout_rate: f64,
    follow_clock: bool,
}

impl SimulatedSensor {
    /// Sensor whose room advances with the wall clock on every read.
    pub fn new(room: Arc<SimulatedRoom>, config: &SimulationConfig) -> Self {
        Self {
            room,
            noise: config.noise,
            dropout_rate: config.dropout_rate,
            follow_clock: true,
        }
    }

    /// Sensor whose room only advances through [`SimulatedRoom::step`].
    pub fn stepped(room: Arc<SimulatedRoom>, config: &SimulationConfig) -> Self {
        Self { follow_clock: false, ..Self::new(room, config) }
    }
}

#[async_trait]
impl TemperatureSensor for SimulatedSensor {
    async fn read(&self) -> Result<f64, HardwareError> {
        if self.follow_clock {
            self.room.sync().await;
        }
        let temperature = self.room.temperature().await;

        let mut rng = rand::rng();
        if self.dropout_rate > 0.0 && rng.random_bool(self.dropout_rate) {
            return Err(HardwareError::InvalidReading("checksum did not validate".into()));
        }
        let jitter = if self.noise > 0.0 { rng.random_range(-self.noise..=self.noise) } else { 0.0 };
        Ok(temperature + jitter)
    }

    fn name(&self) -> &str {
        "simulated"
    }
}

/// Heater that warms a [`SimulatedRoom`].
pub struct SimulatedHeater {
    room: Arc<SimulatedRoom>,
}

impl SimulatedHeater {
    pub fn new(room: Arc<SimulatedRoom>) -> Self {
        Self { room }
    }
}

#[async_trait]
impl HeaterSwitch for SimulatedHeater {
    async fn set(&self, on: bool) -> Result<(), HardwareError> {
        self.room.set_heater(on).await;
        Ok(())
    }

    fn name(&self) -> &str {
        "simulated"
    }
}

/// One scripted sensor response.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScriptStep {
    Reading(f64),
    Fail,
    /// Never completes; exercises the port timeout.
    Hang,
}

impl From<f64> for ScriptStep {
    fn from(value: f64) -> Self {
        ScriptStep::Reading(value)
    }
}

impl From<Option<f64>> for ScriptStep {
    fn from(value: Option<f64>) -> Self {
        value.map_or(ScriptStep::Fail, ScriptStep::Reading)
    }
}

/// Replays a fixed sequence of responses, then fails every read.
#[derive(Debug, Default)]
pub struct ScriptedSensor {
    script: Mutex<VecDeque<ScriptStep>>,
    reads: AtomicUsize,
}

impl ScriptedSensor {
    pub fn new<I, S>(steps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<ScriptStep>,
    {
        Self {
            script: Mutex::new(steps.into_iter().map(Into::into).collect()),
            reads: AtomicUsize::new(0),
        }
    }

    /// Queue more responses behind the remaining script.
    pub async fn push(&self, step: impl Into<ScriptStep>) {
        self.script.lock().await.push_back(step.into());
    }

    /// Number of `read` calls started so far.
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TemperatureSensor for ScriptedSensor {
    async fn read(&self) -> Result<f64, HardwareError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let step = self.script.lock().await.pop_front();
        match step {
            Some(ScriptStep::Reading(value)) => Ok(value),
            Some(ScriptStep::Fail) => Err(HardwareError::Fault("scripted sensor failure".into())),
            Some(ScriptStep::Hang) => std::future::pending().await,
            None => Err(HardwareError::Fault("sensor script exhausted".into())),
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Heater that only records what it was told, and can be made to fail.
#[derive(Debug, Default)]
pub struct RecordingHeater {
    commands: Mutex<Vec<bool>>,
    failing: AtomicBool,
}

impl RecordingHeater {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Commands that were accepted, in order.
    pub async fn commands(&self) -> Vec<bool> {
        self.commands.lock().await.clone()
    }
}

#[async_trait]
impl HeaterSwitch for RecordingHeater {
    async fn set(&self, on: bool) -> Result<(), HardwareError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(HardwareError::CommandFailed("relay did not acknowledge".into()));
        }
        self.commands.lock().await.push(on);
        Ok(())
    }

    fn name(&self) -> &str {
        "recording"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet_room() -> SimulationConfig {
        SimulationConfig {
            ambient_temp: 10.0,
            initial_temp: 18.0,
            heat_rate: 0.05,
            loss_rate: 0.01,
            noise: 0.0,
            dropout_rate: 0.0,
            time_scale: 1.0,
        }
    }

    #[tokio::test]
    async fn test_room_cools_toward_ambient_without_heat() {
        let room = SimulatedRoom::new(&quiet_room());
        room.step(Duration::from_secs(600)).await;
        let t = room.temperature().await;
        assert!(t < 18.0 && t > 10.0, "temperature {t} should decay toward ambient");
    }

    #[tokio::test]
    async fn test_heater_warms_room() {
        let config = quiet_room();
        let room = Arc::new(SimulatedRoom::new(&config));
        let heater = SimulatedHeater::new(room.clone());
        heater.set(true).await.unwrap();
        assert!(room.heater_on().await);
        room.step(Duration::from_secs(120)).await;
        assert!(room.temperature().await > 18.0);
    }

    #[tokio::test]
    async fn test_stepped_sensor_reads_room_exactly_without_noise() {
        let config = quiet_room();
        let room = Arc::new(SimulatedRoom::new(&config));
        let sensor = SimulatedSensor::stepped(room.clone(), &config);
        assert_eq!(sensor.read().await.unwrap(), 18.0);
    }

    #[tokio::test]
    async fn test_full_dropout_always_fails() {
        let config = SimulationConfig { dropout_rate: 1.0, ..quiet_room() };
        let room = Arc::new(SimulatedRoom::new(&config));
        let sensor = SimulatedSensor::stepped(room, &config);
        assert!(matches!(sensor.read().await, Err(HardwareError::InvalidReading(_))));
    }

    #[tokio::test]
    async fn test_scripted_sensor_replays_then_fails() {
        let sensor = ScriptedSensor::new([Some(21.0), None]);
        assert_eq!(sensor.read().await.unwrap(), 21.0);
        assert!(sensor.read().await.is_err());
        assert!(sensor.read().await.is_err());
        assert_eq!(sensor.reads(), 3);
    }

    #[tokio::test]
    async fn test_recording_heater_failure_is_not_recorded() {
        let heater = RecordingHeater::new();
        heater.set(true).await.unwrap();
        heater.set_failing(true);
        assert!(heater.set(false).await.is_err());
        assert_eq!(heater.commands().await, vec![true]);
    }
}

//! Contains the data models for API requests and responses.

use crate::control::{HistoryBuffer, Reading, StatusSnapshot};
use serde::{Deserialize, Serialize};

/// Round to one decimal place for display.
pub fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Represents the response for the /api/status endpoint.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StatusResponse {
    /// Last good reading, or null before the first one.
    pub current_temp: Option<f64>,
    pub target_temp: f64,
    pub heater_on: bool,
    pub auto_mode: bool,
    /// Most recent readings, oldest first.
    pub temp_history: Vec<HistoryEntry>,
}

impl From<StatusSnapshot> for StatusResponse {
    fn from(snapshot: StatusSnapshot) -> Self {
        Self {
            current_temp: snapshot.current_temperature.map(round_tenth),
            target_temp: round_tenth(snapshot.target_temperature),
            heater_on: snapshot.heater_on,
            auto_mode: snapshot.auto_mode,
            temp_history: snapshot.history.iter().map(HistoryEntry::from).collect(),
        }
    }
}

/// One reading as shown to clients.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    /// Local wall-clock time, `HH:MM:SS`.
    pub time: String,
    pub temp: f64,
}

impl From<&Reading> for HistoryEntry {
    fn from(reading: &Reading) -> Self {
        Self {
            time: reading.at.format("%H:%M:%S").to_string(),
            temp: round_tenth(reading.celsius),
        }
    }
}

/// Represents the response for the /api/history endpoint.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct HistoryResponse {
    pub capacity: usize,
    pub entries: Vec<HistoryEntry>,
}

impl From<&HistoryBuffer> for HistoryResponse {
    fn from(history: &HistoryBuffer) -> Self {
        Self {
            capacity: history.capacity(),
            entries: history.iter().map(HistoryEntry::from).collect(),
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct SetTargetRequest {
    pub target: f64,
}

#[derive(Serialize, Debug)]
pub struct SetTargetResponse {
    pub success: bool,
    pub target_temp: f64,
}

#[derive(Deserialize, Debug)]
pub struct SetModeRequest {
    pub auto: bool,
}

#[derive(Serialize, Debug)]
pub struct SetModeResponse {
    pub success: bool,
    pub auto_mode: bool,
}

#[derive(Deserialize, Debug)]
pub struct SetHeaterRequest {
    pub on: bool,
}

#[derive(Serialize, Debug)]
pub struct SetHeaterResponse {
    pub success: bool,
    pub heater_on: bool,
}

//! Single-zone space heater thermostat.
//!
//! A sampling loop reads a [`hardware::TemperatureSensor`], keeps a bounded
//! history, and drives a [`hardware::HeaterSwitch`] with a hysteresis rule.
//! An axum API exposes status and manual/automatic control.

pub mod config;
pub mod control;
pub mod hardware;
pub mod web;

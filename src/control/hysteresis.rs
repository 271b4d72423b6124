//! On/off decision with a dead band around the target.

/// Half-width of the dead band, °C.
pub const HYSTERESIS_BAND: f64 = 0.5;

/// Next heater output for a reading, target and the current output.
///
/// Without a reading the output never changes. At or below `target - 0.5` the
/// heater turns on, at or above `target + 0.5` it turns off, and anywhere in
/// between it keeps its prior state so the relay does not chatter.
pub fn decide(current: Option<f64>, target: f64, prior_output: bool) -> bool {
    match current {
        None => prior_output,
        Some(temp) if temp <= target - HYSTERESIS_BAND => true,
        Some(temp) if temp >= target + HYSTERESIS_BAND => false,
        Some(_) => prior_output,
    }
}

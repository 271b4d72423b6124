// src/hardware/temperature.rs - DS18B20 1-Wire sensor
use super::{HardwareError, TemperatureSensor};
use async_trait::async_trait;
use std::path::PathBuf;

/// DS18B20 read through the kernel `w1_therm` driver.
///
/// The `w1_slave` file holds two lines; the first ends in `YES` when the CRC
/// matched, the second carries `t=<millidegrees C>`.
#[derive(Debug, Clone)]
pub struct OneWireSensor {
    device: PathBuf,
}

impl OneWireSensor {
    pub fn new(device: PathBuf) -> Self {
        Self { device }
    }
}

#[async_trait]
impl TemperatureSensor for OneWireSensor {
    async fn read(&self) -> Result<f64, HardwareError> {
        let raw = tokio::fs::read_to_string(&self.device).await?;
        let celsius = parse_w1_slave(&raw)?;
        tracing::trace!("{}: {:.3}°C", self.device.display(), celsius);
        Ok(celsius)
    }

    fn name(&self) -> &str {
        "one_wire"
    }
}

/// Parse the contents of a `w1_slave` file into °C.
pub fn parse_w1_slave(raw: &str) -> Result<f64, HardwareError> {
    let mut lines = raw.lines();
    let crc_line = lines
        .next()
        .ok_or_else(|| HardwareError::InvalidReading("empty w1_slave output".into()))?;
    if !crc_line.trim_end().ends_with("YES") {
        return Err(HardwareError::InvalidReading(format!("CRC check failed: {}", crc_line.trim())));
    }

    let data_line = lines
        .next()
        .ok_or_else(|| HardwareError::InvalidReading("missing temperature line".into()))?;
    let millis = data_line
        .split_once("t=")
        .map(|(_, value)| value.trim())
        .ok_or_else(|| HardwareError::InvalidReading(format!("no t= field: {}", data_line.trim())))?;
    let millis: i64 = millis
        .parse()
        .map_err(|_| HardwareError::InvalidReading(format!("bad temperature value: {}", millis)))?;

    // 85000 is the power-on reset value, never a real measurement here
    if millis == 85_000 {
        return Err(HardwareError::InvalidReading("sensor returned power-on reset value".into()));
    }
    Ok(millis as f64 / 1000.0)
}

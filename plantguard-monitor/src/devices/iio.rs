//! Sense HAT sensors through the Linux IIO sysfs interface
//!
//! The HTS221 exposes `in_temp_*` and `in_humidityrelative_*` channels,
//! the TCS3472 colour sensor exposes `in_intensity_clear_*`. A channel's
//! value is `(raw + offset) * scale`; missing offset and scale files mean
//! 0 and 1. Temperature comes out in milli-degrees Celsius and humidity in
//! milli-percent, so both are divided by 1000.

use std::fs;
use std::path::{Path, PathBuf};

use plantguard_core::{errors::DeviceError, traits::SensorDevice};
use tracing::warn;

const TEMPERATURE: &str = "in_temp";
const HUMIDITY: &str = "in_humidityrelative";
const CLEAR_LIGHT: &str = "in_intensity_clear";

/// Temperature, humidity and light from two IIO devices
#[derive(Debug, Clone)]
pub struct IioSensor {
    env_device: PathBuf,
    light_device: PathBuf,
}

impl IioSensor {
    /// Sensor reading `env_device` for temperature/humidity and `light_device` for light
    pub fn new(env_device: impl Into<PathBuf>, light_device: impl Into<PathBuf>) -> Self {
        Self {
            env_device: env_device.into(),
            light_device: light_device.into(),
        }
    }
}

impl SensorDevice for IioSensor {
    fn read_temperature(&mut self) -> Result<f32, DeviceError> {
        read_channel(&self.env_device, TEMPERATURE, "temperature").map(|milli| milli / 1000.0)
    }

    fn read_humidity(&mut self) -> Result<f32, DeviceError> {
        read_channel(&self.env_device, HUMIDITY, "humidity").map(|milli| milli / 1000.0)
    }

    fn read_ambient_light(&mut self) -> Result<f32, DeviceError> {
        read_channel(&self.light_device, CLEAR_LIGHT, "light")
    }
}

fn read_channel(device: &Path, prefix: &str, channel: &'static str) -> Result<f32, DeviceError> {
    let raw = read_value(device, prefix, "raw", channel)?.ok_or(DeviceError::Read { channel })?;
    let offset = read_value(device, prefix, "offset", channel)?.unwrap_or(0.0);
    let scale = read_value(device, prefix, "scale", channel)?.unwrap_or(1.0);

    Ok((raw + offset) * scale)
}

// Ok(None) when the attribute file does not exist
fn read_value(device: &Path, prefix: &str, attribute: &str, channel: &'static str) -> Result<Option<f32>, DeviceError> {
    let path = device.join(format!("{}_{}", prefix, attribute));
    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "IIO read failed");
            return Err(DeviceError::Read { channel });
        }
    };

    text.trim().parse().map(Some).map_err(|_| {
        warn!(path = %path.display(), value = text.trim(), "IIO value is not a number");
        DeviceError::Read { channel }
    })
}

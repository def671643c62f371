//! Hardware interfaces
//!
//! ## Sensor
//!
//! Three channels, read once per cycle. Light is the raw clear channel of
//! a colour sensor; its scale depends on gain and integration time, which
//! is why the obstruction threshold is configurable.
//!
//! ## Display
//!
//! An 8x8 RGB matrix that can show a full frame or scroll a message.
//! Rotation is a device setting applied to everything drawn afterwards.

use crate::{
    errors::DeviceError,
    render::{Frame, Rgb},
};

/// Environmental sensor
pub trait SensorDevice {
    /// Air temperature
    fn read_temperature(&mut self) -> Result<f32, DeviceError>;

    /// Relative humidity (%)
    fn read_humidity(&mut self) -> Result<f32, DeviceError>;

    /// Raw ambient light (clear channel)
    fn read_ambient_light(&mut self) -> Result<f32, DeviceError>;
}

/// Display orientation in quarter turns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Rotation {
    /// Upright
    #[default]
    Deg0,
    /// Quarter turn clockwise
    Deg90,
    /// Upside down
    Deg180,
    /// Quarter turn anticlockwise
    Deg270,
}

impl Rotation {
    /// Parse a rotation in degrees; only multiples of 90 are valid
    pub const fn from_degrees(degrees: u16) -> Option<Self> {
        match degrees {
            0 => Some(Rotation::Deg0),
            90 => Some(Rotation::Deg90),
            180 => Some(Rotation::Deg180),
            270 => Some(Rotation::Deg270),
            _ => None,
        }
    }

    /// Rotation in degrees
    pub const fn degrees(&self) -> u16 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }
}

/// 8x8 LED matrix
pub trait DisplayDevice {
    /// Turn every pixel off
    fn clear(&mut self) -> Result<(), DeviceError>;

    /// Orientation for everything drawn afterwards
    fn set_rotation(&mut self, rotation: Rotation) -> Result<(), DeviceError>;

    /// Draw a full frame
    fn set_pixels(&mut self, frame: &Frame) -> Result<(), DeviceError>;

    /// Scroll `text` across the matrix; blocks until the scroll finishes
    fn show_message(&mut self, text: &str, scroll_speed: f32, color: Rgb)
        -> Result<(), DeviceError>;
}

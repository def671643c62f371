//! Device adapters for a Raspberry Pi with a Sense HAT

pub mod framebuffer;
pub mod iio;

pub use framebuffer::FramebufferDisplay;
pub use iio::IioSensor;

use plantguard_core::{
    errors::DeviceError,
    render::{Frame, Rgb},
    traits::{DisplayDevice, Rotation},
};
use tracing::info;

/// Stand-in display that logs what would have been shown
#[derive(Debug, Default, Clone, Copy)]
pub struct HeadlessDisplay;

impl DisplayDevice for HeadlessDisplay {
    fn clear(&mut self) -> Result<(), DeviceError> {
        Ok(())
    }

    fn set_rotation(&mut self, _rotation: Rotation) -> Result<(), DeviceError> {
        Ok(())
    }

    fn set_pixels(&mut self, _frame: &Frame) -> Result<(), DeviceError> {
        Ok(())
    }

    fn show_message(&mut self, text: &str, _scroll_speed: f32, color: Rgb) -> Result<(), DeviceError> {
        info!(text, r = color.r, g = color.g, b = color.b, "Status");
        Ok(())
    }
}

/// Display chosen at startup
#[derive(Debug, Clone)]
pub enum Display {
    Framebuffer(FramebufferDisplay),
    Headless(HeadlessDisplay),
}

impl Display {
    fn inner(&mut self) -> &mut dyn DisplayDevice {
        match self {
            Display::Framebuffer(fb) => fb,
            Display::Headless(headless) => headless,
        }
    }
}

impl DisplayDevice for Display {
    fn clear(&mut self) -> Result<(), DeviceError> {
        self.inner().clear()
    }

    fn set_rotation(&mut self, rotation: Rotation) -> Result<(), DeviceError> {
        self.inner().set_rotation(rotation)
    }

    fn set_pixels(&mut self, frame: &Frame) -> Result<(), DeviceError> {
        self.inner().set_pixels(frame)
    }

    fn show_message(&mut self, text: &str, scroll_speed: f32, color: Rgb) -> Result<(), DeviceError> {
        self.inner().show_message(text, scroll_speed, color)
    }
}

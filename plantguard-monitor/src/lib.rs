//! PlantGuard monitor daemon
//!
//! Wires the core monitor loop to a Raspberry Pi with a Sense HAT:
//!
//! - [`config`]: settings from the environment (and `.env`)
//! - [`devices`]: IIO sensor channels and the LED matrix framebuffer
//! - [`delay`]: blocking `DelayNs` on top of `std::thread::sleep`
//!
//! The record store and SMS transport come from `plantguard-connectors`.

pub mod config;
pub mod delay;
pub mod devices;

pub use config::{ConfigError, Settings, TwilioSettings};
pub use delay::StdDelay;
pub use devices::{Display, FramebufferDisplay, HeadlessDisplay, IioSensor};

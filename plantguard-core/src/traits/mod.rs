//! Collaborator Traits
//!
//! The monitor loop owns no hardware and no network client. Everything it
//! talks to is one of these traits, passed in at construction:
//!
//! - [`store`] - sensor, plant and user records
//! - [`device`] - environmental sensor and LED matrix
//! - [`notify`] - SMS / WhatsApp transport
//!
//! Pauses use [`embedded_hal::delay::DelayNs`] and timestamps come from
//! [`TimeSource`], so the same loop runs on a Raspberry Pi, on a
//! microcontroller, and inside tests with fakes.
//!
//! All methods take `&mut self`: collaborators are used from one thread,
//! one call at a time, and are free to keep connection state.

pub mod device;
pub mod notify;
pub mod store;

pub use device::{DisplayDevice, Rotation, SensorDevice};
pub use notify::{MessageId, NotificationTransport, PhoneNumber};
pub use store::{PlantStore, SensorRecord, SensorStore, SensorUpdate, UserStore};

pub use crate::time::TimeSource;
pub use embedded_hal::delay::DelayNs;

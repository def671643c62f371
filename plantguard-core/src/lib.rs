//! Core monitoring engine for PlantGuard
//!
//! Samples an environmental sensor, compares the reading against tolerance
//! bands derived from a plant's reference profile, renders a status on an
//! 8x8 LED matrix and raises edge-triggered alerts.
//!
//! Everything outside the evaluation loop (record store, sensor driver,
//! LED driver, SMS transport) is a collaborator trait in [`traits`], so the
//! loop runs the same against real hardware and against test fakes.
//!
//! Key constraints:
//! - No heap allocation (fixed-capacity `heapless` containers)
//! - One strictly sequential cycle at a time
//! - Alert history bounded by a compile-time capacity
//!
//! ```no_run
//! use plantguard_core::{classify, ReferenceProfile, Tier, ToleranceBands};
//!
//! let profile = ReferenceProfile::new(7, "basil", Some(20.0), Some(50.0));
//! let bands = ToleranceBands::from_profile(&profile).unwrap();
//!
//! assert_eq!(classify(16.0, &bands.temperature), Ok(Tier::FarBelow));
//! assert_eq!(classify(20.0, &bands.temperature), Ok(Tier::AtTarget));
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

#[macro_use]
mod macros;

pub mod alert;
pub mod classify;
pub mod config;
pub mod constants;
pub mod errors;
pub mod monitor;
pub mod profile;
pub mod render;
pub mod time;
pub mod traits;

// Public API
pub use alert::{AlertDecider, AlertKind, AlertRecord};
pub use classify::{classify, Metric, Tier};
pub use config::{MonitorConfig, Recipient};
pub use errors::{
    ClassificationError, CycleError, DeviceError, InvalidProfileError, StoreError,
    TransportError,
};
pub use monitor::{AlertDispatch, CycleReport, Monitor};
pub use profile::{Band, ReferenceProfile, Reading, ToleranceBands};
pub use render::{render_status, Icon, Rgb, StatusLine, StatusPayload};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! Monitor configuration
//!
//! Defaults come from [`constants`](crate::constants); a deployment overrides
//! them with the builder setters:
//!
//! ```rust
//! use plantguard_core::{MonitorConfig, Recipient};
//! use plantguard_core::traits::Rotation;
//!
//! let config = MonitorConfig::new(3)
//!     .user_id(12)
//!     .recipient(Recipient::fixed("whatsapp:+447700900123").unwrap())
//!     .cycle_interval_ms(60_000)
//!     .rotation(Rotation::Deg0);
//!
//! assert_eq!(config.sensor_id, 3);
//! ```

use crate::{
    constants::{
        CYCLE_INTERVAL_MS, DEFAULT_SENSOR_ID, DEFAULT_USER_ID, DISPLAY_ROTATION_DEG,
        OBSTRUCTION_LIGHT_THRESHOLD, OBSTRUCTION_PAUSE_MS, SCROLL_SPEED_S,
    },
    profile::{SensorId, UserId},
    traits::{PhoneNumber, Rotation},
};

/// Where alerts are sent
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Recipient {
    /// No recipient; alerts are decided and logged but not sent
    #[default]
    None,
    /// Always this number
    Fixed(PhoneNumber),
    /// Look up the sensor owner's number through the user store
    SensorOwner,
}

impl Recipient {
    /// Fixed recipient, `None` if the number does not fit
    pub fn fixed(number: &str) -> Option<Self> {
        PhoneNumber::try_from(number).ok().map(Recipient::Fixed)
    }
}

/// Settings for one monitor loop
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorConfig {
    /// Sensor this loop watches
    pub sensor_id: SensorId,
    /// Owner written with every reading when the sensor row has none
    pub user_id: UserId,
    /// Alert destination
    pub recipient: Recipient,
    /// Light level below which the sensor counts as covered
    pub obstruction_threshold: f32,
    /// Pause after drawing the obstruction icon (ms)
    pub obstruction_pause_ms: u32,
    /// Pause between cycles (ms)
    pub cycle_interval_ms: u32,
    /// Display orientation applied before the status text
    pub rotation: Rotation,
    /// Seconds per scrolled column
    pub scroll_speed: f32,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            sensor_id: DEFAULT_SENSOR_ID,
            user_id: DEFAULT_USER_ID,
            recipient: Recipient::None,
            obstruction_threshold: OBSTRUCTION_LIGHT_THRESHOLD,
            obstruction_pause_ms: OBSTRUCTION_PAUSE_MS,
            cycle_interval_ms: CYCLE_INTERVAL_MS,
            rotation: Rotation::from_degrees(DISPLAY_ROTATION_DEG).unwrap_or_default(),
            scroll_speed: SCROLL_SPEED_S,
        }
    }
}

impl MonitorConfig {
    /// Defaults for `sensor_id`
    pub fn new(sensor_id: SensorId) -> Self {
        Self {
            sensor_id,
            ..Self::default()
        }
    }

    /// Set the fallback owner id
    pub fn user_id(mut self, user_id: UserId) -> Self {
        self.user_id = user_id;
        self
    }

    /// Set the alert destination
    pub fn recipient(mut self, recipient: Recipient) -> Self {
        self.recipient = recipient;
        self
    }

    /// Set the obstruction light threshold
    pub fn obstruction_threshold(mut self, threshold: f32) -> Self {
        self.obstruction_threshold = threshold;
        self
    }

    /// Set the pause after the obstruction icon
    pub fn obstruction_pause_ms(mut self, ms: u32) -> Self {
        self.obstruction_pause_ms = ms;
        self
    }

    /// Set the pause between cycles
    pub fn cycle_interval_ms(mut self, ms: u32) -> Self {
        self.cycle_interval_ms = ms;
        self
    }

    /// Set the display orientation
    pub fn rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    /// Set the scroll speed
    pub fn scroll_speed(mut self, seconds_per_column: f32) -> Self {
        self.scroll_speed = seconds_per_column;
        self
    }
}

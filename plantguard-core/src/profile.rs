//! Reference Profiles and Tolerance Bands
//!
//! ## Overview
//!
//! Every plant in the store carries a target temperature and a target
//! relative humidity. The monitor widens each target into a band:
//!
//! ```text
//! temperature: target ± 3         (absolute, sensor units)
//! humidity:    target ± 10%·target (relative)
//!
//! target temp = 20, target hum = 50
//!   temperature band = (17, 20, 23)
//!   humidity band    = (45, 50, 55)
//! ```
//!
//! Bands are derived again on every cycle from whatever profile the store
//! returns, so editing a plant's targets takes effect on the next cycle.
//!
//! ## Invariant
//!
//! A band always satisfies `min <= target <= max`. Missing, non-finite and
//! negative targets are rejected before any arithmetic happens, which is
//! what makes the ordering hold for the relative humidity band.

use heapless::String;

use crate::{
    constants::{HUMIDITY_TOLERANCE_PCT, MAX_PLANT_NAME, TEMP_TOLERANCE_ABS},
    errors::InvalidProfileError,
};

/// Sensor record id
pub type SensorId = u32;

/// Plant record id
pub type PlantId = u32;

/// User record id
pub type UserId = u32;

/// Plant name as kept in a profile
pub type PlantName = String<MAX_PLANT_NAME>;

/// Target conditions for one plant, as returned by the store
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceProfile {
    /// Plant record id
    pub plant_id: PlantId,
    /// Display name, used in alert messages
    pub name: PlantName,
    /// Target temperature, `None` when the store row has none
    pub target_temperature: Option<f32>,
    /// Target relative humidity (%), `None` when the store row has none
    pub target_humidity: Option<f32>,
}

impl ReferenceProfile {
    /// Build a profile, truncating `name` on a char boundary if it is too long
    pub fn new(
        plant_id: PlantId,
        name: &str,
        target_temperature: Option<f32>,
        target_humidity: Option<f32>,
    ) -> Self {
        Self {
            plant_id,
            name: truncated_name(name),
            target_temperature,
            target_humidity,
        }
    }
}

/// Copy as much of `name` as fits without splitting a character
pub fn truncated_name(name: &str) -> PlantName {
    let mut out = PlantName::new();
    for ch in name.chars() {
        if out.push(ch).is_err() {
            break;
        }
    }
    out
}

/// The (min, target, max) triple bounding acceptable values for a metric
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    /// Lower edge; values below are far out of tolerance
    pub min: f32,
    /// Ideal value
    pub target: f32,
    /// Upper edge; values at or above are far out of tolerance
    pub max: f32,
}

impl Band {
    /// Symmetric band with an absolute half-width
    pub fn absolute(target: f32, half_width: f32) -> Self {
        Self {
            min: target - half_width,
            target,
            max: target + half_width,
        }
    }

    /// Symmetric band whose half-width is `pct` percent of the target
    pub fn relative(target: f32, pct: f32) -> Self {
        let half_width = target * pct / 100.0;
        Self {
            min: target - half_width,
            target,
            max: target + half_width,
        }
    }
}

/// Temperature and humidity bands for one plant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToleranceBands {
    /// Temperature band (absolute offset)
    pub temperature: Band,
    /// Humidity band (relative offset)
    pub humidity: Band,
}

impl ToleranceBands {
    /// Derive bands from a reference profile
    ///
    /// Fails if either target is missing, non-finite or negative.
    pub fn from_profile(profile: &ReferenceProfile) -> Result<Self, InvalidProfileError> {
        let temperature = checked_target("temperature", profile.target_temperature)?;
        let humidity = checked_target("humidity", profile.target_humidity)?;

        Ok(Self {
            temperature: Band::absolute(temperature, TEMP_TOLERANCE_ABS),
            humidity: Band::relative(humidity, HUMIDITY_TOLERANCE_PCT),
        })
    }
}

fn checked_target(metric: &'static str, target: Option<f32>) -> Result<f32, InvalidProfileError> {
    let value = target.ok_or(InvalidProfileError::MissingTarget { metric })?;
    if !value.is_finite() {
        return Err(InvalidProfileError::NonFiniteTarget { metric });
    }
    if value < 0.0 {
        return Err(InvalidProfileError::NegativeTarget { metric, value });
    }
    Ok(value)
}

/// One sample from the sensor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    /// Air temperature
    pub temperature: f32,
    /// Relative humidity (%)
    pub humidity: f32,
    /// Raw clear-channel light level
    pub light: f32,
}

impl Reading {
    /// Whether the light path looks covered
    ///
    /// A non-finite light level never counts as an obstruction.
    pub fn is_obstructed(&self, threshold: f32) -> bool {
        self.light.is_finite() && self.light < threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(temp: Option<f32>, hum: Option<f32>) -> ReferenceProfile {
        ReferenceProfile::new(1, "cabbage", temp, hum)
    }

    #[test]
    fn reference_bands() {
        let bands = ToleranceBands::from_profile(&profile(Some(20.0), Some(50.0))).unwrap();

        assert_eq!(bands.temperature, Band { min: 17.0, target: 20.0, max: 23.0 });
        assert_eq!(bands.humidity, Band { min: 45.0, target: 50.0, max: 55.0 });
    }

    #[test]
    fn zero_targets_collapse_humidity_band() {
        let bands = ToleranceBands::from_profile(&profile(Some(0.0), Some(0.0))).unwrap();

        assert_eq!(bands.temperature.min, -3.0);
        assert_eq!(bands.humidity, Band { min: 0.0, target: 0.0, max: 0.0 });
    }

    #[test]
    fn missing_target_rejected() {
        let err = ToleranceBands::from_profile(&profile(None, Some(50.0))).unwrap_err();
        assert_eq!(err, InvalidProfileError::MissingTarget { metric: "temperature" });

        let err = ToleranceBands::from_profile(&profile(Some(20.0), None)).unwrap_err();
        assert_eq!(err, InvalidProfileError::MissingTarget { metric: "humidity" });
    }

    #[test]
    fn non_finite_target_rejected() {
        let err = ToleranceBands::from_profile(&profile(Some(f32::NAN), Some(50.0))).unwrap_err();
        assert_eq!(err, InvalidProfileError::NonFiniteTarget { metric: "temperature" });

        let err =
            ToleranceBands::from_profile(&profile(Some(20.0), Some(f32::INFINITY))).unwrap_err();
        assert_eq!(err, InvalidProfileError::NonFiniteTarget { metric: "humidity" });
    }

    #[test]
    fn negative_target_rejected() {
        let err = ToleranceBands::from_profile(&profile(Some(-5.0), Some(50.0))).unwrap_err();
        assert!(matches!(err, InvalidProfileError::NegativeTarget { metric: "temperature", .. }));
    }

    #[test]
    fn long_names_truncate_on_char_boundary() {
        let name = "ü".repeat(40);
        let p = ReferenceProfile::new(3, &name, Some(1.0), Some(1.0));

        // 'ü' is two bytes, so 16 of them fill the 32 byte name
        assert_eq!(p.name.chars().count(), 16);
    }

    #[test]
    fn obstruction_threshold_is_exclusive() {
        let reading = |light| Reading { temperature: 20.0, humidity: 50.0, light };

        assert!(reading(40.0).is_obstructed(50.0));
        assert!(!reading(50.0).is_obstructed(50.0));
        assert!(!reading(f32::NAN).is_obstructed(50.0));
    }
}

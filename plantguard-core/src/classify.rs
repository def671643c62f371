//! Tier Classification
//!
//! Maps a reading onto one of five ordered tiers relative to its band:
//!
//! ```text
//!        FarBelow   │    Below    │ AtTarget │    Above    │  FarAbove
//!   ────────────────┼─────────────┼────●─────┼─────────────┼───────────
//!                  min                target                max
//!
//!   value <  min           -> FarBelow
//!   min   <= value < target -> Below
//!   value == target         -> AtTarget   (exact equality wins)
//!   target < value < max   -> Above
//!   value >= max           -> FarAbove
//! ```
//!
//! `max` is the inclusive trigger for `FarAbove` while `min` is exclusive
//! for `FarBelow`: humidity exactly at `max` is already `FarAbove`, while
//! a value exactly at `min` is only `Below`.
//!
//! Classification is metric-agnostic. Temperature and humidity use the
//! same tiers and only differ in how they are coloured, see
//! [`Metric::color`].

use crate::{
    errors::ClassificationError,
    profile::Band,
    render::{Rgb, BLUE, GREEN, LIGHT_BLUE, RED, YELLOW},
};

/// Position of a reading relative to its band
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Tier {
    /// Strictly below `min`
    FarBelow,
    /// In `[min, target)`
    Below,
    /// Exactly `target`
    AtTarget,
    /// In `(target, max)`
    Above,
    /// At or above `max`
    FarAbove,
}

impl Tier {
    /// Human-readable name
    pub const fn name(&self) -> &'static str {
        match self {
            Tier::FarBelow => "far below",
            Tier::Below => "below",
            Tier::AtTarget => "at target",
            Tier::Above => "above",
            Tier::FarAbove => "far above",
        }
    }
}

/// Classify `value` against `band`
pub fn classify(value: f32, band: &Band) -> Result<Tier, ClassificationError> {
    if !value.is_finite() {
        return Err(ClassificationError::NonFinite { value });
    }

    #[allow(clippy::float_cmp)]
    let tier = if value == band.target {
        Tier::AtTarget
    } else if value < band.min {
        Tier::FarBelow
    } else if value < band.target {
        Tier::Below
    } else if value < band.max {
        Tier::Above
    } else {
        Tier::FarAbove
    };

    Ok(tier)
}

/// Measured quantity, decides colour semantics and unit suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    /// Cold is blue, hot is red
    Temperature,
    /// Dry is red, wet is blue
    Humidity,
}

impl Metric {
    /// Suffix appended to rendered values
    pub const fn unit(&self) -> &'static str {
        match self {
            Metric::Temperature => "C",
            Metric::Humidity => "%",
        }
    }

    /// Text colour for a tier
    ///
    /// Humidity runs the temperature scale backwards: too dry is the
    /// dangerous end, so it gets red.
    pub const fn color(&self, tier: Tier) -> Rgb {
        match (self, tier) {
            (Metric::Temperature, Tier::FarBelow) => BLUE,
            (Metric::Temperature, Tier::Below) => LIGHT_BLUE,
            (Metric::Temperature, Tier::AtTarget) => GREEN,
            (Metric::Temperature, Tier::Above) => YELLOW,
            (Metric::Temperature, Tier::FarAbove) => RED,
            (Metric::Humidity, Tier::FarBelow) => RED,
            (Metric::Humidity, Tier::Below) => YELLOW,
            (Metric::Humidity, Tier::AtTarget) => GREEN,
            (Metric::Humidity, Tier::Above) => LIGHT_BLUE,
            (Metric::Humidity, Tier::FarAbove) => BLUE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMP: Band = Band { min: 17.0, target: 20.0, max: 23.0 };
    const HUM: Band = Band { min: 45.0, target: 50.0, max: 55.0 };

    #[test]
    fn tiers_across_temperature_band() {
        assert_eq!(classify(16.0, &TEMP), Ok(Tier::FarBelow));
        assert_eq!(classify(17.0, &TEMP), Ok(Tier::Below));
        assert_eq!(classify(19.9, &TEMP), Ok(Tier::Below));
        assert_eq!(classify(20.0, &TEMP), Ok(Tier::AtTarget));
        assert_eq!(classify(22.9, &TEMP), Ok(Tier::Above));
        assert_eq!(classify(23.0, &TEMP), Ok(Tier::FarAbove));
        assert_eq!(classify(40.0, &TEMP), Ok(Tier::FarAbove));
    }

    #[test]
    fn humidity_at_max_is_far_above() {
        assert_eq!(classify(55.0, &HUM), Ok(Tier::FarAbove));
        assert_eq!(classify(45.0, &HUM), Ok(Tier::Below));
    }

    #[test]
    fn target_wins_on_collapsed_band() {
        let band = Band { min: 0.0, target: 0.0, max: 0.0 };

        assert_eq!(classify(0.0, &band), Ok(Tier::AtTarget));
        assert_eq!(classify(-0.1, &band), Ok(Tier::FarBelow));
        assert_eq!(classify(0.1, &band), Ok(Tier::FarAbove));
    }

    #[test]
    fn non_finite_rejected() {
        assert!(matches!(classify(f32::NAN, &TEMP), Err(ClassificationError::NonFinite { .. })));
        assert_eq!(
            classify(f32::NEG_INFINITY, &TEMP),
            Err(ClassificationError::NonFinite { value: f32::NEG_INFINITY })
        );
    }

    #[test]
    fn tiers_are_ordered() {
        assert!(Tier::FarBelow < Tier::Below);
        assert!(Tier::AtTarget < Tier::FarAbove);
    }

    #[test]
    fn humidity_colors_are_inverted() {
        assert_eq!(Metric::Temperature.color(Tier::FarBelow), BLUE);
        assert_eq!(Metric::Humidity.color(Tier::FarBelow), RED);
        assert_eq!(Metric::Temperature.color(Tier::Above), YELLOW);
        assert_eq!(Metric::Humidity.color(Tier::Above), LIGHT_BLUE);
        assert_eq!(Metric::Humidity.color(Tier::AtTarget), GREEN);
    }
}

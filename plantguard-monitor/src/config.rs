//! Daemon settings
//!
//! Loaded from the process environment after `.env` has been applied.
//!
//! | Env Var                    | Required | Default                          |
//! |----------------------------|----------|----------------------------------|
//! | `DATABASE_URL`             | yes      | --                               |
//! | `DATABASE_KEY`             | yes      | --                               |
//! | `TWILIO_ACCOUNT_SID`       | yes      | --                               |
//! | `TWILIO_AUTH_TOKEN`        | yes      | --                               |
//! | `TWILIO_FROM`              | yes      | --                               |
//! | `ALERT_RECIPIENT`          | no       | none (alerts are only logged)    |
//! | `ALERT_RECIPIENT_FROM_USER`| no       | `false`                          |
//! | `SENSOR_ID`                | no       | `1`                              |
//! | `USER_ID`                  | no       | `1`                              |
//! | `OBSTRUCTION_THRESHOLD`    | no       | `50`                             |
//! | `OBSTRUCTION_PAUSE_SECS`   | no       | `3`                              |
//! | `CYCLE_INTERVAL_SECS`      | no       | `10`                             |
//! | `DISPLAY_ROTATION`         | no       | `180`                            |
//! | `SCROLL_SPEED`             | no       | `0.1`                            |
//! | `IIO_ENV_DEVICE`           | no       | `/sys/bus/iio/devices/iio:device0` |
//! | `IIO_LIGHT_DEVICE`         | no       | `/sys/bus/iio/devices/iio:device1` |
//! | `FRAMEBUFFER`              | no       | `/dev/fb1`, `none` for headless  |

use std::path::PathBuf;

use plantguard_core::{traits::Rotation, MonitorConfig, Recipient};
use thiserror::Error;

const DEFAULT_ENV_DEVICE: &str = "/sys/bus/iio/devices/iio:device0";
const DEFAULT_LIGHT_DEVICE: &str = "/sys/bus/iio/devices/iio:device1";
const DEFAULT_FRAMEBUFFER: &str = "/dev/fb1";

/// Invalid or missing setting
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    Missing(&'static str),

    #[error("{key}={value:?} is invalid: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: &'static str,
    },
}

/// Twilio account used for alerts
#[derive(Debug, Clone, PartialEq)]
pub struct TwilioSettings {
    pub account_sid: String,
    pub auth_token: String,
    pub from: String,
}

/// Everything the daemon needs to start
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Supabase project URL
    pub database_url: String,
    /// Supabase API key
    pub database_key: String,
    pub twilio: TwilioSettings,
    /// Monitor loop settings
    pub monitor: MonitorConfig,
    /// IIO device with temperature and humidity channels
    pub env_device: PathBuf,
    /// IIO device with the clear light channel
    pub light_device: PathBuf,
    /// LED matrix framebuffer, `None` when running headless
    pub framebuffer: Option<PathBuf>,
}

impl Settings {
    /// Load settings from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings through `lookup`, which returns a variable's value if set
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &'static str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let required = |key: &'static str| var(key).ok_or(ConfigError::Missing(key));

        let database_url = required("DATABASE_URL")?;
        let database_key = required("DATABASE_KEY")?;
        let twilio = TwilioSettings {
            account_sid: required("TWILIO_ACCOUNT_SID")?,
            auth_token: required("TWILIO_AUTH_TOKEN")?,
            from: required("TWILIO_FROM")?,
        };

        let defaults = MonitorConfig::default();
        let sensor_id = parse_or("SENSOR_ID", var("SENSOR_ID"), defaults.sensor_id)?;
        let user_id = parse_or("USER_ID", var("USER_ID"), defaults.user_id)?;

        let threshold: f32 = parse_or("OBSTRUCTION_THRESHOLD", var("OBSTRUCTION_THRESHOLD"), defaults.obstruction_threshold)?;
        if !threshold.is_finite() {
            return Err(invalid("OBSTRUCTION_THRESHOLD", threshold, "must be a finite number"));
        }

        let pause_ms = secs_to_ms("OBSTRUCTION_PAUSE_SECS", var("OBSTRUCTION_PAUSE_SECS"), defaults.obstruction_pause_ms)?;
        let interval_ms = secs_to_ms("CYCLE_INTERVAL_SECS", var("CYCLE_INTERVAL_SECS"), defaults.cycle_interval_ms)?;

        let rotation = match var("DISPLAY_ROTATION") {
            None => defaults.rotation,
            Some(value) => value
                .parse()
                .ok()
                .and_then(Rotation::from_degrees)
                .ok_or_else(|| invalid("DISPLAY_ROTATION", &value, "must be 0, 90, 180 or 270"))?,
        };

        let scroll_speed: f32 = parse_or("SCROLL_SPEED", var("SCROLL_SPEED"), defaults.scroll_speed)?;
        if !scroll_speed.is_finite() || scroll_speed < 0.0 {
            return Err(invalid("SCROLL_SPEED", scroll_speed, "must be a non-negative number of seconds"));
        }

        let recipient = recipient(var("ALERT_RECIPIENT"), var("ALERT_RECIPIENT_FROM_USER"))?;

        let monitor = MonitorConfig::new(sensor_id)
            .user_id(user_id)
            .recipient(recipient)
            .obstruction_threshold(threshold)
            .obstruction_pause_ms(pause_ms)
            .cycle_interval_ms(interval_ms)
            .rotation(rotation)
            .scroll_speed(scroll_speed);

        let framebuffer = match var("FRAMEBUFFER") {
            Some(path) if path.eq_ignore_ascii_case("none") => None,
            Some(path) => Some(PathBuf::from(path)),
            None => Some(PathBuf::from(DEFAULT_FRAMEBUFFER)),
        };

        Ok(Self {
            database_url,
            database_key,
            twilio,
            monitor,
            env_device: var("IIO_ENV_DEVICE").unwrap_or_else(|| DEFAULT_ENV_DEVICE.into()).into(),
            light_device: var("IIO_LIGHT_DEVICE").unwrap_or_else(|| DEFAULT_LIGHT_DEVICE.into()).into(),
            framebuffer,
        })
    }
}

fn recipient(fixed: Option<String>, from_user: Option<String>) -> Result<Recipient, ConfigError> {
    let from_user = match from_user.as_deref().map(str::to_ascii_lowercase).as_deref() {
        None | Some("false") | Some("0") | Some("no") => false,
        Some("true") | Some("1") | Some("yes") => true,
        Some(_) => {
            return Err(invalid("ALERT_RECIPIENT_FROM_USER", from_user.unwrap_or_default(), "must be true or false"))
        }
    };

    match (fixed, from_user) {
        (Some(_), true) => Err(ConfigError::Invalid {
            key: "ALERT_RECIPIENT",
            value: "set together with ALERT_RECIPIENT_FROM_USER".into(),
            reason: "choose one recipient source",
        }),
        (Some(number), false) => {
            Recipient::fixed(&number).ok_or_else(|| invalid("ALERT_RECIPIENT", &number, "phone number is too long"))
        }
        (None, true) => Ok(Recipient::SensorOwner),
        (None, false) => Ok(Recipient::None),
    }
}

fn parse_or<T: std::str::FromStr>(key: &'static str, value: Option<String>, default: T) -> Result<T, ConfigError> {
    match value {
        None => Ok(default),
        Some(v) => v.parse().map_err(|_| invalid(key, &v, "not a valid number")),
    }
}

fn secs_to_ms(key: &'static str, value: Option<String>, default_ms: u32) -> Result<u32, ConfigError> {
    match value {
        None => Ok(default_ms),
        Some(v) => {
            let secs: u32 = v.parse().map_err(|_| invalid(key, &v, "not a whole number of seconds"))?;
            secs.checked_mul(1000).ok_or_else(|| invalid(key, &v, "too large"))
        }
    }
}

fn invalid(key: &'static str, value: impl ToString, reason: &'static str) -> ConfigError {
    ConfigError::Invalid {
        key,
        value: value.to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let mut map: HashMap<String, String> = [
            ("DATABASE_URL", "https://project.supabase.co"),
            ("DATABASE_KEY", "service-key"),
            ("TWILIO_ACCOUNT_SID", "AC123"),
            ("TWILIO_AUTH_TOKEN", "secret"),
            ("TWILIO_FROM", "whatsapp:+14155238886"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        for (k, v) in pairs {
            map.insert(k.to_string(), v.to_string());
        }
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_follow_monitor_config() {
        let settings = Settings::from_lookup(env(&[])).unwrap();

        assert_eq!(settings.monitor, MonitorConfig::default());
        assert_eq!(settings.framebuffer, Some(PathBuf::from("/dev/fb1")));
        assert_eq!(settings.env_device, PathBuf::from(DEFAULT_ENV_DEVICE));
        assert_eq!(settings.twilio.from, "whatsapp:+14155238886");
    }

    #[test]
    fn missing_credentials_are_reported() {
        let err = Settings::from_lookup(env(&[("DATABASE_KEY", "  ")])).unwrap_err();

        assert_eq!(err, ConfigError::Missing("DATABASE_KEY"));
    }

    #[test]
    fn overrides_are_parsed() {
        let settings = Settings::from_lookup(env(&[
            ("SENSOR_ID", "4"),
            ("USER_ID", "9"),
            ("OBSTRUCTION_THRESHOLD", "85"),
            ("OBSTRUCTION_PAUSE_SECS", "1"),
            ("CYCLE_INTERVAL_SECS", "60"),
            ("DISPLAY_ROTATION", "0"),
            ("SCROLL_SPEED", "0.05"),
            ("FRAMEBUFFER", "none"),
        ]))
        .unwrap();

        let monitor = &settings.monitor;
        assert_eq!(monitor.sensor_id, 4);
        assert_eq!(monitor.user_id, 9);
        assert_eq!(monitor.obstruction_threshold, 85.0);
        assert_eq!(monitor.obstruction_pause_ms, 1_000);
        assert_eq!(monitor.cycle_interval_ms, 60_000);
        assert_eq!(monitor.rotation, Rotation::Deg0);
        assert_eq!(monitor.scroll_speed, 0.05);
        assert_eq!(settings.framebuffer, None);
    }

    #[test]
    fn bad_rotation_is_rejected() {
        let err = Settings::from_lookup(env(&[("DISPLAY_ROTATION", "45")])).unwrap_err();

        assert!(matches!(err, ConfigError::Invalid { key: "DISPLAY_ROTATION", .. }));
    }

    #[test]
    fn bad_numbers_are_rejected() {
        assert!(Settings::from_lookup(env(&[("SENSOR_ID", "abc")])).is_err());
        assert!(Settings::from_lookup(env(&[("SCROLL_SPEED", "-1")])).is_err());
        assert!(Settings::from_lookup(env(&[("CYCLE_INTERVAL_SECS", "5000000")])).is_err());
        assert!(Settings::from_lookup(env(&[("OBSTRUCTION_THRESHOLD", "NaN")])).is_err());
    }

    #[test]
    fn recipient_sources() {
        let fixed = Settings::from_lookup(env(&[("ALERT_RECIPIENT", "whatsapp:+447700900123")])).unwrap();
        assert_eq!(fixed.monitor.recipient, Recipient::fixed("whatsapp:+447700900123").unwrap());

        let owner = Settings::from_lookup(env(&[("ALERT_RECIPIENT_FROM_USER", "TRUE")])).unwrap();
        assert_eq!(owner.monitor.recipient, Recipient::SensorOwner);

        let both = Settings::from_lookup(env(&[
            ("ALERT_RECIPIENT", "+447700900123"),
            ("ALERT_RECIPIENT_FROM_USER", "true"),
        ]));
        assert!(both.is_err());

        assert!(Settings::from_lookup(env(&[("ALERT_RECIPIENT_FROM_USER", "maybe")])).is_err());
    }
}

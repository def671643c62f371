//! Edge-Triggered Alert De-duplication
//!
//! ## Problem
//!
//! A fault such as a covered sensor usually lasts many cycles. Sending an
//! SMS on every cycle while it persists floods the owner's phone, so an
//! alert only fires when its condition *rises*:
//!
//! ```text
//! cycle:      0      1     2     3     4      5
//! condition:  false  true  true  true  false  true
//! dispatch:          ✓                        ✓
//! ```
//!
//! A false condition re-arms the (sensor, kind) pair so the next rising
//! edge fires again.
//!
//! ## State
//!
//! One [`AlertRecord`] per (sensor, kind) pair, kept in a fixed-capacity
//! map. When the map is full and a new pair shows up, the record that has
//! been quiet longest is evicted, preferring pairs whose condition is not
//! currently active. History is process memory only; a restart re-arms
//! every pair.
//!
//! ## Dispatch failures
//!
//! The decider records a dispatch before the transport is called, and a
//! failed send does not roll that back. An alert is sent-or-attempted once
//! per rising edge.

use core::fmt::Write;

use heapless::{FnvIndexMap, String};

use crate::{
    constants::{MAX_ALERT_BODY, MAX_ALERT_HISTORY},
    profile::SensorId,
    time::Timestamp,
};

/// Alert body, one SMS segment
pub type AlertBody = String<MAX_ALERT_BODY>;

/// Kinds of alert the monitor raises
///
/// A high-temperature kind is intentionally absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlertKind {
    /// Light level below the obstruction threshold
    Obstruction,
    /// Temperature below the band minimum
    LowTemperature,
}

impl AlertKind {
    /// Human-readable name
    pub const fn name(&self) -> &'static str {
        match self {
            AlertKind::Obstruction => "sensor blocked",
            AlertKind::LowTemperature => "low temperature",
        }
    }

    /// Message body naming the plant
    ///
    /// Falls back to a body without the name if it does not fit.
    pub fn body(&self, plant_name: &str) -> AlertBody {
        let mut body = AlertBody::new();
        let written = match self {
            AlertKind::Obstruction => {
                write!(body, "The sensor for the {} is blocked.", plant_name)
            }
            AlertKind::LowTemperature => {
                write!(body, "The temperature is too low for the {}.", plant_name)
            }
        };

        if written.is_err() {
            body.clear();
            // Both fallbacks are far below the body capacity
            let _ = body.push_str(self.fallback_body());
        }
        body
    }

    const fn fallback_body(&self) -> &'static str {
        match self {
            AlertKind::Obstruction => "The plant sensor is blocked.",
            AlertKind::LowTemperature => "The temperature is too low for the plant.",
        }
    }
}

/// History of one (sensor, kind) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlertRecord {
    /// Condition held on the last check
    pub active: bool,
    /// When the last alert was dispatched
    pub last_dispatched: Timestamp,
    /// Alerts dispatched since the record was created
    pub dispatch_count: u32,
}

type AlertKey = (SensorId, AlertKind);

/// Decides whether an alert must be dispatched this cycle
#[derive(Debug, Default)]
pub struct AlertDecider {
    history: FnvIndexMap<AlertKey, AlertRecord, MAX_ALERT_HISTORY>,
}

impl AlertDecider {
    /// Empty history
    pub fn new() -> Self {
        Self {
            history: FnvIndexMap::new(),
        }
    }

    /// Report the condition for one pair and learn whether to dispatch
    ///
    /// Returns `true` and records `now` only on a rising edge: the
    /// condition is true and either the pair has never been seen or the
    /// previous check reported false.
    pub fn should_alert(
        &mut self,
        sensor_id: SensorId,
        kind: AlertKind,
        condition: bool,
        now: Timestamp,
    ) -> bool {
        let key = (sensor_id, kind);

        if let Some(record) = self.history.get_mut(&key) {
            let rising = condition && !record.active;
            record.active = condition;
            if rising {
                record.last_dispatched = now;
                record.dispatch_count = record.dispatch_count.saturating_add(1);
            }
            return rising;
        }

        if !condition {
            // Nothing to re-arm for a pair that never fired
            return false;
        }

        let record = AlertRecord {
            active: true,
            last_dispatched: now,
            dispatch_count: 1,
        };
        if self.history.len() == self.history.capacity() {
            self.evict();
        }
        if self.history.insert(key, record).is_err() {
            log_warn!("Alert history full, {:?} for sensor {} is not tracked", kind, sensor_id);
        }
        true
    }

    /// Record for a pair, if one exists
    pub fn record(&self, sensor_id: SensorId, kind: AlertKind) -> Option<&AlertRecord> {
        self.history.get(&(sensor_id, kind))
    }

    /// Number of tracked pairs
    pub fn len(&self) -> usize {
        self.history.len()
    }

    /// Whether no pair is tracked
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    // Drop the quietest record, inactive ones first
    fn evict(&mut self) {
        let victim = self
            .history
            .iter()
            .min_by_key(|(_, record)| (record.active, record.last_dispatched))
            .map(|(key, _)| *key);

        if let Some(key) = victim {
            log_debug!("Evicting alert history for {:?}", key);
            self.history.remove(&key);
        }
    }
}

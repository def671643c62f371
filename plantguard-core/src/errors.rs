//! Error types for the monitoring loop
//!
//! ## Design
//!
//! The core never allocates, so every error here is `Copy` and carries only
//! numbers and `&'static str`. Connectors that talk to real services keep
//! their own rich error types and convert at the collaborator boundary,
//! logging the detail before it is dropped.
//!
//! ## How each error affects a cycle
//!
//! | Error | Raised by | Effect |
//! |---|---|---|
//! | `InvalidProfileError` | band builder | skip tier rendering and low-temperature alerting |
//! | `ClassificationError` | classifier | skip tier logic for that metric |
//! | `TransportError` | notification transport | logged, cycle continues, no retry |
//! | `StoreError` | record store | aborts the cycle |
//! | `DeviceError` | sensor / display | sensor: aborts the cycle, display: logged |
//!
//! Only [`CycleError`] ever leaves [`Monitor::run_cycle`](crate::Monitor::run_cycle);
//! everything else is absorbed inside the cycle.

use thiserror_no_std::Error;

/// Reference profile cannot produce tolerance bands
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum InvalidProfileError {
    /// The store row had no usable target for this metric
    #[error("Profile has no {metric} target")]
    MissingTarget {
        /// Metric name (`"temperature"` or `"humidity"`)
        metric: &'static str,
    },

    /// Target is NaN or infinite
    #[error("Profile {metric} target is not a finite number")]
    NonFiniteTarget {
        /// Metric name
        metric: &'static str,
    },

    /// Target is below zero
    #[error("Profile {metric} target {value} is negative")]
    NegativeTarget {
        /// Metric name
        metric: &'static str,
        /// Offending target value
        value: f32,
    },
}

/// Reading cannot be classified
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ClassificationError {
    /// Value makes no physical sense (NaN, infinity)
    #[error("Reading {value} is not a finite number")]
    NonFinite {
        /// The rejected value
        value: f32,
    },
}

/// Record store failure
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    /// No row with this id
    #[error("No {table} record with id {id}")]
    NotFound {
        /// Table or collection name
        table: &'static str,
        /// Requested id
        id: u32,
    },

    /// Network or connection failure
    #[error("Store unreachable")]
    Unreachable,

    /// Store answered with an error status
    #[error("Store rejected request with status {status}")]
    Rejected {
        /// HTTP-style status code
        status: u16,
    },

    /// Response could not be decoded
    #[error("Malformed store response: {reason}")]
    Malformed {
        /// What was wrong with it
        reason: &'static str,
    },
}

/// Notification dispatch failure
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// Network or connection failure
    #[error("Notification transport unreachable")]
    Unreachable,

    /// Provider refused the message
    #[error("Notification rejected with status {status}")]
    Rejected {
        /// HTTP-style status code
        status: u16,
    },

    /// Provider response could not be decoded
    #[error("Malformed transport response")]
    Malformed,

    /// No recipient could be resolved for the alert
    #[error("No alert recipient available")]
    NoRecipient,
}

/// Sensor or display hardware failure
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceError {
    /// A sensor channel could not be read
    #[error("Failed to read {channel} channel")]
    Read {
        /// Channel name
        channel: &'static str,
    },

    /// The display could not be written
    #[error("Failed to write to display")]
    Write,

    /// Requested operation is not supported by the device
    #[error("Unsupported device operation: {reason}")]
    Unsupported {
        /// What was requested
        reason: &'static str,
    },
}

/// Failure that aborts the current cycle
///
/// The loop logs it and resumes on the next scheduled iteration.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum CycleError {
    /// Store fetch or write failed
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Sensor sampling failed
    #[error("Sensor error: {0}")]
    Device(#[from] DeviceError),
}

#[cfg(feature = "defmt")]
impl defmt::Format for CycleError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::Store(StoreError::NotFound { table, id }) =>
                defmt::write!(fmt, "No {} record {}", table, id),
            Self::Store(StoreError::Unreachable) =>
                defmt::write!(fmt, "Store unreachable"),
            Self::Store(StoreError::Rejected { status }) =>
                defmt::write!(fmt, "Store rejected: {}", status),
            Self::Store(StoreError::Malformed { reason }) =>
                defmt::write!(fmt, "Store malformed: {}", reason),
            Self::Device(DeviceError::Read { channel }) =>
                defmt::write!(fmt, "Sensor read failed: {}", channel),
            Self::Device(DeviceError::Write) =>
                defmt::write!(fmt, "Display write failed"),
            Self::Device(DeviceError::Unsupported { reason }) =>
                defmt::write!(fmt, "Unsupported: {}", reason),
        }
    }
}

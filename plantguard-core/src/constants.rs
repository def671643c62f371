//! Constants for PlantGuard Core
//!
//! All tunable numbers live here with their units in the name. The monitor
//! reads them through [`MonitorConfig`](crate::MonitorConfig) defaults, so a
//! deployment overrides cadence and thresholds without touching code.

// ===== TOLERANCE BANDS =====

/// Absolute half-width of the temperature band (sensor units, normally °C).
pub const TEMP_TOLERANCE_ABS: f32 = 3.0;

/// Half-width of the humidity band as a percentage of the target.
pub const HUMIDITY_TOLERANCE_PCT: f32 = 10.0;

// ===== SENSOR =====

/// Raw clear-channel light level below which the sensor counts as covered.
pub const OBSTRUCTION_LIGHT_THRESHOLD: f32 = 50.0;

// ===== CYCLE TIMING =====

/// Pause after the obstruction icon is drawn (ms).
pub const OBSTRUCTION_PAUSE_MS: u32 = 3_000;

/// Pause between the end of one cycle and the start of the next (ms).
pub const CYCLE_INTERVAL_MS: u32 = 10_000;

// ===== DISPLAY =====

/// Default rotation of the LED matrix in degrees.
pub const DISPLAY_ROTATION_DEG: u16 = 180;

/// Seconds per scrolled column when showing a status message.
pub const SCROLL_SPEED_S: f32 = 0.1;

/// Pixels on the 8x8 LED matrix.
pub const MATRIX_PIXELS: usize = 64;

// ===== CAPACITIES =====

/// Tracked (sensor, alert kind) pairs. Must be a power of two.
pub const MAX_ALERT_HISTORY: usize = 16;

/// Longest plant name kept from a profile (bytes).
pub const MAX_PLANT_NAME: usize = 32;

/// Longest phone number accepted (bytes), E.164 plus channel prefix.
pub const MAX_PHONE_NUMBER: usize = 32;

/// Longest alert body (bytes), one SMS segment.
pub const MAX_ALERT_BODY: usize = 160;

/// Longest provider message id kept (bytes).
pub const MAX_MESSAGE_ID: usize = 64;

// ===== DEFAULT IDENTITIES =====

/// Sensor monitored when none is configured.
pub const DEFAULT_SENSOR_ID: u32 = 1;

/// Owner recorded with readings when none is configured.
pub const DEFAULT_USER_ID: u32 = 1;

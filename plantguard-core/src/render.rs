//! Status Rendering for the 8x8 LED Matrix
//!
//! Turns a classified reading into a [`StatusPayload`]: one icon and two
//! colour-coded scroll messages. Nothing here touches hardware; the monitor
//! hands the payload to a [`DisplayDevice`](crate::traits::DisplayDevice).
//!
//! ```text
//! obstructed?  ── yes ──> moon icon
//!              └─ no ──> sun icon
//!
//! temperature 16.04, FarBelow  -> "16.0C" in blue
//! humidity    55.0,  FarAbove  -> "55.0%" in blue
//! ```
//!
//! Rendering has no hidden state: the same inputs always give an equal
//! payload.

use core::fmt::Write;

use heapless::String;

use crate::{
    classify::{Metric, Tier},
    constants::MATRIX_PIXELS,
};

/// 24-bit colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rgb {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
}

impl Rgb {
    /// Colour from channels
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Pixel off
pub const BLACK: Rgb = Rgb::new(0, 0, 0);
/// Moon icon
pub const WHITE: Rgb = Rgb::new(255, 255, 255);
/// Temperature far below / humidity far above
pub const BLUE: Rgb = Rgb::new(0, 0, 255);
/// Temperature below / humidity above
pub const LIGHT_BLUE: Rgb = Rgb::new(173, 216, 230);
/// At target
pub const GREEN: Rgb = Rgb::new(0, 255, 0);
/// Temperature above / humidity below, and the sun icon
pub const YELLOW: Rgb = Rgb::new(255, 255, 0);
/// Temperature far above / humidity far below
pub const RED: Rgb = Rgb::new(255, 0, 0);

/// Full-matrix picture, row-major from the top-left pixel
pub type Frame = [Rgb; MATRIX_PIXELS];

/// Icon drawn before the status text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Icon {
    /// Light path clear
    Sun,
    /// Light path blocked
    Moon,
}

impl Icon {
    /// Icon for the current obstruction state
    pub const fn for_obstruction(obstructed: bool) -> Self {
        if obstructed {
            Icon::Moon
        } else {
            Icon::Sun
        }
    }

    /// Short name used in logs
    pub const fn name(&self) -> &'static str {
        match self {
            Icon::Sun => "sun",
            Icon::Moon => "moon",
        }
    }

    /// Pixels for this icon
    pub fn frame(&self) -> Frame {
        let (mask, on) = match self {
            Icon::Sun => (SUN_MASK, YELLOW),
            Icon::Moon => (MOON_MASK, WHITE),
        };

        let mut frame = [BLACK; MATRIX_PIXELS];
        for (row, bits) in mask.iter().enumerate() {
            for col in 0..8 {
                if bits & (0x80 >> col) != 0 {
                    frame[row * 8 + col] = on;
                }
            }
        }
        frame
    }
}

// One byte per row, most significant bit is the leftmost pixel
const MOON_MASK: [u8; 8] = [
    0b0111_0000,
    0b0011_1000,
    0b0001_1100,
    0b0001_1100,
    0b0001_1100,
    0b0001_1100,
    0b0011_1000,
    0b0111_0000,
];

const SUN_MASK: [u8; 8] = [
    0b0011_1100,
    0b0111_1110,
    0b1111_1111,
    0b1111_1111,
    0b1111_1111,
    0b1111_1111,
    0b0111_1110,
    0b0011_1100,
];

// f32::MAX at one decimal place is 41 characters plus the unit
const LINE_CAPACITY: usize = 48;

/// One scrolled message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    /// Value rounded to one decimal with unit suffix, e.g. `"20.0C"`
    pub text: String<LINE_CAPACITY>,
    /// Tier colour
    pub color: Rgb,
}

impl StatusLine {
    /// Format `value` for `metric` and colour it by `tier`
    pub fn new(metric: Metric, value: f32, tier: Tier) -> Self {
        let mut text = String::new();
        // Capacity covers every finite f32, so the write cannot overflow
        let _ = write!(text, "{:.1}{}", value, metric.unit());

        Self {
            text,
            color: metric.color(tier),
        }
    }
}

/// Everything drawn in one cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusPayload {
    /// Obstruction icon
    pub icon: Icon,
    /// Temperature message
    pub temperature: StatusLine,
    /// Humidity message
    pub humidity: StatusLine,
}

/// Build the display payload for one cycle
pub fn render_status(
    temperature: f32,
    temperature_tier: Tier,
    humidity: f32,
    humidity_tier: Tier,
    obstructed: bool,
) -> StatusPayload {
    StatusPayload {
        icon: Icon::for_obstruction(obstructed),
        temperature: StatusLine::new(Metric::Temperature, temperature, temperature_tier),
        humidity: StatusLine::new(Metric::Humidity, humidity, humidity_tier),
    }
}

//! Sense HAT LED matrix through its Linux framebuffer
//!
//! The matrix is an 8x8 RGB565 framebuffer (usually `/dev/fb1`), one
//! little-endian `u16` per pixel in row-major order. Rotation is applied
//! when a frame is written, so callers always draw upright.
//!
//! Messages scroll right to left using a 3x5 font covering what status
//! lines contain: digits, `.`, `-`, `C` and `%`. Other characters scroll
//! past as blanks.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use plantguard_core::{
    errors::DeviceError,
    render::{Frame, Rgb, BLACK},
    traits::{DisplayDevice, Rotation},
};
use tracing::{debug, warn};

const SIZE: usize = 8;
const GLYPH_TOP: usize = 2;

/// LED matrix framebuffer
#[derive(Debug, Clone)]
pub struct FramebufferDisplay {
    path: PathBuf,
    rotation: Rotation,
}

impl FramebufferDisplay {
    /// Display writing to the framebuffer device at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            rotation: Rotation::Deg0,
        }
    }

    fn write_frame(&self, frame: &Frame) -> Result<(), DeviceError> {
        let bytes = encode(frame, self.rotation);
        let result = OpenOptions::new()
            .write(true)
            .open(&self.path)
            .and_then(|mut fb| fb.write_all(&bytes));

        result.map_err(|e| {
            warn!(path = %self.path.display(), error = %e, "Framebuffer write failed");
            DeviceError::Write
        })
    }
}

impl DisplayDevice for FramebufferDisplay {
    fn clear(&mut self) -> Result<(), DeviceError> {
        self.write_frame(&[BLACK; SIZE * SIZE])
    }

    fn set_rotation(&mut self, rotation: Rotation) -> Result<(), DeviceError> {
        self.rotation = rotation;
        Ok(())
    }

    fn set_pixels(&mut self, frame: &Frame) -> Result<(), DeviceError> {
        self.write_frame(frame)
    }

    fn show_message(&mut self, text: &str, scroll_speed: f32, color: Rgb) -> Result<(), DeviceError> {
        debug!(text, "Scrolling message");
        let step = Duration::from_secs_f32(scroll_speed.max(0.0));

        for frame in scroll_frames(text, color) {
            self.write_frame(&frame)?;
            thread::sleep(step);
        }
        Ok(())
    }
}

/// Frames of `text` scrolling in from the right and out to the left
pub fn scroll_frames(text: &str, color: Rgb) -> Vec<Frame> {
    let mut columns = vec![0u8; SIZE];
    for c in text.chars() {
        let glyph = glyph(c);
        for col in 0..3 {
            let mut bits = 0u8;
            for (row, line) in glyph.iter().enumerate() {
                if line >> (2 - col) & 1 == 1 {
                    bits |= 1 << (row + GLYPH_TOP);
                }
            }
            columns.push(bits);
        }
        columns.push(0);
    }
    columns.extend([0u8; SIZE]);

    columns
        .windows(SIZE)
        .map(|window| {
            let mut frame = [BLACK; SIZE * SIZE];
            for (col, bits) in window.iter().enumerate() {
                for row in 0..SIZE {
                    if bits >> row & 1 == 1 {
                        frame[row * SIZE + col] = color;
                    }
                }
            }
            frame
        })
        .collect()
}

/// RGB565 bytes of `frame` after rotating it
pub fn encode(frame: &Frame, rotation: Rotation) -> Vec<u8> {
    let mut bytes = vec![0u8; SIZE * SIZE * 2];
    for row in 0..SIZE {
        for col in 0..SIZE {
            let (r, c) = rotate(row, col, rotation);
            let pixel = rgb565(frame[row * SIZE + col]).to_le_bytes();
            let at = (r * SIZE + c) * 2;
            bytes[at..at + 2].copy_from_slice(&pixel);
        }
    }
    bytes
}

fn rotate(row: usize, col: usize, rotation: Rotation) -> (usize, usize) {
    let last = SIZE - 1;
    match rotation {
        Rotation::Deg0 => (row, col),
        Rotation::Deg90 => (col, last - row),
        Rotation::Deg180 => (last - row, last - col),
        Rotation::Deg270 => (last - col, row),
    }
}

fn rgb565(color: Rgb) -> u16 {
    (u16::from(color.r >> 3) << 11) | (u16::from(color.g >> 2) << 5) | u16::from(color.b >> 3)
}

fn glyph(c: char) -> [u8; 5] {
    match c {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b010, 0b010, 0b010],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        'C' => [0b111, 0b100, 0b100, 0b100, 0b111],
        '%' => [0b101, 0b001, 0b010, 0b100, 0b101],
        _ => [0; 5],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plantguard_core::render::{Icon, GREEN, WHITE};

    #[test]
    fn rgb565_packing() {
        assert_eq!(rgb565(WHITE), 0xFFFF);
        assert_eq!(rgb565(BLACK), 0);
        assert_eq!(rgb565(GREEN), 0x07E0);
    }

    #[test]
    fn upside_down_swaps_corners() {
        let mut frame = [BLACK; 64];
        frame[0] = WHITE;

        let upright = encode(&frame, Rotation::Deg0);
        let flipped = encode(&frame, Rotation::Deg180);

        assert_eq!(&upright[0..2], &[0xFF, 0xFF]);
        assert_eq!(&flipped[126..128], &[0xFF, 0xFF]);
        assert_eq!(&flipped[0..2], &[0, 0]);
    }

    #[test]
    fn scroll_starts_and_ends_blank() {
        let frames = scroll_frames("1", GREEN);

        // 8 blank lead-in, 3 glyph + 1 gap, 8 blank tail
        assert_eq!(frames.len(), 8 + 4 + 8 - 8 + 1);
        assert!(frames.first().unwrap().iter().all(|p| *p == BLACK));
        assert!(frames.last().unwrap().iter().all(|p| *p == BLACK));
        assert!(frames.iter().any(|f| f.contains(&GREEN)));
    }

    #[test]
    fn writes_frame_to_device() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let mut display = FramebufferDisplay::new(file.path());

        display.set_rotation(Rotation::Deg180).unwrap();
        display.set_pixels(&Icon::Sun.frame()).unwrap();

        let written = std::fs::read(file.path()).unwrap();
        assert_eq!(written, encode(&Icon::Sun.frame(), Rotation::Deg180));
    }

    #[test]
    fn message_leaves_matrix_blank() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let mut display = FramebufferDisplay::new(file.path());

        display.show_message("20.0C", 0.0, GREEN).unwrap();

        let written = std::fs::read(file.path()).unwrap();
        assert_eq!(written.len(), 128);
        assert!(written.iter().all(|b| *b == 0));
    }

    #[test]
    fn missing_device_is_write_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut display = FramebufferDisplay::new(dir.path().join("missing").join("fb1"));

        assert_eq!(display.clear(), Err(DeviceError::Write));
    }
}

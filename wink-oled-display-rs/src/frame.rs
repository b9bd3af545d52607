//! Packed 1-bit-per-pixel animation frames.
//!
//! A [`Frame`] borrows packed bitmap data in the layout produced by the frame
//! tool and expected by the panel: row-major, most-significant bit first,
//! every row padded to a whole byte. A set bit is a lit pixel.

use embedded_graphics::{pixelcolor::BinaryColor, prelude::*};

use crate::error::FrameError;

/// Panel width in pixels.
pub const DISPLAY_WIDTH: u32 = 128;
/// Panel height in pixels.
pub const DISPLAY_HEIGHT: u32 = 64;
/// Size of one full-screen frame in bytes (`16 * 64`).
pub const FRAME_BYTES: usize = packed_len(DISPLAY_WIDTH, DISPLAY_HEIGHT);

/// Number of bytes needed to store a `width × height` packed bitmap.
pub const fn packed_len(width: u32, height: u32) -> usize {
    (width as usize).div_ceil(8) * height as usize
}

/// An immutable packed bitmap.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Frame<'a> {
    data: &'a [u8],
    width: u32,
    height: u32,
}

impl<'a> Frame<'a> {
    /// Wrap packed bitmap data.
    ///
    /// # Errors
    ///
    /// [`FrameError::Length`] if `data` is not exactly
    /// `ceil(width / 8) * height` bytes long.
    pub fn new(data: &'a [u8], width: u32, height: u32) -> Result<Self, FrameError> {
        let expected = packed_len(width, height);
        if data.len() != expected {
            return Err(FrameError::Length {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Wrap a full-screen 128×64 bitmap.
    pub fn for_display(data: &'a [u8]) -> Result<Self, FrameError> {
        Self::new(data, DISPLAY_WIDTH, DISPLAY_HEIGHT)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// `true` if the frame covers the whole panel.
    pub fn matches_display(&self) -> bool {
        self.width == DISPLAY_WIDTH && self.height == DISPLAY_HEIGHT
    }

    /// Returns whether the pixel at `(x, y)` is lit. Out-of-range
    /// coordinates are unlit.
    pub fn is_lit(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let stride = self.width.div_ceil(8) as usize;
        let byte = self.data[y as usize * stride + (x as usize >> 3)];
        byte & (0x80 >> (x & 7)) != 0
    }

    /// Lit pixels only, in row-major order.
    ///
    /// Drawing these onto a cleared buffer is a transparent-background blit:
    /// unset bits leave the target untouched.
    pub fn lit_pixels(&self) -> impl Iterator<Item = Pixel<BinaryColor>> + 'a {
        let frame = *self;
        (0..frame.height).flat_map(move |y| {
            (0..frame.width).filter_map(move |x| {
                frame
                    .is_lit(x, y)
                    .then(|| Pixel(Point::new(x as i32, y as i32), BinaryColor::On))
            })
        })
    }
}

// ── Tests ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_bytes_for_128x64() {
        assert_eq!(FRAME_BYTES, 1024);
    }

    #[test]
    fn packed_len_rounds_rows_up() {
        assert_eq!(packed_len(8, 1), 1);
        assert_eq!(packed_len(9, 1), 2);
        assert_eq!(packed_len(12, 3), 6);
    }

    #[test]
    fn new_rejects_wrong_length() {
        let data = [0u8; 1023];
        assert_eq!(
            Frame::for_display(&data),
            Err(FrameError::Length {
                expected: 1024,
                actual: 1023
            })
        );
    }

    #[test]
    fn is_lit_reads_msb_first() {
        // 10 px wide → 2 bytes per row.
        let data = [0b1000_0001, 0b0100_0000, 0x00, 0x00];
        let frame = Frame::new(&data, 10, 2).unwrap();
        assert!(frame.is_lit(0, 0));
        assert!(frame.is_lit(7, 0));
        assert!(frame.is_lit(9, 0));
        assert!(!frame.is_lit(8, 0));
        assert!(!frame.is_lit(0, 1));
        assert!(!frame.is_lit(10, 0));
    }

    #[test]
    fn lit_pixels_skips_unset_bits() {
        let data = [0b0010_0000, 0b1000_0000];
        let frame = Frame::new(&data, 3, 2).unwrap();
        let mut pixels = frame.lit_pixels();
        assert_eq!(pixels.next(), Some(Pixel(Point::new(2, 0), BinaryColor::On)));
        assert_eq!(pixels.next(), Some(Pixel(Point::new(0, 1), BinaryColor::On)));
        assert_eq!(pixels.next(), None);
    }

    #[test]
    fn matches_display_checks_both_dimensions() {
        let full = [0u8; FRAME_BYTES];
        assert!(Frame::for_display(&full).unwrap().matches_display());
        let half = [0u8; FRAME_BYTES / 2];
        assert!(!Frame::new(&half, 128, 32).unwrap().matches_display());
    }
}

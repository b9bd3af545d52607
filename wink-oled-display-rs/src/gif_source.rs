//! GIF frame source backed by the [`gif`] crate.
//!
//! Frames are decoded one at a time into a caller-provided scratch buffer of
//! [`GIF_SCRATCH_BYTES`] bytes that lives as long as the source:
//!
//! ```text
//! ┌──────────────── canvas: W×H bytes ────────────────┬─ packed: W×H/8 bytes ─┐
//! │ one byte per pixel, 0 = off, 1 = on (composited)  │ ready-to-draw frame   │
//! └───────────────────────────────────────────────────┴───────────────────────┘
//!                                                      ▲ PACKED_OFFSET
//! ```
//!
//! Each decoded GIF frame is composited onto the canvas (transparent pixels
//! keep what was there), then the canvas is packed into the second region and
//! handed out as a [`Frame`]. Palette colours with luma of at least 128 are
//! lit.

use core::fmt;

use gif::{ColorOutput, DecodeOptions, Decoder, DisposalMethod};

use crate::frame::{Frame, DISPLAY_HEIGHT, DISPLAY_WIDTH, FRAME_BYTES};
use crate::source::{FrameSource, SourceState};

const WIDTH: usize = DISPLAY_WIDTH as usize;
const HEIGHT: usize = DISPLAY_HEIGHT as usize;
const CANVAS_BYTES: usize = WIDTH * HEIGHT;

/// Offset of the packed bitmap inside the scratch buffer.
pub const PACKED_OFFSET: usize = CANVAS_BYTES;
/// Scratch size: one byte per pixel plus one packed frame.
pub const GIF_SCRATCH_BYTES: usize = CANVAS_BYTES + FRAME_BYTES;

/// Errors reported by [`GifFrameSource`].
#[derive(Debug)]
pub enum GifError {
    /// Malformed or unsupported GIF stream.
    Decode(gif::DecodingError),
    /// Logical screen is not 128×64.
    UnsupportedSize { width: u16, height: u16 },
    /// [`open()`](FrameSource::open) called on an open stream.
    AlreadyOpen,
    /// Frame requested from a closed stream.
    NotOpen,
}

impl From<gif::DecodingError> for GifError {
    fn from(e: gif::DecodingError) -> Self {
        GifError::Decode(e)
    }
}

impl fmt::Display for GifError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GifError::Decode(e) => write!(f, "GIF decode error: {}", e),
            GifError::UnsupportedSize { width, height } => {
                write!(f, "GIF is {}x{}, expected 128x64", width, height)
            }
            GifError::AlreadyOpen => write!(f, "GIF stream already open"),
            GifError::NotOpen => write!(f, "GIF stream not open"),
        }
    }
}

impl std::error::Error for GifError {}

/// Rectangle of the previous frame, cleared before the next one when its
/// disposal method asks for the background.
#[derive(Clone, Copy)]
struct Region {
    left: usize,
    top: usize,
    width: usize,
    height: usize,
}

/// Streams frames out of an encoded GIF.
///
/// Each [`open()`](FrameSource::open) restarts decoding from the first
/// frame, so the animator replays the GIF once per cycle.
pub struct GifFrameSource<'a> {
    encoded: &'a [u8],
    scratch: &'a mut [u8; GIF_SCRATCH_BYTES],
    decoder: Option<Decoder<&'a [u8]>>,
    global_palette: [u8; 768],
    global_palette_len: usize,
    dispose: Option<Region>,
}

impl<'a> GifFrameSource<'a> {
    /// Create a closed source. Nothing is parsed until `open()`.
    pub fn new(encoded: &'a [u8], scratch: &'a mut [u8; GIF_SCRATCH_BYTES]) -> Self {
        Self {
            encoded,
            scratch,
            decoder: None,
            global_palette: [0; 768],
            global_palette_len: 0,
            dispose: None,
        }
    }

    pub fn state(&self) -> SourceState {
        if self.decoder.is_some() {
            SourceState::Open
        } else {
            SourceState::Closed
        }
    }
}

impl FrameSource for GifFrameSource<'_> {
    type Error = GifError;

    fn open(&mut self) -> Result<(), GifError> {
        if self.decoder.is_some() {
            return Err(GifError::AlreadyOpen);
        }

        let mut options = DecodeOptions::new();
        options.set_color_output(ColorOutput::Indexed);
        let decoder = options.read_info(self.encoded)?;

        let (width, height) = (decoder.width(), decoder.height());
        if width as usize != WIDTH || height as usize != HEIGHT {
            return Err(GifError::UnsupportedSize { width, height });
        }

        // Frames borrow the decoder mutably, so keep our own copy.
        let palette = decoder.global_palette().unwrap_or(&[]);
        let len = palette.len().min(self.global_palette.len());
        self.global_palette[..len].copy_from_slice(&palette[..len]);
        self.global_palette_len = len;

        self.scratch.fill(0);
        self.dispose = None;
        self.decoder = Some(decoder);
        Ok(())
    }

    fn next_frame(&mut self) -> Result<Option<Frame<'_>>, GifError> {
        let Some(decoder) = self.decoder.as_mut() else {
            return Err(GifError::NotOpen);
        };
        let (canvas, packed) = self.scratch.split_at_mut(PACKED_OFFSET);

        if let Some(region) = self.dispose.take() {
            fill_region(canvas, region, 0);
        }

        let Some(frame) = decoder.read_next_frame()? else {
            return Ok(None);
        };

        let palette = frame
            .palette
            .as_deref()
            .unwrap_or(&self.global_palette[..self.global_palette_len]);
        let region = Region {
            left: frame.left as usize,
            top: frame.top as usize,
            width: frame.width as usize,
            height: frame.height as usize,
        };
        composite(canvas, region, &frame.buffer, frame.transparent, palette);
        if frame.dispose == DisposalMethod::Background {
            self.dispose = Some(region);
        }

        pack(canvas, packed);
        Ok(Frame::for_display(&self.scratch[PACKED_OFFSET..]).ok())
    }

    fn close(&mut self) {
        self.decoder = None;
    }
}

// ── Canvas helpers ───────────────────────────────────────────────────────

/// Whether palette entry `index` is bright enough to light a pixel. Indices
/// outside the palette fall back to "anything but 0 is lit".
fn is_lit(palette: &[u8], index: u8) -> bool {
    let base = index as usize * 3;
    match palette.get(base..base + 3) {
        Some(&[r, g, b]) => {
            let luma = (299 * r as u32 + 587 * g as u32 + 114 * b as u32) / 1000;
            luma >= 128
        }
        _ => index != 0,
    }
}

fn fill_region(canvas: &mut [u8], region: Region, value: u8) {
    for y in region.top..(region.top + region.height).min(HEIGHT) {
        for x in region.left..(region.left + region.width).min(WIDTH) {
            canvas[y * WIDTH + x] = value;
        }
    }
}

fn composite(
    canvas: &mut [u8],
    region: Region,
    indices: &[u8],
    transparent: Option<u8>,
    palette: &[u8],
) {
    if region.width == 0 {
        return;
    }
    for (i, &index) in indices.iter().enumerate() {
        if transparent == Some(index) {
            continue;
        }
        let x = region.left + i % region.width;
        let y = region.top + i / region.width;
        if x < WIDTH && y < HEIGHT {
            canvas[y * WIDTH + x] = is_lit(palette, index) as u8;
        }
    }
}

/// Pack one-byte-per-pixel canvas into MSB-first rows.
fn pack(canvas: &[u8], packed: &mut [u8]) {
    packed.fill(0);
    let stride = WIDTH / 8;
    for (i, &pixel) in canvas.iter().enumerate() {
        if pixel != 0 {
            let (x, y) = (i % WIDTH, i / WIDTH);
            packed[y * stride + x / 8] |= 0x80 >> (x & 7);
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────────

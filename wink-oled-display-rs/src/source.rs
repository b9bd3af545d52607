//! Frame sources consumed by the [`Animator`](crate::Animator).
//!
//! A source is opened once per animation cycle, yields frames until it
//! reports the end of the sequence, and is then closed:
//!
//! ```text
//! Closed ──open() ok──▶ Open ──next_frame()──▶ Open ──None / error──▶ close() ──▶ Closed
//!    ▲                                                                          │
//!    └──────────────── open() failed (stays Closed) ◀───────────────────────────┘
//! ```

use core::convert::Infallible;

use crate::error::FrameError;
use crate::frame::Frame;

/// Lifecycle of a frame source.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SourceState {
    Closed,
    Open,
}

/// Something that produces an ordered sequence of frames, one cycle at a
/// time.
///
/// The frame returned by [`next_frame()`](Self::next_frame) borrows the
/// source, so it must be drawn before the next frame is requested. This is
/// what lets a decoder reuse one scratch buffer for every frame.
pub trait FrameSource {
    type Error: core::fmt::Debug;

    /// Start a new cycle.
    ///
    /// On failure the source stays closed and must not be asked for frames.
    fn open(&mut self) -> Result<(), Self::Error>;

    /// Produce the next frame, or `Ok(None)` once the cycle is complete.
    fn next_frame(&mut self) -> Result<Option<Frame<'_>>, Self::Error>;

    /// Release per-cycle state. Must be called before the next
    /// [`open()`](Self::open); calling it twice is harmless.
    fn close(&mut self);
}

// ── PrecomputedSequence ──────────────────────────────────────────────────

/// A fixed, compiled-in list of full-screen frames.
///
/// Construction validates every frame, so playback itself cannot fail.
pub struct PrecomputedSequence<'a> {
    frames: &'a [&'a [u8]],
    cursor: usize,
    state: SourceState,
}

impl<'a> PrecomputedSequence<'a> {
    /// Wrap a table of 128×64 packed bitmaps.
    ///
    /// # Errors
    ///
    /// * [`FrameError::EmptySequence`] if `frames` is empty.
    /// * [`FrameError::Length`] for the first frame that is not
    ///   [`FRAME_BYTES`](crate::FRAME_BYTES) long.
    pub fn new(frames: &'a [&'a [u8]]) -> Result<Self, FrameError> {
        if frames.is_empty() {
            return Err(FrameError::EmptySequence);
        }
        for data in frames {
            Frame::for_display(data)?;
        }
        Ok(Self {
            frames,
            cursor: 0,
            state: SourceState::Closed,
        })
    }

    /// Number of frames in one cycle.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Always `false`; empty tables are rejected by [`new()`](Self::new).
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn state(&self) -> SourceState {
        self.state
    }
}

impl FrameSource for PrecomputedSequence<'_> {
    type Error = Infallible;

    fn open(&mut self) -> Result<(), Infallible> {
        self.cursor = 0;
        self.state = SourceState::Open;
        Ok(())
    }

    fn next_frame(&mut self) -> Result<Option<Frame<'_>>, Infallible> {
        if self.state != SourceState::Open {
            return Ok(None);
        }
        let Some(data) = self.frames.get(self.cursor) else {
            return Ok(None);
        };
        self.cursor += 1;
        // Lengths were checked in new().
        Ok(Frame::for_display(data).ok())
    }

    fn close(&mut self) {
        self.state = SourceState::Closed;
    }
}

// ── Tests ────────────────────────────────────────────────────────────────

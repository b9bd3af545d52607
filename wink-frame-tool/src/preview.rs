//! Looping preview of generated frames, played through the real animator.

use std::convert::Infallible;

use wink_oled_display_rs::{AnimationConfig, Frame, FrameSource, SourceState};

/// Roughly 12 frames per second, back to back with no pause between loops.
pub const PREVIEW_CONFIG: AnimationConfig = AnimationConfig {
    inter_frame_delay_ms: 1000 / 12,
    inter_cycle_delay_ms: 0,
};

/// Packed frames of any size, as produced by `blend`.
///
/// Unlike `PrecomputedSequence` the frames need not cover the whole panel;
/// the terminal surface clips whatever does not fit.
pub struct PackedFrames {
    frames: Vec<Vec<u8>>,
    width: u32,
    height: u32,
    cursor: usize,
    state: SourceState,
}

impl PackedFrames {
    /// Every frame must be `ceil(width / 8) * height` bytes long.
    pub fn new(frames: Vec<Vec<u8>>, width: u32, height: u32) -> anyhow::Result<Self> {
        anyhow::ensure!(!frames.is_empty(), "no frames to preview");
        for data in &frames {
            Frame::new(data, width, height)?;
        }
        Ok(Self {
            frames,
            width,
            height,
            cursor: 0,
            state: SourceState::Closed,
        })
    }

    pub fn state(&self) -> SourceState {
        self.state
    }
}

impl FrameSource for PackedFrames {
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
        Ok(Frame::new(data, self.width, self.height).ok())
    }

    fn close(&mut self) {
        self.state = SourceState::Closed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitmap;
    use crate::terminal::TerminalSurface;
    use embassy_futures::block_on;
    use embedded_hal_async::delay::DelayNs;
    use image::{Rgba, RgbaImage};
    use wink_oled_display_rs::Animator;

    /// Adds up requested delays instead of sleeping.
    #[derive(Default)]
    struct TallyDelay {
        total_ms: u64,
        calls: usize,
    }

    impl DelayNs for TallyDelay {
        async fn delay_ns(&mut self, ns: u32) {
            self.total_ms += u64::from(ns) / 1_000_000;
            self.calls += 1;
        }

        async fn delay_ms(&mut self, ms: u32) {
            self.total_ms += u64::from(ms);
            self.calls += 1;
        }
    }

    #[test]
    fn three_frame_blend_renders_three_frames_per_cycle() {
        let black = RgbaImage::from_pixel(20, 10, Rgba([0, 0, 0, 255]));
        let white = RgbaImage::from_pixel(20, 10, Rgba([255, 255, 255, 255]));
        let (width, height, sequence) = bitmap::blend_dithered(&black, &white, 3);
        let source = PackedFrames::new(sequence, width, height).unwrap();

        let surface = TerminalSurface::new(Vec::new());
        let mut animator = Animator::new(surface, source, TallyDelay::default(), PREVIEW_CONFIG);

        for _ in 0..2 {
            let report = block_on(animator.play_cycle());
            assert!(report.opened);
            assert_eq!(report.frames_rendered, 3);
            assert_eq!(report.render_failures, 0);
        }

        let (surface, source, delay) = animator.into_parts();
        assert_eq!(source.state(), SourceState::Closed);
        // Three frame delays plus a zero-length cycle delay, twice.
        assert_eq!(delay.calls, 8);
        assert_eq!(delay.total_ms, 6 * 83);
        // Each flush starts with cursor-home.
        let out = String::from_utf8(surface.into_inner()).unwrap();
        assert_eq!(out.matches("\x1b[H").count(), 6);
    }

    #[test]
    fn preview_runs_at_about_twelve_fps() {
        assert_eq!(PREVIEW_CONFIG.inter_frame_delay_ms, 83);
        assert_eq!(PREVIEW_CONFIG.cycle_delay_ms(12), 996);
    }

    #[test]
    fn rejects_frames_of_the_wrong_length() {
        assert!(PackedFrames::new(vec![vec![0; 3]], 16, 2).is_err());
        assert!(PackedFrames::new(Vec::new(), 16, 2).is_err());
    }
}

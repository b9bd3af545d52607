//! Frame sequencing and timing.
//!
//! [`Animator`] owns the display surface, the frame source and a delay
//! provider, and plays the source's frames in a loop:
//!
//! ```text
//! open ─▶ ┌ clear ─▶ draw ─▶ flush ─▶ wait inter_frame ┐ ─▶ close ─▶ wait inter_cycle ─▶ open …
//!         └──────────────── next frame ◀──────────────┘
//! ```
//!
//! A source that fails to open skips straight to the inter-cycle wait, so a
//! bad stream degrades to "blank screen, retry later".

use embedded_hal_async::delay::DelayNs;

use crate::frame::Frame;
use crate::source::FrameSource;

// ── FrameSurface ─────────────────────────────────────────────────────────

/// The off-screen buffer the animator draws into and flushes to the panel.
#[allow(async_fn_in_trait)]
pub trait FrameSurface {
    type Error;

    /// Clear the in-memory buffer. No bus traffic.
    fn clear(&mut self);

    /// Draw `frame` at the origin, lit pixels only.
    fn draw_frame(&mut self, frame: &Frame<'_>) -> Result<(), Self::Error>;

    /// Transfer the buffer to the panel.
    async fn flush(&mut self) -> Result<(), Self::Error>;
}

// ── AnimationConfig ──────────────────────────────────────────────────────

/// Timing for one animation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AnimationConfig {
    /// Pause after each frame, in milliseconds.
    pub inter_frame_delay_ms: u32,
    /// Extra pause after the last frame of a cycle (or after a failed
    /// open), in milliseconds.
    pub inter_cycle_delay_ms: u32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self::wink_4()
    }
}

impl AnimationConfig {
    /// Timing for the four-frame wink: 150 ms per frame, 1 s between cycles.
    pub const fn wink_4() -> Self {
        Self {
            inter_frame_delay_ms: 150,
            inter_cycle_delay_ms: 1000,
        }
    }

    /// Timing for the eight-frame wink: 100 ms per frame, 500 ms between
    /// cycles.
    pub const fn wink_8() -> Self {
        Self {
            inter_frame_delay_ms: 100,
            inter_cycle_delay_ms: 500,
        }
    }

    /// Timing for the GIF-streamed wink. Matches [`wink_8()`](Self::wink_8).
    pub const fn gif() -> Self {
        Self::wink_8()
    }

    /// Total blocking delay of one cycle of `frame_count` frames, excluding
    /// render and flush time.
    pub fn cycle_delay_ms(&self, frame_count: usize) -> u64 {
        frame_count as u64 * self.inter_frame_delay_ms as u64 + self.inter_cycle_delay_ms as u64
    }
}

// ── CycleReport ──────────────────────────────────────────────────────────

/// What happened during one call to [`Animator::play_cycle()`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CycleReport {
    /// `false` if the source failed to open and the cycle was skipped.
    pub opened: bool,
    /// Frames drawn and flushed successfully.
    pub frames_rendered: usize,
    /// Frames whose draw or flush failed. Their delay still elapsed.
    pub render_failures: usize,
    /// The source reported an error before the end of the sequence.
    pub source_failed: bool,
}

// ── Animator ─────────────────────────────────────────────────────────────

/// Plays a [`FrameSource`] onto a [`FrameSurface`] forever.
pub struct Animator<S, F: FrameSource, D> {
    surface: S,
    source: F,
    delay: D,
    config: AnimationConfig,
    last_source_error: Option<F::Error>,
}

impl<S, F, D> Animator<S, F, D>
where
    S: FrameSurface,
    F: FrameSource,
    D: DelayNs,
{
    pub fn new(surface: S, source: F, delay: D, config: AnimationConfig) -> Self {
        Self {
            surface,
            source,
            delay,
            config,
            last_source_error: None,
        }
    }

    /// The error behind the most recent failed open or aborted cycle.
    /// Cleared when the source next opens successfully.
    pub fn last_source_error(&self) -> Option<&F::Error> {
        self.last_source_error.as_ref()
    }

    /// Give back the owned resources.
    pub fn into_parts(self) -> (S, F, D) {
        (self.surface, self.source, self.delay)
    }

    /// Play every frame of the source once, then wait the inter-cycle delay.
    ///
    /// # Control flow
    ///
    /// 1. Open the source. On failure wait `inter_cycle_delay_ms` and return
    ///    without touching the source again.
    /// 2. For each frame: clear, draw, flush, wait `inter_frame_delay_ms`.
    ///    A draw failure skips the flush; the delay always runs.
    /// 3. Stop at end of sequence or on a source error, close the source and
    ///    wait `inter_cycle_delay_ms`.
    pub async fn play_cycle(&mut self) -> CycleReport {
        let mut report = CycleReport::default();

        if let Err(e) = self.source.open() {
            #[cfg(feature = "defmt")]
            defmt::warn!(
                "Frame source failed to open ({}), retrying in {} ms",
                defmt::Debug2Format(&e),
                self.config.inter_cycle_delay_ms
            );
            self.last_source_error = Some(e);
            self.delay.delay_ms(self.config.inter_cycle_delay_ms).await;
            return report;
        }
        report.opened = true;
        self.last_source_error = None;

        loop {
            let frame = match self.source.next_frame() {
                Ok(Some(frame)) => frame,
                Ok(None) => break,
                Err(e) => {
                    #[cfg(feature = "defmt")]
                    defmt::error!(
                        "Frame source failed after {} frames: {}",
                        report.frames_rendered,
                        defmt::Debug2Format(&e)
                    );
                    report.source_failed = true;
                    self.last_source_error = Some(e);
                    break;
                }
            };

            // Surface and source are disjoint fields, so the frame can stay
            // borrowed from the source while drawing.
            self.surface.clear();
            match self.surface.draw_frame(&frame) {
                Ok(()) => match self.surface.flush().await {
                    Ok(()) => report.frames_rendered += 1,
                    Err(_) => {
                        #[cfg(feature = "defmt")]
                        defmt::error!("Flush failed");
                        report.render_failures += 1;
                    }
                },
                Err(_) => {
                    #[cfg(feature = "defmt")]
                    defmt::error!("Render failed");
                    report.render_failures += 1;
                }
            }

            self.delay.delay_ms(self.config.inter_frame_delay_ms).await;
        }

        self.source.close();
        self.delay.delay_ms(self.config.inter_cycle_delay_ms).await;

        #[cfg(feature = "defmt")]
        defmt::debug!("Cycle complete: {}", report);

        report
    }

    /// Play cycles forever.
    pub async fn run(&mut self) -> ! {
        loop {
            self.play_cycle().await;
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    extern crate std;

    use std::cell::RefCell;
    use std::rc::Rc;
    use std::vec;
    use std::vec::Vec;

    use embassy_futures::block_on;

    use super::*;
    use crate::frame::FRAME_BYTES;
    use crate::frames::{WINK_4, WINK_8};
    use crate::source::{PrecomputedSequence, SourceState};

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    enum Event {
        Open,
        Next,
        Close,
        Clear,
        /// First byte of the drawn frame identifies it.
        Draw(u8),
        Flush,
        Delay(u32),
    }

    type Log = Rc<RefCell<Vec<Event>>>;

    struct RecordingSurface {
        log: Log,
        fail_draw: bool,
    }

    impl FrameSurface for RecordingSurface {
        type Error = ();

        fn clear(&mut self) {
            self.log.borrow_mut().push(Event::Clear);
        }

        fn draw_frame(&mut self, frame: &Frame<'_>) -> Result<(), ()> {
            if self.fail_draw {
                return Err(());
            }
            self.log.borrow_mut().push(Event::Draw(frame.data()[0]));
            Ok(())
        }

        async fn flush(&mut self) -> Result<(), ()> {
            self.log.borrow_mut().push(Event::Flush);
            Ok(())
        }
    }

    struct RecordingDelay {
        log: Log,
    }

    impl DelayNs for RecordingDelay {
        async fn delay_ns(&mut self, ns: u32) {
            self.log.borrow_mut().push(Event::Delay(ns / 1_000_000));
        }

        async fn delay_ms(&mut self, ms: u32) {
            self.log.borrow_mut().push(Event::Delay(ms));
        }
    }

    /// Scripted stand-in for a streaming decoder.
    struct ScriptedSource {
        log: Log,
        open_ok: bool,
        frames: usize,
        fail_at: Option<usize>,
        produced: usize,
        buffer: [u8; FRAME_BYTES],
    }

    impl ScriptedSource {
        fn new(log: &Log, open_ok: bool, frames: usize) -> Self {
            Self {
                log: log.clone(),
                open_ok,
                frames,
                fail_at: None,
                produced: 0,
                buffer: [0; FRAME_BYTES],
            }
        }
    }

    impl FrameSource for ScriptedSource {
        type Error = ();

        fn open(&mut self) -> Result<(), ()> {
            self.log.borrow_mut().push(Event::Open);
            self.produced = 0;
            if self.open_ok {
                Ok(())
            } else {
                Err(())
            }
        }

        fn next_frame(&mut self) -> Result<Option<Frame<'_>>, ()> {
            self.log.borrow_mut().push(Event::Next);
            if self.fail_at == Some(self.produced) {
                return Err(());
            }
            if self.produced == self.frames {
                return Ok(None);
            }
            self.buffer[0] = self.produced as u8;
            self.produced += 1;
            Ok(Some(Frame::for_display(&self.buffer).unwrap()))
        }

        fn close(&mut self) {
            self.log.borrow_mut().push(Event::Close);
        }
    }

    fn recording(log: &Log) -> (RecordingSurface, RecordingDelay) {
        (
            RecordingSurface {
                log: log.clone(),
                fail_draw: false,
            },
            RecordingDelay { log: log.clone() },
        )
    }

    fn total_delay(log: &[Event]) -> u64 {
        log.iter()
            .map(|e| match e {
                Event::Delay(ms) => *ms as u64,
                _ => 0,
            })
            .sum()
    }

    static F0: [u8; FRAME_BYTES] = [0x10; FRAME_BYTES];
    static F1: [u8; FRAME_BYTES] = [0x11; FRAME_BYTES];
    static F2: [u8; FRAME_BYTES] = [0x12; FRAME_BYTES];

    #[test]
    fn static_cycle_renders_each_frame_then_waits() {
        let log = Log::default();
        let (surface, delay) = recording(&log);
        let table: [&[u8]; 3] = [&F0, &F1, &F2];
        let source = PrecomputedSequence::new(&table).unwrap();
        let mut animator = Animator::new(surface, source, delay, AnimationConfig::wink_4());

        let report = block_on(animator.play_cycle());

        assert_eq!(
            *log.borrow(),
            vec![
                Event::Clear,
                Event::Draw(0x10),
                Event::Flush,
                Event::Delay(150),
                Event::Clear,
                Event::Draw(0x11),
                Event::Flush,
                Event::Delay(150),
                Event::Clear,
                Event::Draw(0x12),
                Event::Flush,
                Event::Delay(150),
                Event::Delay(1000),
            ]
        );
        assert_eq!(
            report,
            CycleReport {
                opened: true,
                frames_rendered: 3,
                render_failures: 0,
                source_failed: false,
            }
        );
    }

    #[test]
    fn wink_4_cycle_blocks_for_1600_ms() {
        let log = Log::default();
        let (surface, delay) = recording(&log);
        let source = PrecomputedSequence::new(&WINK_4).unwrap();
        let config = AnimationConfig::wink_4();
        let mut animator = Animator::new(surface, source, delay, config);

        let report = block_on(animator.play_cycle());

        assert_eq!(report.frames_rendered, 4);
        assert_eq!(total_delay(&log.borrow()), 1600);
        assert_eq!(config.cycle_delay_ms(4), 1600);
    }

    #[test]
    fn wink_8_cycle_blocks_for_1300_ms() {
        let log = Log::default();
        let (surface, delay) = recording(&log);
        let source = PrecomputedSequence::new(&WINK_8).unwrap();
        let config = AnimationConfig::wink_8();
        let mut animator = Animator::new(surface, source, delay, config);

        let report = block_on(animator.play_cycle());

        assert_eq!(report.frames_rendered, 8);
        assert_eq!(total_delay(&log.borrow()), 1300);
        assert_eq!(config.cycle_delay_ms(8), 1300);
    }

    #[test]
    fn consecutive_cycles_are_identical() {
        let log = Log::default();
        let (surface, delay) = recording(&log);
        let source = PrecomputedSequence::new(&WINK_8).unwrap();
        let mut animator = Animator::new(surface, source, delay, AnimationConfig::wink_8());

        let first = block_on(animator.play_cycle());
        let len = log.borrow().len();
        let second = block_on(animator.play_cycle());

        let events = log.borrow();
        assert_eq!(events.len(), 2 * len);
        assert_eq!(events[..len], events[len..]);
        assert_eq!(first, second);
    }

    #[test]
    fn failed_open_waits_without_touching_the_source() {
        let log = Log::default();
        let (surface, delay) = recording(&log);
        let source = ScriptedSource::new(&log, false, 3);
        let mut animator = Animator::new(surface, source, delay, AnimationConfig::gif());

        let report = block_on(animator.play_cycle());

        assert_eq!(*log.borrow(), vec![Event::Open, Event::Delay(500)]);
        assert!(!report.opened);
        assert_eq!(report.frames_rendered, 0);
        assert_eq!(animator.last_source_error(), Some(&()));
    }

    #[test]
    fn failed_open_retries_next_cycle() {
        let log = Log::default();
        let (surface, delay) = recording(&log);
        let source = ScriptedSource::new(&log, false, 1);
        let mut animator = Animator::new(surface, source, delay, AnimationConfig::gif());

        block_on(animator.play_cycle());
        block_on(animator.play_cycle());

        assert_eq!(
            *log.borrow(),
            vec![Event::Open, Event::Delay(500), Event::Open, Event::Delay(500)]
        );
    }

    #[test]
    fn streamed_frames_render_then_close_then_wait() {
        let log = Log::default();
        let (surface, delay) = recording(&log);
        let source = ScriptedSource::new(&log, true, 2);
        let mut animator = Animator::new(surface, source, delay, AnimationConfig::gif());

        let report = block_on(animator.play_cycle());

        assert_eq!(
            *log.borrow(),
            vec![
                Event::Open,
                Event::Next,
                Event::Clear,
                Event::Draw(0),
                Event::Flush,
                Event::Delay(100),
                Event::Next,
                Event::Clear,
                Event::Draw(1),
                Event::Flush,
                Event::Delay(100),
                Event::Next,
                Event::Close,
                Event::Delay(500),
            ]
        );
        assert_eq!(report.frames_rendered, 2);
    }

    #[test]
    fn source_error_closes_the_stream() {
        let log = Log::default();
        let (surface, delay) = recording(&log);
        let mut source = ScriptedSource::new(&log, true, 5);
        source.fail_at = Some(1);
        let mut animator = Animator::new(surface, source, delay, AnimationConfig::gif());

        let report = block_on(animator.play_cycle());

        let events = log.borrow();
        assert_eq!(events.iter().filter(|e| matches!(e, Event::Draw(_))).count(), 1);
        assert_eq!(events[events.len() - 2..], [Event::Close, Event::Delay(500)]);
        assert!(report.source_failed);
        assert_eq!(report.frames_rendered, 1);
        assert!(animator.last_source_error().is_some());
    }

    #[test]
    fn source_is_closed_after_a_cycle() {
        let log = Log::default();
        let (surface, delay) = recording(&log);
        let source = PrecomputedSequence::new(&WINK_4).unwrap();
        let mut animator = Animator::new(surface, source, delay, AnimationConfig::wink_4());

        block_on(animator.play_cycle());
        assert!(animator.last_source_error().is_none());

        let (_, source, _) = animator.into_parts();
        assert_eq!(source.state(), SourceState::Closed);
        assert_eq!(source.len(), 4);
    }

    #[cfg(feature = "gif")]
    mod gif_playback {
        use std::boxed::Box;

        use super::*;
        use crate::frames::WINK_GIF;
        use crate::gif_source::{GifError, GifFrameSource, GIF_SCRATCH_BYTES};

        #[test]
        fn malformed_gif_waits_and_retries() {
            let log = Log::default();
            let (surface, delay) = recording(&log);
            let mut scratch = Box::new([0u8; GIF_SCRATCH_BYTES]);
            let source = GifFrameSource::new(b"definitely not a gif", &mut scratch);
            let mut animator = Animator::new(surface, source, delay, AnimationConfig::gif());

            let first = block_on(animator.play_cycle());
            let second = block_on(animator.play_cycle());

            assert_eq!(*log.borrow(), vec![Event::Delay(500), Event::Delay(500)]);
            assert!(!first.opened);
            assert!(!second.opened);
            assert!(matches!(
                animator.last_source_error(),
                Some(GifError::Decode(_))
            ));
        }

        #[test]
        fn truncated_gif_renders_what_it_can_then_waits() {
            let log = Log::default();
            let (surface, delay) = recording(&log);
            let mut scratch = Box::new([0u8; GIF_SCRATCH_BYTES]);
            let truncated = &WINK_GIF[..WINK_GIF.len() / 2];
            let source = GifFrameSource::new(truncated, &mut scratch);
            let mut animator = Animator::new(surface, source, delay, AnimationConfig::gif());

            let report = block_on(animator.play_cycle());

            assert!(report.opened);
            assert!(report.source_failed);
            assert!(report.frames_rendered > 0 && report.frames_rendered < WINK_8.len());
            assert_eq!(log.borrow().last(), Some(&Event::Delay(500)));

            let (_, source, _) = animator.into_parts();
            assert_eq!(source.state(), SourceState::Closed);
        }
    }

    #[test]
    fn draw_failure_skips_flush_but_keeps_timing() {
        let log = Log::default();
        let (mut surface, delay) = recording(&log);
        surface.fail_draw = true;
        let source = PrecomputedSequence::new(&WINK_4).unwrap();
        let mut animator = Animator::new(surface, source, delay, AnimationConfig::wink_4());

        let report = block_on(animator.play_cycle());

        let events = log.borrow();
        assert!(!events.contains(&Event::Flush));
        assert_eq!(total_delay(&events), 1600);
        assert_eq!(report.render_failures, 4);
        assert_eq!(report.frames_rendered, 0);
    }

    #[test]
    fn default_config_is_wink_4() {
        let c = AnimationConfig::default();
        assert_eq!(c.inter_frame_delay_ms, 150);
        assert_eq!(c.inter_cycle_delay_ms, 1000);
    }

    #[test]
    fn gif_config_matches_wink_8() {
        assert_eq!(AnimationConfig::gif(), AnimationConfig::wink_8());
    }
}

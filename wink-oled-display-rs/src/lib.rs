//! Frame animator for the SSD1306 (128×64) OLED display.
//!
//! This crate plays a looping "wink" animation: an ordered sequence of packed
//! 1-bit-per-pixel [`Frame`]s is cleared, drawn and flushed to the panel one
//! after another, with a fixed inter-frame delay and a longer pause after each
//! full cycle.
//!
//! Frames come from a [`FrameSource`]:
//!
//! - [`PrecomputedSequence`] — compiled-in bitmap tables (see [`frames`]).
//! - [`GifFrameSource`] — a GIF decoded frame-by-frame into a fixed scratch
//!   buffer (feature **`gif`**, host only).
//!
//! The [`Animator`] draws onto any [`FrameSurface`]; [`OledDriver`] is the
//! SSD1306 implementation.
//!
//! # Quick Start
//!
//! ```ignore
//! use wink_oled_display_rs::{animation_task, frames, AnimationConfig, OledDriver, PrecomputedSequence};
//!
//! let oled = OledDriver::new(i2c_oled, 0x3C);
//! let source = PrecomputedSequence::new(&frames::WINK_4).unwrap();
//! spawner.spawn(oled_task(oled, source, AnimationConfig::wink_4())).unwrap();
//!
//! #[embassy_executor::task]
//! async fn oled_task(
//!     driver: OledDriver<MyI2cType>,
//!     source: PrecomputedSequence<'static>,
//!     config: AnimationConfig,
//! ) {
//!     animation_task(driver, source, config).await;
//! }
//! ```
//!
//! # Crate Features
//!
//! - **`gif`** *(default)* — [`GifFrameSource`] backed by the `gif` crate.
//!   Requires `std`; disable default features for firmware builds.
//! - **`task`** — [`animation_task`] using `embassy-time`.
//! - **`defmt`** — structured logging via [`defmt`].

#![no_std]

#[cfg(feature = "gif")]
extern crate std;

pub mod animator;
#[cfg(feature = "task")]
pub mod animation_task;
pub mod driver;
pub mod error;
pub mod frame;
pub mod frames;
#[cfg(feature = "gif")]
pub mod gif_source;
pub mod source;

// ── Re-exports for convenience ───────────────────────────────────────────

#[cfg(feature = "task")]
pub use animation_task::animation_task;
pub use animator::{AnimationConfig, Animator, CycleReport, FrameSurface};
pub use driver::OledDriver;
pub use error::{FrameError, OledError};
pub use frame::{Frame, DISPLAY_HEIGHT, DISPLAY_WIDTH, FRAME_BYTES};
#[cfg(feature = "gif")]
pub use gif_source::{GifError, GifFrameSource, GIF_SCRATCH_BYTES};
pub use source::{FrameSource, PrecomputedSequence, SourceState};

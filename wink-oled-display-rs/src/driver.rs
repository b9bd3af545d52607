//! Core OLED driver wrapping the `ssd1306` crate in async buffered graphics mode.
//!
//! [`OledDriver`] manages the SSD1306 display lifecycle: construction without
//! I2C traffic, explicit async initialisation, frame drawing and frame buffer
//! flush.

use display_interface_i2c::I2CInterface;
use embedded_graphics::draw_target::DrawTarget;
use embedded_hal_async::i2c::I2c;
use ssd1306::{
    mode::BufferedGraphicsModeAsync, prelude::*, I2CDisplayInterface, Ssd1306Async,
};

use crate::animator::FrameSurface;
use crate::error::OledError;
use crate::frame::Frame;

/// Concrete display type used internally by [`OledDriver`].
type Display<I2C> = Ssd1306Async<
    I2CInterface<I2C>,
    DisplaySize128x64,
    BufferedGraphicsModeAsync<DisplaySize128x64>,
>;

/// Async driver for an SSD1306 128×64 OLED display over I2C.
///
/// Wraps the [`ssd1306`] crate in `BufferedGraphicsMode`; the 1024-byte
/// frame buffer is the display surface the animator draws into.
///
/// # Lifecycle
///
/// 1. [`OledDriver::new()`] — constructs the driver without any I2C traffic.
/// 2. [`OledDriver::init()`] — sends the SSD1306 initialisation sequence.
/// 3. [`OledDriver::clear_buffer()`] and [`OledDriver::draw_frame()`] —
///    update the frame buffer.
/// 4. [`OledDriver::flush()`] — transfers the frame buffer to hardware.
///
/// # Example
///
/// ```no_run
/// use wink_oled_display_rs::{frames, Frame, OledDriver};
///
/// # async fn example(i2c: impl embedded_hal_async::i2c::I2c) {
/// let mut oled = OledDriver::new(i2c, 0x3C);
/// oled.init().await.unwrap();
/// oled.clear_buffer();
/// oled.draw_frame(&Frame::for_display(frames::WINK_4[0]).unwrap()).unwrap();
/// oled.flush().await.unwrap();
/// # }
/// ```
pub struct OledDriver<I2C> {
    display: Display<I2C>,
    /// Set to `true` after a successful `init()` call.
    initialized: bool,
}

impl<I2C> OledDriver<I2C>
where
    I2C: I2c,
{
    /// Construct an uninitialised driver.
    ///
    /// No I2C traffic is generated. You **must** call [`init()`](Self::init)
    /// before drawing or flushing.
    ///
    /// # Arguments
    /// * `i2c` — I2C peripheral (takes ownership for exclusive access).
    /// * `address` — 7-bit I2C device address (typically `0x3C` or `0x3D`).
    pub fn new(i2c: I2C, address: u8) -> Self {
        let interface = I2CDisplayInterface::new_custom_address(i2c, address);
        let display =
            Ssd1306Async::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
                .into_buffered_graphics_mode();

        Self {
            display,
            initialized: false,
        }
    }

    /// Initialise the SSD1306 hardware and clear the frame buffer.
    ///
    /// The controller generates its panel voltage from the 3.3 V supply
    /// with the internal charge pump, which is the `ssd1306` crate's
    /// default.
    ///
    /// # Errors
    ///
    /// Returns [`OledError::InitializationFailed`] if the display does not
    /// respond.
    pub async fn init(&mut self) -> Result<(), OledError> {
        self.display
            .init()
            .await
            .map_err(|_| OledError::InitializationFailed)?;
        self.display.clear_buffer();
        self.initialized = true;
        Ok(())
    }

    /// Clear the in-memory frame buffer.
    ///
    /// Does **not** send any I2C traffic — the display is unchanged until
    /// [`flush()`](Self::flush) is called.
    pub fn clear_buffer(&mut self) {
        self.display.clear_buffer();
    }

    /// Draw the lit pixels of `frame` at the origin.
    ///
    /// Unlit pixels leave the buffer untouched, so drawing onto a cleared
    /// buffer reproduces the frame exactly.
    ///
    /// # Errors
    ///
    /// * [`OledError::NotInitialized`] before [`init()`](Self::init).
    /// * [`OledError::FrameSize`] if the frame is not 128×64.
    pub fn draw_frame(&mut self, frame: &Frame<'_>) -> Result<(), OledError> {
        if !self.initialized {
            return Err(OledError::NotInitialized);
        }
        if !frame.matches_display() {
            return Err(OledError::FrameSize {
                width: frame.width(),
                height: frame.height(),
            });
        }
        self.display.draw_iter(frame.lit_pixels())?;
        Ok(())
    }

    /// Transfer the frame buffer to the display via I2C.
    ///
    /// At 400 kHz I2C this takes approximately 20 ms for a full 1024-byte
    /// frame.
    ///
    /// # Errors
    ///
    /// Returns [`OledError::NotInitialized`] if [`init()`](Self::init) has
    /// not been called, or [`OledError::Display`] on a bus-level failure.
    pub async fn flush(&mut self) -> Result<(), OledError> {
        if !self.initialized {
            return Err(OledError::NotInitialized);
        }
        self.display.flush().await?;
        Ok(())
    }

    /// Check whether the display has been successfully initialised.
    ///
    /// No I2C traffic is generated.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }
}

impl<I2C> FrameSurface for OledDriver<I2C>
where
    I2C: I2c,
{
    type Error = OledError;

    fn clear(&mut self) {
        self.clear_buffer();
    }

    fn draw_frame(&mut self, frame: &Frame<'_>) -> Result<(), OledError> {
        OledDriver::draw_frame(self, frame)
    }

    async fn flush(&mut self) -> Result<(), OledError> {
        OledDriver::flush(self).await
    }
}

// ── Tests ────────────────────────────────────────────────────────────────

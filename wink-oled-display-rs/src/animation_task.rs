//! Embassy animation task.
//!
//! Initialises the OLED and then hands it to an [`Animator`] driven by
//! [`embassy_time::Delay`].

use embedded_hal_async::i2c::I2c;

use crate::animator::{AnimationConfig, Animator};
use crate::driver::OledDriver;
use crate::source::FrameSource;

/// Animation loop for the OLED display.
///
/// This is a regular `async fn` — **not** an Embassy `#[task]`. Callers
/// should create a thin, concrete task wrapper that calls this function,
/// since Embassy tasks cannot be generic:
///
/// ```ignore
/// #[embassy_executor::task]
/// async fn oled_task(
///     driver: OledDriver<MyConcreteI2cType>,
///     source: PrecomputedSequence<'static>,
///     config: AnimationConfig,
/// ) {
///     animation_task(driver, source, config).await;
/// }
/// ```
///
/// # Errors
///
/// * Initialisation failure: logs the error and **returns** (task exits).
/// * Render / flush failure: logged by the animator; the frame's delay
///   still elapses and playback continues.
pub async fn animation_task<I2C, F>(mut driver: OledDriver<I2C>, source: F, config: AnimationConfig)
where
    I2C: I2c,
    F: FrameSource,
{
    if let Err(_e) = driver.init().await {
        #[cfg(feature = "defmt")]
        defmt::error!("OLED init failed: {}", _e);
        return;
    }

    #[cfg(feature = "defmt")]
    defmt::info!(
        "OLED initialised, {} ms per frame, {} ms per cycle",
        config.inter_frame_delay_ms,
        config.inter_cycle_delay_ms
    );

    let mut animator = Animator::new(driver, source, embassy_time::Delay, config);
    animator.run().await
}

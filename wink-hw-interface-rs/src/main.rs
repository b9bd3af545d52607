//! wink-hw-interface
//!
//! Wink animation firmware for the Raspberry Pi Pico 2. Plays a compiled-in
//! frame table on an SSD1306 128×64 OLED forever:
//!
//! 1. Clear the frame buffer, draw the next frame, flush it over I2C.
//! 2. Wait the inter-frame delay.
//! 3. After the last frame, wait the inter-cycle delay and start over.
//!
//! The table is chosen at build time with the `wink-4` (default) or `wink-8`
//! cargo feature.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::block::ImageDef;
use embassy_rp::i2c::{self, I2c};
use embassy_rp::peripherals::I2C0;
use {defmt_rtt as _, panic_probe as _};

use wink_oled_display_rs::{
    animation_task, frames, AnimationConfig, OledDriver, PrecomputedSequence, FRAME_BYTES,
};

// ---------------------------------------------------------------------------
// Boot block and interrupt binding
// ---------------------------------------------------------------------------

/// Tell the RP2350 Boot ROM about our application.
#[link_section = ".start_block"]
#[used]
pub static IMAGE_DEF: ImageDef = embassy_rp::block::ImageDef::secure_exe();

// Wire the I2C0 peripheral interrupt to Embassy's async handler.
bind_interrupts!(struct Irqs {
    I2C0_IRQ => i2c::InterruptHandler<I2C0>;
});

// ---------------------------------------------------------------------------
// Animation selection
// ---------------------------------------------------------------------------

#[cfg(not(feature = "wink-8"))]
static FRAMES: &[&[u8]] = &frames::WINK_4;
#[cfg(not(feature = "wink-8"))]
const CONFIG: AnimationConfig = AnimationConfig::wink_4();

#[cfg(feature = "wink-8")]
static FRAMES: &[&[u8]] = &frames::WINK_8;
#[cfg(feature = "wink-8")]
const CONFIG: AnimationConfig = AnimationConfig::wink_8();

/// SSD1306 I2C address (SA0 low).
const OLED_ADDRESS: u8 = 0x3C;

/// I2C0 is used only by the OLED, so it is owned outright.
type OledI2c = I2c<'static, I2C0, i2c::Async>;

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

/// Thin wrapper that monomorphises the generic `animation_task` so it can be
/// spawned as a concrete Embassy task.
#[embassy_executor::task]
async fn oled_task(
    driver: OledDriver<OledI2c>,
    source: PrecomputedSequence<'static>,
    config: AnimationConfig,
) {
    animation_task(driver, source, config).await;
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_rp::init(Default::default());
    info!("wink-hw-interface starting");

    // —— Pin assignments ————————————————————————————————————————————————————
    // I2C_SDA → GP20  (p.PIN_20)
    // I2C_SCL → GP21  (p.PIN_21)
    // ———————————————————————————————————————————————————————————————————————

    // 400 kHz keeps a full 1024-byte flush around 20 ms.
    let mut i2c_config = i2c::Config::default();
    i2c_config.frequency = 400_000;
    let i2c = I2c::new_async(
        p.I2C0,
        p.PIN_21, // SCL
        p.PIN_20, // SDA
        Irqs,
        i2c_config,
    );

    let oled_driver = OledDriver::new(i2c, OLED_ADDRESS);

    // Rejects an empty table or a frame that is not FRAME_BYTES long.
    let source = unwrap!(PrecomputedSequence::new(FRAMES));
    info!(
        "Playing {} frames of {} bytes",
        source.len(),
        FRAME_BYTES
    );

    spawner.spawn(oled_task(oled_driver, source, CONFIG)).unwrap();

    info!("Animation task spawned");
}

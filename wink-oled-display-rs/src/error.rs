//! Error types for frames and the OLED display driver.

use core::fmt;

use display_interface::DisplayError;

/// Errors that can occur during OLED display operations.
///
/// The `ssd1306` crate wraps all underlying I2C bus errors into
/// [`DisplayError`], so this enum is non-generic.
#[derive(Debug)]
pub enum OledError {
    /// Display interface error (wraps I2C and other bus-level failures).
    Display(DisplayError),
    /// Display hardware did not respond to initialisation.
    InitializationFailed,
    /// An operation was attempted before [`OledDriver::init()`](crate::OledDriver::init)
    /// was called.
    NotInitialized,
    /// A frame's dimensions do not match the panel.
    FrameSize { width: u32, height: u32 },
}

impl From<DisplayError> for OledError {
    fn from(e: DisplayError) -> Self {
        OledError::Display(e)
    }
}

impl fmt::Display for OledError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            OledError::Display(e) => write!(f, "Display interface error: {:?}", e),
            OledError::InitializationFailed => write!(f, "Initialization failed"),
            OledError::NotInitialized => write!(f, "Not initialized"),
            OledError::FrameSize { width, height } => {
                write!(f, "Frame is {}x{}, panel is 128x64", width, height)
            }
        }
    }
}

impl core::error::Error for OledError {}

#[cfg(feature = "defmt")]
impl defmt::Format for OledError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            OledError::Display(_e) => defmt::write!(f, "Display interface error"),
            OledError::InitializationFailed => defmt::write!(f, "Initialization failed"),
            OledError::NotInitialized => defmt::write!(f, "Not initialized"),
            OledError::FrameSize { width, height } => {
                defmt::write!(f, "Frame size {}x{} does not match panel", width, height)
            }
        }
    }
}

/// Errors raised while building frames and frame sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Packed data length differs from `ceil(width / 8) * height`.
    Length { expected: usize, actual: usize },
    /// A frame sequence must hold at least one frame.
    EmptySequence,
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FrameError::Length { expected, actual } => {
                write!(f, "Frame data is {} bytes, expected {}", actual, expected)
            }
            FrameError::EmptySequence => write!(f, "Frame sequence is empty"),
        }
    }
}

impl core::error::Error for FrameError {}

//! Error types for the panel renderers.

use display_interface::DisplayError as InterfaceError;

/// Errors that can occur while driving either front-panel display.
///
/// The `ssd1306` crate wraps bus failures into a `display_interface`
/// error; the character panel talks to its PCF8574 backpack directly and
/// reports bus failures as [`DisplayError::Bus`].
#[derive(Debug)]
pub enum DisplayError {
    /// Display interface error from the graphic panel.
    Interface(InterfaceError),
    /// I2C transaction to the character panel backpack failed.
    Bus,
    /// Display hardware did not respond to initialisation.
    InitializationFailed,
    /// A draw or commit was attempted before `init()`.
    NotInitialized,
}

impl From<InterfaceError> for DisplayError {
    fn from(e: InterfaceError) -> Self {
        DisplayError::Interface(e)
    }
}

impl core::fmt::Display for DisplayError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DisplayError::Interface(e) => write!(f, "display interface error: {:?}", e),
            DisplayError::Bus => f.write_str("character panel bus error"),
            DisplayError::InitializationFailed => f.write_str("initialization failed"),
            DisplayError::NotInitialized => f.write_str("not initialized"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for DisplayError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            DisplayError::Interface(_e) => defmt::write!(f, "Display interface error"),
            DisplayError::Bus => defmt::write!(f, "Character panel bus error"),
            DisplayError::InitializationFailed => defmt::write!(f, "Initialization failed"),
            DisplayError::NotInitialized => defmt::write!(f, "Not initialized"),
        }
    }
}

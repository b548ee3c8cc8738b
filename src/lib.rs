//! This `embedded-hal`-based library drives a [HD44780](https://en.wikipedia.org/wiki/Hitachi_HD44780_LCD_controller)
//! compatible character display through a PCF8574T I2C GPIO expander, in a `no_std` environment.
//! These expanders are the ubiquitous unbranded "I2C backpacks" soldered to the back of 16x2 and 20x4 LCD modules.
//!
//! The driver is split in two layers:
//! - [`DisplayController`] encodes the HD44780 instruction set (clear, home, cursor, entry mode,
//!   display control, custom glyphs) and keeps local copies of the controller's mode registers, so
//!   a single flag such as cursor blinking can be changed without disturbing the others.
//! - A [`Transport`] moves bytes to the controller. [`I2CBacklightTransport`] splits every byte into
//!   two nibbles, maps them onto the expander's output port together with the register select and
//!   backlight lines, and pulses the enable line to latch them.
//!
//! Key features include:
//! - HD44780 power-on initialization in 4-bit mode
//! - Cursor, blink, text direction, autoscroll and shift control
//! - Custom glyphs in CGRAM
//! - Backlight control with either polarity
//! - Configurable expander wiring through [`PinMap`]
//! - `core::fmt::Write` implementation for easy use with the `write!` macro
//! - Optional support for the `defmt` and `ufmt` frameworks
//!
//! ## Usage
//! ```rust
//! use pcf8574_lcd::{CharacterDisplayPCF8574T, LcdDisplayType};
//!
//! // board setup
//! let i2c = ...; // I2C peripheral, 100 kHz
//! let delay = ...; // DelayNs implementation
//!
//! let mut lcd = CharacterDisplayPCF8574T::new(i2c, LcdDisplayType::Lcd16x2, delay);
//! lcd.probe()?.initialize()?;
//! lcd.set_cursor_position(1, 0)?.print("Hello, world!")?;
//! ```
//! Every operation returns a `Result` wrapping the display, so commands can be chained.
//! Failed bus writes are not retried, and the local register copies are updated before the write
//! is attempted.
//!
//! Out-of-range rows are clamped to the last row and glyph slots are masked to `0..=7`. Neither is
//! reported as an error.
#![no_std]

use core::fmt::Display;

use embedded_hal::{delay::DelayNs, i2c};

mod adapter_config;
mod bit_configurations;
mod driver;
mod geometry;

pub use adapter_config::{BacklightPolarity, PinMap, DEFAULT_I2C_ADDRESS, DEFAULT_I2C_FREQUENCY_HZ};
pub use driver::{
    generic_pcf8574t::I2CBacklightTransport,
    hd44780::{CharacterFont, DisplayController, ShiftDirection, TextDirection, GLYPH_SLOTS},
    SendMode, Transport,
};
pub use geometry::{Geometry, LcdDisplayType, DEFAULT_ROW_OFFSETS, MAX_ROWS};

/// HD44780 based character display using a generic PCF8574T I2C adapter.
pub type CharacterDisplayPCF8574T<I2C, DELAY> = DisplayController<I2CBacklightTransport<I2C>, DELAY>;

/// Errors that can occur when talking to the display through the I2C expander
// Debug, PartialEq and Clone are written out so they only require the bus error type,
// not the bus itself, to implement them.
pub enum CharacterDisplayError<I2C>
where
    I2C: i2c::I2c,
{
    /// I2C error returned from the underlying I2C implementation
    I2cError(I2C::Error),
    /// No device acknowledged the given address
    DeviceNotFound(u8),
    /// Formatting error
    FormattingError(core::fmt::Error),
}

impl<I2C> core::fmt::Debug for CharacterDisplayError<I2C>
where
    I2C: i2c::I2c,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            CharacterDisplayError::I2cError(e) => f.debug_tuple("I2cError").field(e).finish(),
            CharacterDisplayError::DeviceNotFound(address) => {
                f.debug_tuple("DeviceNotFound").field(address).finish()
            }
            CharacterDisplayError::FormattingError(e) => {
                f.debug_tuple("FormattingError").field(e).finish()
            }
        }
    }
}

impl<I2C> PartialEq for CharacterDisplayError<I2C>
where
    I2C: i2c::I2c,
    I2C::Error: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (CharacterDisplayError::I2cError(a), CharacterDisplayError::I2cError(b)) => a == b,
            (CharacterDisplayError::DeviceNotFound(a), CharacterDisplayError::DeviceNotFound(b)) => {
                a == b
            }
            (CharacterDisplayError::FormattingError(a), CharacterDisplayError::FormattingError(b)) => {
                a == b
            }
            _ => false,
        }
    }
}

impl<I2C> Clone for CharacterDisplayError<I2C>
where
    I2C: i2c::I2c,
    I2C::Error: Clone,
{
    fn clone(&self) -> Self {
        match self {
            CharacterDisplayError::I2cError(e) => CharacterDisplayError::I2cError(e.clone()),
            CharacterDisplayError::DeviceNotFound(address) => {
                CharacterDisplayError::DeviceNotFound(*address)
            }
            CharacterDisplayError::FormattingError(e) => CharacterDisplayError::FormattingError(*e),
        }
    }
}

impl<I2C> From<core::fmt::Error> for CharacterDisplayError<I2C>
where
    I2C: i2c::I2c,
{
    fn from(err: core::fmt::Error) -> Self {
        CharacterDisplayError::FormattingError(err)
    }
}

impl<I2C> From<&CharacterDisplayError<I2C>> for &'static str
where
    I2C: i2c::I2c,
{
    fn from(err: &CharacterDisplayError<I2C>) -> Self {
        match err {
            CharacterDisplayError::I2cError(_) => "I2C error",
            CharacterDisplayError::DeviceNotFound(_) => "No I2C device found",
            CharacterDisplayError::FormattingError(_) => "Formatting error",
        }
    }
}

#[cfg(feature = "defmt")]
impl<I2C> defmt::Format for CharacterDisplayError<I2C>
where
    I2C: i2c::I2c,
{
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            CharacterDisplayError::DeviceNotFound(address) => {
                defmt::write!(fmt, "No I2C device found at {=u8:#x}", address)
            }
            _ => {
                let msg: &'static str = From::from(self);
                defmt::write!(fmt, "{}", msg);
            }
        }
    }
}

#[cfg(feature = "ufmt")]
impl<I2C> ufmt::uDisplay for CharacterDisplayError<I2C>
where
    I2C: i2c::I2c,
{
    fn fmt<W>(&self, w: &mut ufmt::Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: ufmt::uWrite + ?Sized,
    {
        let msg: &'static str = From::from(self);
        ufmt::uwrite!(w, "{}", msg)
    }
}

impl<I2C> Display for CharacterDisplayError<I2C>
where
    I2C: i2c::I2c,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            CharacterDisplayError::DeviceNotFound(address) => {
                write!(f, "No I2C device found at {:#04x}", address)
            }
            _ => {
                let msg: &'static str = From::from(self);
                write!(f, "{}", msg)
            }
        }
    }
}

impl<I2C, DELAY> CharacterDisplayPCF8574T<I2C, DELAY>
where
    I2C: i2c::I2c,
    DELAY: DelayNs,
{
    /// Create a new character display with the default I2C address and backpack wiring.
    pub fn new(i2c: I2C, lcd_type: LcdDisplayType, delay: DELAY) -> Self {
        Self::new_with_address(i2c, DEFAULT_I2C_ADDRESS, lcd_type, delay)
    }

    /// Create a new character display at a specific I2C address with the default backpack wiring.
    pub fn new_with_address(i2c: I2C, address: u8, lcd_type: LcdDisplayType, delay: DELAY) -> Self {
        DisplayController::from_transport(
            I2CBacklightTransport::new_with_address(i2c, address),
            lcd_type.into(),
            delay,
        )
    }

    /// returns the I2C peripheral. mostly needed for testing
    #[cfg(test)]
    fn i2c(&mut self) -> &mut I2C {
        self.transport_mut().i2c()
    }
}

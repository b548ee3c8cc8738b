pub mod generic_pcf8574t;
pub mod hd44780;

use crate::adapter_config::BacklightPolarity;

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// How a byte handed to [`Transport::send`] is latched into the HD44780.
pub enum SendMode {
    /// Instruction register write (RS low), sent as two nibbles
    Command,
    /// Data register write (RS high), sent as two nibbles
    Data,
    /// Only the low nibble is sent, with RS low. Used for the reset pulses of the
    /// power-on sequence while the controller may still be in 8-bit mode.
    FourBitsOnly,
}

/// Capability a physical interface must provide for the HD44780 command layer.
/// The controller never touches a bus directly, it only hands bytes and
/// backlight requests to an implementation of this trait.
pub trait Transport {
    type Error;

    /// Latch `value` into the HD44780 according to `mode`.
    fn send(&mut self, value: u8, mode: SendMode) -> Result<(), Self::Error>;

    /// The backlight control pin and polarity this interface is wired with, if any.
    fn backlight_wiring(&self) -> Option<(u8, BacklightPolarity)>;

    /// Record the backlight control pin and its polarity, then switch the backlight off.
    fn configure_backlight_pin(
        &mut self,
        pin: u8,
        polarity: BacklightPolarity,
    ) -> Result<(), Self::Error>;

    /// Switch the backlight on or off. Does nothing if no backlight pin is configured.
    fn set_backlight(&mut self, on: bool) -> Result<(), Self::Error>;

    /// Check that a device answers on the interface.
    fn probe(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

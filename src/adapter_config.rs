use core::fmt::Display;

/// Default 7-bit address of a PCF8574T backpack with all address jumpers open.
pub const DEFAULT_I2C_ADDRESS: u8 = 0x27;

/// Bus clock the PCF8574T is specified for. The bus itself is set up by the caller.
pub const DEFAULT_I2C_FREQUENCY_HZ: u32 = 100_000;

#[derive(Debug, PartialEq, Eq, Copy, Clone, Default)]
/// Level of the backlight control line that switches the backlight on.
pub enum BacklightPolarity {
    /// Backlight is lit while the control line is high
    #[default]
    Positive,
    /// Backlight is lit while the control line is low
    Negative,
}

impl BacklightPolarity {
    /// Whether the control line must be driven high to put the backlight in the `on` state.
    pub fn asserts(&self, on: bool) -> bool {
        match self {
            BacklightPolarity::Positive => on,
            BacklightPolarity::Negative => !on,
        }
    }
}

impl From<&BacklightPolarity> for &'static str {
    fn from(polarity: &BacklightPolarity) -> Self {
        match polarity {
            BacklightPolarity::Positive => "active-high",
            BacklightPolarity::Negative => "active-low",
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for BacklightPolarity {
    fn format(&self, fmt: defmt::Formatter) {
        let msg: &'static str = From::from(self);
        defmt::write!(fmt, "{}", msg);
    }
}

impl Display for BacklightPolarity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg: &'static str = From::from(self);
        write!(f, "{}", msg)
    }
}

/// Wiring between the expander's output port (P0..P7) and the HD44780 signals.
/// Every pin is a bit index into the 8-bit output word; indices are masked to `0..=7`.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinMap {
    pub rs: u8,
    /// Held low, the driver never reads from the display.
    pub rw: u8,
    pub enable: u8,
    /// Expander pins wired to HD44780 D4, D5, D6 and D7.
    pub data: [u8; 4],
    /// Backlight transistor control pin, `None` if the backlight is hard wired.
    pub backlight: Option<u8>,
    pub backlight_polarity: BacklightPolarity,
}

impl Default for PinMap {
    /// The layout found on nearly every PCF8574T backpack:
    /// P0=RS, P1=RW, P2=EN, P3=backlight, P4..P7=D4..D7.
    fn default() -> Self {
        Self {
            rs: 0,
            rw: 1,
            enable: 2,
            data: [4, 5, 6, 7],
            backlight: Some(3),
            backlight_polarity: BacklightPolarity::Positive,
        }
    }
}

impl PinMap {
    pub const fn pin_mask(pin: u8) -> u8 {
        1 << (pin & 0x07)
    }

    pub const fn rs_mask(&self) -> u8 {
        Self::pin_mask(self.rs)
    }

    pub const fn rw_mask(&self) -> u8 {
        Self::pin_mask(self.rw)
    }

    pub const fn enable_mask(&self) -> u8 {
        Self::pin_mask(self.enable)
    }

    /// Spread the low nibble of `value` over the four data pins.
    pub fn data_bits(&self, value: u8) -> u8 {
        self.data
            .iter()
            .enumerate()
            .filter(|&(bit, _)| value & (1 << bit) != 0)
            .fold(0, |bits, (_, &pin)| bits | Self::pin_mask(pin))
    }
}

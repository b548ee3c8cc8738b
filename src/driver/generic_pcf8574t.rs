use embedded_hal::i2c::{self, Error as _, ErrorKind, NoAcknowledgeSource};

use crate::{
    adapter_config::{BacklightPolarity, PinMap, DEFAULT_I2C_ADDRESS},
    driver::{SendMode, Transport},
    CharacterDisplayError,
};

/// HD44780 4-bit interface driven through the output port of a PCF8574T I2C GPIO expander.
/// Every write re-asserts all eight port lines, so the current backlight state is folded
/// into each nibble written.
pub struct I2CBacklightTransport<I2C>
where
    I2C: i2c::I2c,
{
    i2c: I2C,
    address: u8,
    pins: PinMap,
    backlight_pin_mask: u8,
    backlight_polarity: BacklightPolarity,
    backlight_status: u8,
}

impl<I2C> I2CBacklightTransport<I2C>
where
    I2C: i2c::I2c,
{
    /// Create a transport on the default address with the common backpack wiring.
    pub fn new(i2c: I2C) -> Self {
        Self::new_with_pins(i2c, DEFAULT_I2C_ADDRESS, PinMap::default())
    }

    pub fn new_with_address(i2c: I2C, address: u8) -> Self {
        Self::new_with_pins(i2c, address, PinMap::default())
    }

    pub fn new_with_pins(i2c: I2C, address: u8, pins: PinMap) -> Self {
        Self {
            i2c,
            address,
            pins,
            backlight_pin_mask: 0,
            backlight_polarity: BacklightPolarity::Positive,
            backlight_status: 0,
        }
    }

    pub fn default_i2c_address() -> u8 {
        DEFAULT_I2C_ADDRESS
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    pub fn pins(&self) -> &PinMap {
        &self.pins
    }

    /// returns the i2c object. mostly used for testing
    pub fn i2c(&mut self) -> &mut I2C {
        &mut self.i2c
    }

    /// Give back the bus.
    pub fn release(self) -> I2C {
        self.i2c
    }

    #[cfg(test)]
    pub(crate) fn backlight_status(&self) -> u8 {
        self.backlight_status
    }

    fn write_bits_to_gpio(&mut self, bits: u8) -> Result<(), CharacterDisplayError<I2C>> {
        self.i2c
            .write(self.address, &[bits])
            .map_err(CharacterDisplayError::I2cError)
    }

    /// Port value for one nibble with the enable line low. RW is always left low.
    fn nibble_bits(&self, nibble: u8, rs_setting: bool) -> u8 {
        let mut bits = self.pins.data_bits(nibble) | self.backlight_status;
        if rs_setting {
            bits |= self.pins.rs_mask();
        }
        bits & !self.pins.rw_mask()
    }

    fn pulse_enable(&mut self, bits: u8) -> Result<(), CharacterDisplayError<I2C>> {
        let enable = self.pins.enable_mask();
        self.write_bits_to_gpio(bits | enable)?;
        self.write_bits_to_gpio(bits & !enable)
    }

    fn write_nibble(&mut self, nibble: u8, rs_setting: bool) -> Result<(), CharacterDisplayError<I2C>> {
        let bits = self.nibble_bits(nibble & 0x0F, rs_setting);
        self.pulse_enable(bits)
    }
}

impl<I2C> Transport for I2CBacklightTransport<I2C>
where
    I2C: i2c::I2c,
{
    type Error = CharacterDisplayError<I2C>;

    fn send(&mut self, value: u8, mode: SendMode) -> Result<(), Self::Error> {
        match mode {
            SendMode::FourBitsOnly => self.write_nibble(value & 0x0F, false),
            SendMode::Command | SendMode::Data => {
                let rs_setting = mode == SendMode::Data;
                self.write_nibble(value >> 4, rs_setting)?;
                self.write_nibble(value & 0x0F, rs_setting)
            }
        }
    }

    fn backlight_wiring(&self) -> Option<(u8, BacklightPolarity)> {
        self.pins
            .backlight
            .map(|pin| (pin, self.pins.backlight_polarity))
    }

    fn configure_backlight_pin(
        &mut self,
        pin: u8,
        polarity: BacklightPolarity,
    ) -> Result<(), Self::Error> {
        #[cfg(feature = "defmt")]
        defmt::debug!("backlight on expander pin {}, {}", pin, polarity);
        self.pins.backlight = Some(pin & 0x07);
        self.pins.backlight_polarity = polarity;
        self.backlight_pin_mask = PinMap::pin_mask(pin);
        self.backlight_polarity = polarity;
        self.set_backlight(false)
    }

    fn set_backlight(&mut self, on: bool) -> Result<(), Self::Error> {
        if self.backlight_pin_mask == 0 {
            return Ok(());
        }
        self.backlight_status = if self.backlight_polarity.asserts(on) {
            self.backlight_pin_mask
        } else {
            0
        };
        self.write_bits_to_gpio(self.backlight_status)
    }

    /// Drive every port line except the backlight low and check the expander acknowledged
    /// its address.
    fn probe(&mut self) -> Result<(), Self::Error> {
        let address = self.address;
        let bits = self.backlight_status;
        self.i2c.write(address, &[bits]).map_err(|e| match e.kind() {
            ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address)
            | ErrorKind::NoAcknowledge(NoAcknowledgeSource::Unknown) => {
                #[cfg(feature = "defmt")]
                defmt::error!("no I2C device at address {=u8:#x}", address);
                CharacterDisplayError::DeviceNotFound(address)
            }
            _ => CharacterDisplayError::I2cError(e),
        })
    }
}

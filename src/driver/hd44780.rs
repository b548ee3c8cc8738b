// HD44780 command layer.
// `DisplayController` encodes the HD44780 instruction set and keeps shadow copies of the
// function-set, display-control and entry-mode registers, so a single flag can be changed
// without disturbing the others. Physical transmission is left to a `Transport`.

use embedded_hal::delay::DelayNs;

use crate::{
    adapter_config::BacklightPolarity,
    bit_configurations::{DisplayControlBits, EntryModeBits, FunctionSetBits},
    driver::{SendMode, Transport},
    geometry::Geometry,
};

// commands
const LCD_CMD_CLEARDISPLAY: u8 = 0x01; //  Clear display, set cursor position to zero
const LCD_CMD_RETURNHOME: u8 = 0x02; //  Set cursor position to zero
const LCD_CMD_ENTRYMODESET: u8 = 0x04; //  Sets the entry mode
const LCD_CMD_DISPLAYCONTROL: u8 = 0x08; //  Controls the display; does stuff like turning it off and on
const LCD_CMD_CURSORSHIFT: u8 = 0x10; //  Lets you move the cursor
const LCD_CMD_FUNCTIONSET: u8 = 0x20; //  Used to send the function to set to the display
const LCD_CMD_SETCGRAMADDR: u8 = 0x40; //  Used to set the CGRAM (character generator RAM) with characters
const LCD_CMD_SETDDRAMADDR: u8 = 0x80; //  Used to set the DDRAM (Display Data RAM)

// flags for display/cursor shift
const LCD_FLAG_DISPLAYMOVE: u8 = 0x08; //  Flag for moving the display
const LCD_FLAG_CURSORMOVE: u8 = 0x00; //  Flag for moving the cursor
const LCD_FLAG_MOVERIGHT: u8 = 0x04; //  Flag for moving right
const LCD_FLAG_MOVELEFT: u8 = 0x00; //  Flag for moving left

// power-on reset handshake, sent as single nibbles
const LCD_RESET_NIBBLE: u8 = 0x03;
const LCD_4BIT_NIBBLE: u8 = 0x02;

// settle times
const POWER_ON_FIRST_RESET_US: u32 = 5_000; // datasheet minimum 4.1ms
const POWER_ON_RESET_US: u32 = 400; // datasheet minimum 100us
const COMMAND_SETTLE_US: u32 = 100;
const SLOW_COMMAND_US: u32 = 2_000; // clear and home
const CGRAM_WRITE_US: u32 = 40;

/// Number of user definable glyphs in CGRAM.
pub const GLYPH_SLOTS: u8 = 8;

#[derive(Debug, PartialEq, Eq, Copy, Clone, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Character cell height. 5x10 dots is only available on single line displays.
pub enum CharacterFont {
    #[default]
    Dots5x8,
    Dots5x10,
}

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ShiftDirection {
    Left,
    Right,
}

impl ShiftDirection {
    const fn flag(&self) -> u8 {
        match self {
            ShiftDirection::Left => LCD_FLAG_MOVELEFT,
            ShiftDirection::Right => LCD_FLAG_MOVERIGHT,
        }
    }
}

#[derive(Debug, PartialEq, Eq, Copy, Clone, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Direction the cursor advances after each character written.
pub enum TextDirection {
    #[default]
    LeftToRight,
    RightToLeft,
}

/// HD44780 controller speaking through a [`Transport`]. Delays required by the
/// controller are blocking waits on `DELAY`.
pub struct DisplayController<T, DELAY>
where
    T: Transport,
    DELAY: DelayNs,
{
    transport: T,
    delay: DELAY,
    geometry: Geometry,
    font: CharacterFont,
    display_function: FunctionSetBits,
    display_control: DisplayControlBits,
    display_mode: EntryModeBits,
}

impl<T, DELAY> DisplayController<T, DELAY>
where
    T: Transport,
    DELAY: DelayNs,
{
    pub fn from_transport(transport: T, geometry: Geometry, delay: DELAY) -> Self {
        Self {
            transport,
            delay,
            geometry,
            font: CharacterFont::default(),
            display_function: FunctionSetBits::default(),
            display_control: DisplayControlBits::default(),
            display_mode: EntryModeBits::default(),
        }
    }

    /// Select the character font. Takes effect on the next [`initialize`](Self::initialize).
    pub fn with_font(mut self, font: CharacterFont) -> Self {
        self.font = font;
        self
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Give back the transport and delay.
    pub fn release(self) -> (T, DELAY) {
        (self.transport, self.delay)
    }

    /// Check that the display answers on its interface.
    pub fn probe(&mut self) -> Result<&mut Self, T::Error> {
        self.transport.probe()?;
        Ok(self)
    }

    /// Run the HD44780 power-on sequence and bring the display up with the cursor
    /// shown and blinking, text flowing left to right and the backlight on.
    /// Must be called before any other operation. Calling it again repeats the sequence.
    pub fn initialize(&mut self) -> Result<&mut Self, T::Error> {
        #[cfg(feature = "defmt")]
        defmt::debug!("initializing {} display", self.geometry);

        // the controller may be in 8-bit mode or halfway through a 4-bit transfer,
        // three reset nibbles bring it to a known 8-bit state
        self.transport
            .send(LCD_RESET_NIBBLE, SendMode::FourBitsOnly)?;
        self.delay.delay_us(POWER_ON_FIRST_RESET_US);
        self.transport
            .send(LCD_RESET_NIBBLE, SendMode::FourBitsOnly)?;
        self.delay.delay_us(POWER_ON_RESET_US);
        self.transport
            .send(LCD_RESET_NIBBLE, SendMode::FourBitsOnly)?;
        self.delay.delay_us(POWER_ON_RESET_US);
        self.transport
            .send(LCD_4BIT_NIBBLE, SendMode::FourBitsOnly)?;
        self.delay.delay_us(POWER_ON_RESET_US);

        self.display_function = FunctionSetBits::default();
        self.display_function.set_two_line(self.geometry.rows() > 1);
        self.display_function
            .set_large_font(self.font == CharacterFont::Dots5x10 && self.geometry.rows() == 1);
        self.send_command(LCD_CMD_FUNCTIONSET | self.display_function.bits())?;
        self.delay.delay_us(COMMAND_SETTLE_US);

        self.display_control = DisplayControlBits::default();
        self.display_control.set_cursor_on(true);
        self.display_control.set_blink_on(true);
        self.set_display_on(true)?;
        self.delay.delay_us(COMMAND_SETTLE_US);

        self.clear()?;
        self.delay.delay_us(COMMAND_SETTLE_US);

        self.display_mode = EntryModeBits::default();
        self.display_mode.set_left_to_right(true);
        self.commit_display_mode()?;
        self.delay.delay_us(COMMAND_SETTLE_US);

        if let Some((pin, polarity)) = self.transport.backlight_wiring() {
            self.transport.configure_backlight_pin(pin, polarity)?;
        }
        self.backlight(true)
    }

    /// Write a byte to the instruction register.
    pub fn send_command(&mut self, command: u8) -> Result<&mut Self, T::Error> {
        self.transport.send(command, SendMode::Command)?;
        Ok(self)
    }

    /// Write a byte to the data register, either DDRAM or CGRAM depending on the last address set.
    pub fn write_data(&mut self, data: u8) -> Result<&mut Self, T::Error> {
        self.transport.send(data, SendMode::Data)?;
        Ok(self)
    }

    /// Clear the display and return the cursor home. Blocks until the controller is done.
    pub fn clear(&mut self) -> Result<&mut Self, T::Error> {
        self.send_command(LCD_CMD_CLEARDISPLAY)?;
        self.delay.delay_us(SLOW_COMMAND_US);
        Ok(self)
    }

    /// Return the cursor and any display shift to the origin. Blocks until the controller is done.
    pub fn home(&mut self) -> Result<&mut Self, T::Error> {
        self.send_command(LCD_CMD_RETURNHOME)?;
        self.delay.delay_us(SLOW_COMMAND_US);
        Ok(self)
    }

    pub fn set_display_on(&mut self, on: bool) -> Result<&mut Self, T::Error> {
        self.display_control.set_display_on(on);
        self.commit_display_control()
    }

    pub fn set_cursor_visible(&mut self, visible: bool) -> Result<&mut Self, T::Error> {
        self.display_control.set_cursor_on(visible);
        self.commit_display_control()
    }

    pub fn set_blink(&mut self, blink: bool) -> Result<&mut Self, T::Error> {
        self.display_control.set_blink_on(blink);
        self.commit_display_control()
    }

    pub fn set_text_direction(&mut self, direction: TextDirection) -> Result<&mut Self, T::Error> {
        self.display_mode
            .set_left_to_right(direction == TextDirection::LeftToRight);
        self.commit_display_mode()
    }

    /// Shift the display content on every character written, keeping the cursor fixed.
    pub fn set_autoscroll(&mut self, autoscroll: bool) -> Result<&mut Self, T::Error> {
        self.display_mode.set_shift_increment(autoscroll);
        self.commit_display_mode()
    }

    /// Move the cursor one position without writing.
    pub fn shift_cursor(&mut self, direction: ShiftDirection) -> Result<&mut Self, T::Error> {
        self.send_command(LCD_CMD_CURSORSHIFT | LCD_FLAG_CURSORMOVE | direction.flag())
    }

    /// Shift the whole display content one position. DDRAM is not changed.
    pub fn scroll_display(&mut self, direction: ShiftDirection) -> Result<&mut Self, T::Error> {
        self.send_command(LCD_CMD_CURSORSHIFT | LCD_FLAG_DISPLAYMOVE | direction.flag())
    }

    /// Place the cursor. Rows past the last configured row land on the last row.
    pub fn set_cursor_position(&mut self, row: u8, col: u8) -> Result<&mut Self, T::Error> {
        self.send_command(LCD_CMD_SETDDRAMADDR | self.geometry.ddram_address(row, col))
    }

    /// Store an 8-row glyph pattern in CGRAM slot `slot & 0x07`.
    /// The address counter is left in CGRAM: call [`set_cursor_position`](Self::set_cursor_position)
    /// before writing text again.
    pub fn define_glyph(&mut self, slot: u8, pattern: [u8; 8]) -> Result<&mut Self, T::Error> {
        let slot = slot & (GLYPH_SLOTS - 1);
        self.send_command(LCD_CMD_SETCGRAMADDR | (slot << 3))?;
        self.delay.delay_us(CGRAM_WRITE_US);
        for row in pattern {
            self.write_data(row)?;
            self.delay.delay_us(CGRAM_WRITE_US);
        }
        Ok(self)
    }

    pub fn backlight(&mut self, on: bool) -> Result<&mut Self, T::Error> {
        self.transport.set_backlight(on)?;
        Ok(self)
    }

    /// Rewire the backlight control pin. The backlight is switched off.
    pub fn configure_backlight_pin(
        &mut self,
        pin: u8,
        polarity: BacklightPolarity,
    ) -> Result<&mut Self, T::Error> {
        self.transport.configure_backlight_pin(pin, polarity)?;
        Ok(self)
    }

    /// Display and backlight on.
    pub fn power_on(&mut self) -> Result<&mut Self, T::Error> {
        self.set_display_on(true)?.backlight(true)
    }

    /// Backlight and display off. DDRAM content is kept.
    pub fn power_off(&mut self) -> Result<&mut Self, T::Error> {
        self.backlight(false)?.set_display_on(false)
    }

    /// Write each byte of `text` at the cursor.
    pub fn print(&mut self, text: &str) -> Result<&mut Self, T::Error> {
        for byte in text.bytes() {
            self.write_data(byte)?;
        }
        Ok(self)
    }

    fn commit_display_control(&mut self) -> Result<&mut Self, T::Error> {
        self.send_command(LCD_CMD_DISPLAYCONTROL | self.display_control.bits())
    }

    fn commit_display_mode(&mut self) -> Result<&mut Self, T::Error> {
        self.send_command(LCD_CMD_ENTRYMODESET | self.display_mode.bits())
    }
}

/// `write!` support. Bytes go to the display as-is, see [`DisplayController::print`].
impl<T, DELAY> core::fmt::Write for DisplayController<T, DELAY>
where
    T: Transport,
    DELAY: DelayNs,
{
    fn write_str(&mut self, s: &str) -> Result<(), core::fmt::Error> {
        if self.print(s).is_err() {
            return Err(core::fmt::Error);
        }
        Ok(())
    }
}

#[cfg(feature = "ufmt")]
impl<T, DELAY> ufmt::uWrite for DisplayController<T, DELAY>
where
    T: Transport,
    DELAY: DelayNs,
{
    type Error = T::Error;

    fn write_str(&mut self, s: &str) -> Result<(), T::Error> {
        self.print(s)?;
        Ok(())
    }
}

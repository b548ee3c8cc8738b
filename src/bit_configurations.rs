// Shadow copies of the three HD44780 control registers. The driver cannot read
// them back from the controller, so every partial update is computed here and
// then committed as one full command byte.
use bitfield::bitfield;

bitfield! {
    /// Flags carried by the `FUNCTION_SET` command.
    #[derive(Clone, Copy, PartialEq, Eq, Default)]
    pub struct FunctionSetBits(u8);
    impl Debug;
    pub two_line, set_two_line: 3;
    pub large_font, set_large_font: 2;
}

bitfield! {
    /// Flags carried by the `DISPLAYCONTROL` command.
    #[derive(Clone, Copy, PartialEq, Eq, Default)]
    pub struct DisplayControlBits(u8);
    impl Debug;
    pub display_on, set_display_on: 2;
    pub cursor_on, set_cursor_on: 1;
    pub blink_on, set_blink_on: 0;
}

bitfield! {
    /// Flags carried by the `ENTRYMODESET` command.
    #[derive(Clone, Copy, PartialEq, Eq, Default)]
    pub struct EntryModeBits(u8);
    impl Debug;
    pub left_to_right, set_left_to_right: 1;
    pub shift_increment, set_shift_increment: 0;
}

impl FunctionSetBits {
    pub const fn bits(&self) -> u8 {
        self.0
    }
}

impl DisplayControlBits {
    pub const fn bits(&self) -> u8 {
        self.0
    }
}

impl EntryModeBits {
    pub const fn bits(&self) -> u8 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_control_bit_positions() {
        let mut control = DisplayControlBits::default();
        control.set_display_on(true);
        assert_eq!(control.bits(), 0x04);
        control.set_cursor_on(true);
        control.set_blink_on(true);
        assert_eq!(control.bits(), 0x07);
        control.set_cursor_on(false);
        assert_eq!(control.bits(), 0x05);
        assert!(control.blink_on());
    }

    #[test]
    fn test_entry_mode_bit_positions() {
        let mut mode = EntryModeBits::default();
        mode.set_left_to_right(true);
        assert_eq!(mode.bits(), 0x02);
        mode.set_shift_increment(true);
        assert_eq!(mode.bits(), 0x03);
        mode.set_left_to_right(false);
        assert_eq!(mode.bits(), 0x01);
    }

    #[test]
    fn test_function_set_bit_positions() {
        let mut function = FunctionSetBits::default();
        function.set_two_line(true);
        assert_eq!(function.bits(), 0x08);
        function.set_large_font(true);
        assert_eq!(function.bits(), 0x0C);
        function.set_two_line(false);
        assert_eq!(function.bits(), 0x04);
    }
}

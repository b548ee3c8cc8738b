use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, Operation};
use pcf8574_lcd::{
    BacklightPolarity, DisplayController, Geometry, I2CBacklightTransport, SendMode, Transport,
};
use proptest::prelude::*;

/// Records every command and data byte handed to it.
#[derive(Default)]
struct RecordingTransport {
    sent: Vec<(u8, SendMode)>,
}

impl RecordingTransport {
    fn last_command(&self) -> Option<u8> {
        self.sent
            .iter()
            .rev()
            .find(|(_, mode)| *mode == SendMode::Command)
            .map(|(value, _)| *value)
    }
}

impl Transport for RecordingTransport {
    type Error = ();

    fn send(&mut self, value: u8, mode: SendMode) -> Result<(), ()> {
        self.sent.push((value, mode));
        Ok(())
    }

    fn backlight_wiring(&self) -> Option<(u8, BacklightPolarity)> {
        None
    }

    fn configure_backlight_pin(&mut self, _pin: u8, _polarity: BacklightPolarity) -> Result<(), ()> {
        Ok(())
    }

    fn set_backlight(&mut self, _on: bool) -> Result<(), ()> {
        Ok(())
    }
}

/// Records every single-byte write on the bus.
#[derive(Default)]
struct RecordingBus {
    writes: Vec<u8>,
}

impl ErrorType for RecordingBus {
    type Error = ErrorKind;
}

impl I2c for RecordingBus {
    fn transaction(&mut self, _address: u8, operations: &mut [Operation<'_>]) -> Result<(), ErrorKind> {
        for operation in operations {
            match operation {
                Operation::Write(bytes) => self.writes.extend_from_slice(bytes),
                Operation::Read(_) => return Err(ErrorKind::Other),
            }
        }
        Ok(())
    }
}

struct NoDelay;

impl DelayNs for NoDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

fn controller(rows: u8) -> DisplayController<RecordingTransport, NoDelay> {
    DisplayController::from_transport(RecordingTransport::default(), Geometry::new(rows, 20), NoDelay)
}

const ENABLE: u8 = 0b0000_0100;
const RS: u8 = 0b0000_0001;
const BACKLIGHT: u8 = 0b0000_1000;

proptest! {
    #[test]
    fn display_control_is_order_independent(
        display in any::<bool>(),
        cursor in any::<bool>(),
        blink in any::<bool>(),
        order in 0usize..6,
    ) {
        let permutations = [[0, 1, 2], [0, 2, 1], [1, 0, 2], [1, 2, 0], [2, 0, 1], [2, 1, 0]];
        let mut lcd = controller(2);
        prop_assert!(lcd.initialize().is_ok());
        for step in permutations[order] {
            let result = match step {
                0 => lcd.set_display_on(display).map(|_| ()),
                1 => lcd.set_cursor_visible(cursor).map(|_| ()),
                _ => lcd.set_blink(blink).map(|_| ()),
            };
            prop_assert!(result.is_ok());
        }

        let expected = 0x08
            | if display { 0x04 } else { 0 }
            | if cursor { 0x02 } else { 0 }
            | if blink { 0x01 } else { 0 };
        let (transport, _) = lcd.release();
        prop_assert_eq!(transport.last_command(), Some(expected));
    }

    #[test]
    fn rows_past_the_end_clamp_to_last_row(rows in 1u8..=4, extra in 0u8..100, col in 0u8..20) {
        let mut clamped = controller(rows);
        let mut last = controller(rows);
        prop_assert!(clamped.set_cursor_position(rows + extra, col).is_ok());
        prop_assert!(last.set_cursor_position(rows - 1, col).is_ok());

        let (clamped, _) = clamped.release();
        let (last, _) = last.release();
        prop_assert_eq!(clamped.sent, last.sent);
    }

    #[test]
    fn glyph_slots_wrap_to_three_bits(slot in any::<u8>(), pattern in any::<[u8; 8]>()) {
        let mut wrapped = controller(2);
        let mut direct = controller(2);
        prop_assert!(wrapped.define_glyph(slot, pattern).is_ok());
        prop_assert!(direct.define_glyph(slot & 0x07, pattern).is_ok());

        let (wrapped, _) = wrapped.release();
        let (direct, _) = direct.release();
        prop_assert_eq!(wrapped.sent[0], (0x40 | ((slot & 0x07) << 3), SendMode::Command));
        prop_assert_eq!(wrapped.sent, direct.sent);
    }

    #[test]
    fn every_byte_is_two_enable_pulses(value in any::<u8>(), data in any::<bool>(), backlight in any::<bool>()) {
        let mut transport = I2CBacklightTransport::new(RecordingBus::default());
        prop_assert!(transport.configure_backlight_pin(3, BacklightPolarity::Positive).is_ok());
        prop_assert!(transport.set_backlight(backlight).is_ok());
        let mode = if data { SendMode::Data } else { SendMode::Command };
        prop_assert!(transport.send(value, mode).is_ok());

        let writes = transport.release().writes;
        // pin configuration and backlight writes come first
        prop_assert_eq!(writes.len(), 2 + 4);
        let nibbles = &writes[2..];
        for (pulse, nibble) in nibbles.chunks(2).zip([value >> 4, value & 0x0F]) {
            prop_assert_eq!(pulse[0] & ENABLE, ENABLE);
            prop_assert_eq!(pulse[1] & ENABLE, 0);
            prop_assert_eq!(pulse[0] & !ENABLE, pulse[1]);
            prop_assert_eq!(pulse[1] >> 4, nibble);
            prop_assert_eq!(pulse[1] & RS != 0, data);
            prop_assert_eq!(pulse[1] & BACKLIGHT != 0, backlight);
        }
    }
}

#[test]
fn power_cycle_restores_initialized_state() {
    let mut lcd = DisplayController::from_transport(
        I2CBacklightTransport::new(RecordingBus::default()),
        Geometry::default(),
        NoDelay,
    );
    assert!(lcd.initialize().is_ok());
    assert!(lcd.power_on().is_ok());
    assert!(lcd.power_off().is_ok());
    assert!(lcd.power_on().is_ok());
    assert!(lcd.home().is_ok());

    let (transport, _) = lcd.release();
    let writes = transport.release().writes;
    // power on ends with display control 0x0F followed by the backlight write
    let tail = &writes[writes.len() - 9..];
    assert_eq!(
        tail,
        [
            0b0000_1100, 0b0000_1000, 0b1111_1100, 0b1111_1000, // 0x0F, backlight on
            0b0000_1000, // backlight on
            0b0000_1100, 0b0000_1000, 0b0010_1100, 0b0010_1000, // home, backlight still on
        ]
    );
}

#[test]
fn rewired_backlight_survives_initialize() {
    let mut lcd = DisplayController::from_transport(
        I2CBacklightTransport::new(RecordingBus::default()),
        Geometry::default(),
        NoDelay,
    );
    assert!(lcd
        .configure_backlight_pin(3, BacklightPolarity::Negative)
        .is_ok());
    assert!(lcd.initialize().is_ok());
    assert_eq!(
        lcd.transport_mut().backlight_wiring(),
        Some((3, BacklightPolarity::Negative))
    );

    let (transport, _) = lcd.release();
    let writes = transport.release().writes;
    // active-low: forced off drives the line high, on drives it low
    assert_eq!(&writes[writes.len() - 2..], [0b0000_1000, 0b0000_0000]);
}

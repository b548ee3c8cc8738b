use core::fmt::Display;

/// DDRAM base address of each display line on a standard HD44780 panel.
pub const DEFAULT_ROW_OFFSETS: [u8; 4] = [0x00, 0x40, 0x14, 0x54];

/// Highest number of lines addressable through the row offset table.
pub const MAX_ROWS: u8 = 4;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
/// Row and column counts of the panel plus the DDRAM base address of each row.
pub struct Geometry {
    rows: u8,
    cols: u8,
    row_offsets: [u8; 4],
}

impl Geometry {
    /// Create a geometry using the standard row offsets. `rows` is clamped to `1..=4`.
    pub const fn new(rows: u8, cols: u8) -> Self {
        Self::with_row_offsets(rows, cols, DEFAULT_ROW_OFFSETS)
    }

    /// Create a geometry for a panel whose lines start at non-standard DDRAM addresses.
    pub const fn with_row_offsets(rows: u8, cols: u8, row_offsets: [u8; 4]) -> Self {
        let rows = if rows == 0 {
            1
        } else if rows > MAX_ROWS {
            MAX_ROWS
        } else {
            rows
        };
        Self {
            rows,
            cols,
            row_offsets,
        }
    }

    pub const fn rows(&self) -> u8 {
        self.rows
    }

    pub const fn cols(&self) -> u8 {
        self.cols
    }

    pub const fn row_offsets(&self) -> [u8; 4] {
        self.row_offsets
    }

    /// Clamp a row index to the last configured row.
    pub const fn clamp_row(&self, row: u8) -> u8 {
        if row >= self.rows {
            self.rows - 1
        } else {
            row
        }
    }

    /// DDRAM address of `col` on `row`, with out-of-range rows clamped to the last row.
    /// The result is limited to the 7 address bits of the set-DDRAM command.
    pub const fn ddram_address(&self, row: u8, col: u8) -> u8 {
        let row = self.clamp_row(row);
        col.wrapping_add(self.row_offsets[row as usize]) & 0x7F
    }
}

impl Default for Geometry {
    fn default() -> Self {
        LcdDisplayType::Lcd16x2.into()
    }
}

impl From<LcdDisplayType> for Geometry {
    fn from(display_type: LcdDisplayType) -> Self {
        Geometry::with_row_offsets(
            display_type.rows(),
            display_type.cols(),
            display_type.row_offsets(),
        )
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Geometry {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{}x{}", self.cols, self.rows);
    }
}

#[derive(Debug, PartialEq, Clone, Copy, Default)]
/// Common character display sizes.
pub enum LcdDisplayType {
    /// 20x4 display
    Lcd20x4,
    /// 20x2 display
    Lcd20x2,
    /// 16x2 display
    #[default]
    Lcd16x2,
    /// 16x4 display
    Lcd16x4,
    /// 8x2 display
    Lcd8x2,
    /// 40x2 display
    Lcd40x2,
}

impl From<&LcdDisplayType> for &'static str {
    fn from(display_type: &LcdDisplayType) -> Self {
        match display_type {
            LcdDisplayType::Lcd20x4 => "20x4",
            LcdDisplayType::Lcd20x2 => "20x2",
            LcdDisplayType::Lcd16x2 => "16x2",
            LcdDisplayType::Lcd16x4 => "16x4",
            LcdDisplayType::Lcd8x2 => "8x2",
            LcdDisplayType::Lcd40x2 => "40x2",
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for LcdDisplayType {
    fn format(&self, fmt: defmt::Formatter) {
        let msg: &'static str = From::from(self);
        defmt::write!(fmt, "{}", msg);
    }
}

#[cfg(feature = "ufmt")]
impl ufmt::uDisplay for LcdDisplayType {
    fn fmt<W>(&self, w: &mut ufmt::Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: ufmt::uWrite + ?Sized,
    {
        let msg: &'static str = From::from(self);
        ufmt::uwrite!(w, "{}", msg)
    }
}

impl Display for LcdDisplayType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg: &'static str = From::from(self);
        write!(f, "{}", msg)
    }
}

impl LcdDisplayType {
    /// Get the number of rows for the display type
    pub const fn rows(&self) -> u8 {
        match self {
            LcdDisplayType::Lcd20x4 | LcdDisplayType::Lcd16x4 => 4,
            LcdDisplayType::Lcd20x2
            | LcdDisplayType::Lcd16x2
            | LcdDisplayType::Lcd8x2
            | LcdDisplayType::Lcd40x2 => 2,
        }
    }

    /// Get the number of columns for the display type
    pub const fn cols(&self) -> u8 {
        match self {
            LcdDisplayType::Lcd20x4 | LcdDisplayType::Lcd20x2 => 20,
            LcdDisplayType::Lcd16x2 | LcdDisplayType::Lcd16x4 => 16,
            LcdDisplayType::Lcd8x2 => 8,
            LcdDisplayType::Lcd40x2 => 40,
        }
    }

    /// Row offsets for the display type. 16 column, 4 line panels wrap their
    /// third and fourth lines at 0x10 rather than 0x14.
    pub const fn row_offsets(&self) -> [u8; 4] {
        match self {
            LcdDisplayType::Lcd16x4 => [0x00, 0x40, 0x10, 0x50],
            _ => DEFAULT_ROW_OFFSETS,
        }
    }
}

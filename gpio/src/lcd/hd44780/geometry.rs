use crate::lcd::hd44780::driver::SET_DDRAM_ADDRESS;
use crate::lcd::hd44780::{LcdError, LcdResult};

/// Line layouts supported by the driver.
///
/// The controller itself only knows "one line" and "multi-line"; four-line modules are two-line
/// controllers whose lines are split in half.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum DisplayLines {
    One,
    Two,
    Four,
}

impl DisplayLines {
    pub fn count(&self) -> u8 {
        match self {
            DisplayLines::One => 1,
            DisplayLines::Two => 2,
            DisplayLines::Four => 4,
        }
    }

    /// Whether the function set command needs the `N` (two line) bit.
    pub fn is_multiline(&self) -> bool {
        !matches!(self, DisplayLines::One)
    }

    /// The widest display the DDRAM can hold with this layout.
    pub fn max_columns(&self) -> u8 {
        match self {
            DisplayLines::One => 80,
            DisplayLines::Two => 40,
            DisplayLines::Four => 20,
        }
    }
}

impl TryFrom<u8> for DisplayLines {
    type Error = LcdError;

    fn try_from(lines: u8) -> Result<Self, Self::Error> {
        match lines {
            1 => Ok(DisplayLines::One),
            2 => Ok(DisplayLines::Two),
            4 => Ok(DisplayLines::Four),
            _ => Err(LcdError::UnsupportedLines(lines)),
        }
    }
}

/// Size of the display. Fixed once the driver is built.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct DisplayGeometry {
    columns: u8,
    lines: DisplayLines,
}

impl DisplayGeometry {
    /// Offset between the first and second half of a line on four-line modules.
    const FOUR_LINE_HALF_OFFSET: u8 = 20;
    /// DDRAM offset between two controller lines.
    const LINE_OFFSET: u8 = 64;

    /// # Errors
    /// - [LcdError::UnsupportedLines] unless `lines` is 1, 2 or 4.
    /// - [LcdError::InvalidColumns] if `columns` is zero or wider than the DDRAM line.
    pub fn new(columns: u8, lines: u8) -> LcdResult<Self> {
        let lines = DisplayLines::try_from(lines)?;
        if columns == 0 || columns > lines.max_columns() {
            return Err(LcdError::InvalidColumns {
                columns,
                max: lines.max_columns(),
            });
        }
        Ok(Self { columns, lines })
    }

    pub fn columns(&self) -> u8 {
        self.columns
    }

    pub fn lines(&self) -> DisplayLines {
        self.lines
    }

    /// Amount of characters visible at once.
    pub fn capacity(&self) -> usize {
        self.columns as usize * self.lines.count() as usize
    }

    /// Gets the DDRAM address of a character cell.
    ///
    /// Rows 2 and 3 of a four-line module continue rows 0 and 1 in memory, 20 cells further.
    ///
    /// # Errors
    /// - [LcdError::PositionOutOfRange] if the cell is not on the display.
    pub fn ddram_offset(&self, column: u8, row: u8) -> LcdResult<u8> {
        if column >= self.columns || row >= self.lines.count() {
            return Err(LcdError::PositionOutOfRange {
                column,
                row,
                columns: self.columns,
                lines: self.lines.count(),
            });
        }

        let line_start = match self.lines {
            DisplayLines::One => 0,
            DisplayLines::Two => Self::LINE_OFFSET * row,
            DisplayLines::Four if row % 2 == 0 => Self::LINE_OFFSET * (row / 2),
            DisplayLines::Four => {
                Self::LINE_OFFSET * ((row - 1) / 2) + Self::FOUR_LINE_HALF_OFFSET
            }
        };

        Ok(line_start + column)
    }

    /// Gets the complete "set DDRAM address" command byte for a cell, top bit included.
    pub fn position_command(&self, column: u8, row: u8) -> LcdResult<u8> {
        Ok(SET_DDRAM_ADDRESS | self.ddram_offset(column, row)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unsupported_line_counts() {
        for lines in [0, 3, 5, 8] {
            assert_eq!(DisplayGeometry::new(16, lines), Err(LcdError::UnsupportedLines(lines)));
        }
    }

    #[test]
    fn rejects_columns_wider_than_ddram() {
        assert_eq!(
            DisplayGeometry::new(0, 2),
            Err(LcdError::InvalidColumns { columns: 0, max: 40 })
        );
        assert_eq!(
            DisplayGeometry::new(21, 4),
            Err(LcdError::InvalidColumns { columns: 21, max: 20 })
        );
        assert!(DisplayGeometry::new(40, 2).is_ok());
        assert!(DisplayGeometry::new(80, 1).is_ok());
    }

    #[test]
    fn one_line_address_is_the_column() {
        let geometry = DisplayGeometry::new(16, 1).unwrap();
        assert_eq!(geometry.position_command(0, 0), Ok(0x80));
        assert_eq!(geometry.position_command(15, 0), Ok(0x80 + 15));
        assert!(geometry.position_command(0, 1).is_err());
    }

    #[test]
    fn two_line_addresses() {
        let geometry = DisplayGeometry::new(16, 2).unwrap();
        for column in 0..16 {
            for row in 0..2 {
                assert_eq!(
                    geometry.position_command(column, row),
                    Ok(64 * row + column + 0x80)
                );
            }
        }
    }

    #[test]
    fn four_line_addresses_interleave_halves() {
        let geometry = DisplayGeometry::new(20, 4).unwrap();
        for column in 0..20 {
            assert_eq!(geometry.position_command(column, 0), Ok(column + 0x80));
            assert_eq!(geometry.position_command(column, 1), Ok(column + 20 + 0x80));
            assert_eq!(geometry.position_command(column, 2), Ok(64 + column + 0x80));
            assert_eq!(geometry.position_command(column, 3), Ok(64 + 20 + column + 0x80));
        }
    }

    #[test]
    fn positions_outside_the_display_are_rejected() {
        let geometry = DisplayGeometry::new(16, 2).unwrap();
        assert_eq!(
            geometry.ddram_offset(16, 0),
            Err(LcdError::PositionOutOfRange { column: 16, row: 0, columns: 16, lines: 2 })
        );
        assert!(geometry.ddram_offset(0, 2).is_err());
    }

    #[test]
    fn multiline_flag_collapses_two_and_four() {
        assert!(!DisplayLines::One.is_multiline());
        assert!(DisplayLines::Two.is_multiline());
        assert!(DisplayLines::Four.is_multiline());
        assert_eq!(DisplayGeometry::new(20, 4).unwrap().capacity(), 80);
    }
}

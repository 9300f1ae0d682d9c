//! Command layer of the HD44780 controller.
//!
//! [HD44780Driver] encodes every instruction as a byte and leaves the transfer itself to the
//! implementation; [GpioHD44780Driver] bit-bangs it over four data lines.
mod gpio;
mod pins;
mod timing;

use crate::lcd::hd44780::{LcdError, LcdResult};
use std::fmt::Debug;
pub use gpio::*;
pub use pins::*;
pub use timing::*;

pub const CLEAR_DISPLAY: u8 = 0b00000001;
pub const RETURN_HOME: u8 = 0b00000010;
pub const ENTRY_MODE_SET: u8 = 0b00000100;
pub const DISPLAY_CONTROL: u8 = 0b00001000;
pub const CURSOR_SHIFT: u8 = 0b00010000;
pub const FUNCTION_SET: u8 = 0b00100000;
pub const SET_CGRAM_ADDRESS: u8 = 0b01000000;
pub const SET_DDRAM_ADDRESS: u8 = 0b10000000;

/// Low-level interface of an HD44780 controller.
///
/// The wiring this crate targets has no R/W line, so the controller can never be read back: there
/// is no busy flag, and every command simply has to be given enough time.
pub trait HD44780Driver: Debug {
    /// Brings a controller in an unknown state into 4-bit mode with the given line setting, turns
    /// the display on with the cursor hidden and clears it.
    fn init(&mut self, multiline: bool) -> LcdResult<()>;

    /// Clears the display and sets the cursor to the home position.
    fn clear_display(&mut self) -> LcdResult<()> {
        self.send_command(CLEAR_DISPLAY)
    }

    /// Sets the cursor to the home position.
    fn return_home(&mut self) -> LcdResult<()> {
        self.send_command(RETURN_HOME)
    }

    /// Sets the display to the specified entry mode.
    fn set_entry_mode(&mut self, cursor_direction: CursorDirection, shift: bool) -> LcdResult<()> {
        let mut command = ENTRY_MODE_SET;
        if cursor_direction == CursorDirection::Right {
            command |= 0b00000010;
        }
        if shift {
            command |= 0b00000001;
        }
        self.send_command(command)
    }

    /// Sets the display on/off, cursor on/off, and blinking on/off.
    ///
    /// All three flags live in one register, so they are always written together.
    fn set_display_control(
        &mut self,
        display_on: bool,
        cursor_on: bool,
        blink_on: bool,
    ) -> LcdResult<()> {
        let mut command = DISPLAY_CONTROL;
        if display_on {
            command |= 0b00000100;
        }
        if cursor_on {
            command |= 0b00000010;
        }
        if blink_on {
            command |= 0b00000001;
        }
        self.send_command(command)
    }

    /// Moves the cursor or shifts the display.
    fn cursor_shift(&mut self, display_shift: bool, direction: CursorDirection) -> LcdResult<()> {
        let mut command = CURSOR_SHIFT;
        if display_shift {
            command |= 0b00001000;
        }
        if direction == CursorDirection::Right {
            command |= 0b00000100;
        }
        self.send_command(command)
    }

    /// Sets the interface width, line mode and font.
    fn function_set(&mut self, eight_bit: bool, multiline: bool, alt_font: bool) -> LcdResult<()> {
        let mut command = FUNCTION_SET;
        if eight_bit {
            command |= 0b00010000;
        }
        if multiline {
            command |= 0b00001000;
        }
        if alt_font {
            command |= 0b00000100;
        }
        self.send_command(command)
    }

    /// Sets the CGRAM address. Following data bytes are written to custom character memory.
    fn set_cgram_address(&mut self, address: u8) -> LcdResult<()> {
        if address > 0b00111111 {
            return Err(LcdError::AddressOutOfRange { address, max: 0b00111111 });
        }
        self.send_command(SET_CGRAM_ADDRESS | address)
    }

    /// Sets the DDRAM address. Following data bytes are written to the display.
    fn set_ddram_address(&mut self, address: u8) -> LcdResult<()> {
        if address > 0b01111111 {
            return Err(LcdError::AddressOutOfRange { address, max: 0b01111111 });
        }
        self.send_command(SET_DDRAM_ADDRESS | address)
    }

    // Low-level commands
    // These raw commands are used by the high-level functions above.

    /// Sends a command to the HD44780 controller.
    /// Sets the RS pin to 0 (command).
    fn send_command(&mut self, command: u8) -> LcdResult<()>;

    /// Sends data to the HD44780 controller.
    /// Sets the RS pin to 1 (data).
    fn send_data(&mut self, data: u8) -> LcdResult<()>;
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum CursorDirection {
    /// Moves the cursor to the left after writing data.
    Left,
    /// Moves the cursor to the right after writing data.
    Right,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Commands(Vec<u8>);

    impl HD44780Driver for Commands {
        fn init(&mut self, _multiline: bool) -> LcdResult<()> {
            Ok(())
        }

        fn send_command(&mut self, command: u8) -> LcdResult<()> {
            self.0.push(command);
            Ok(())
        }

        fn send_data(&mut self, _data: u8) -> LcdResult<()> {
            unreachable!("commands only")
        }
    }

    #[test]
    fn encodes_command_bytes() {
        let mut driver = Commands::default();
        driver.clear_display().unwrap();
        driver.set_entry_mode(CursorDirection::Right, false).unwrap();
        driver.set_display_control(true, false, false).unwrap();
        driver.set_display_control(false, true, true).unwrap();
        driver.function_set(false, true, false).unwrap();
        driver.function_set(true, false, false).unwrap();
        driver.cursor_shift(true, CursorDirection::Left).unwrap();
        driver.set_cgram_address(0x18).unwrap();
        driver.set_ddram_address(0x40).unwrap();
        assert_eq!(driver.0, vec![0x01, 0x06, 0x0C, 0x0B, 0x28, 0x30, 0x18, 0x58, 0xC0]);
    }

    #[test]
    fn rejects_addresses_outside_memory() {
        let mut driver = Commands::default();
        assert_eq!(
            driver.set_cgram_address(0x40),
            Err(LcdError::AddressOutOfRange { address: 0x40, max: 0x3F })
        );
        assert!(driver.set_ddram_address(0x80).is_err());
        assert!(driver.0.is_empty());
    }
}

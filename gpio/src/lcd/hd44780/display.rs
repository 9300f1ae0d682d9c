use crate::lcd::hd44780::driver::HD44780Driver;
use crate::lcd::hd44780::{Backlight, DisplayGeometry, LcdError, LcdResult};
use crate::pwm::PwmPin;
use log::{debug, warn};

/// Number of custom characters the CGRAM holds.
pub const GLYPH_SLOTS: u8 = 8;

/// Rows of a custom character; only the lower five bits of each row are shown.
pub type GlyphBitmap = [u8; 8];

/// The display control register: display, cursor and blink flags.
///
/// The controller only accepts all three at once, so the last written value is kept here and
/// resent in full on every change.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct DisplayControl {
    pub display_on: bool,
    pub cursor_visible: bool,
    pub cursor_blink: bool,
}

/// A character display: an [HD44780Driver] together with the size of the glass, the last known
/// display control flags and an optional backlight.
///
/// [CharacterLcd::init] must be called first; every other operation fails with
/// [LcdError::NotInitialized] until then.
#[derive(Debug)]
pub struct CharacterLcd<'a, D: HD44780Driver> {
    driver: D,
    geometry: DisplayGeometry,
    control: DisplayControl,
    backlight: Option<Backlight<'a>>,
    initialized: bool,
}

impl<'a, D: HD44780Driver> CharacterLcd<'a, D> {
    pub fn new(
        driver: D,
        geometry: DisplayGeometry,
        backlight: Option<&'a mut dyn PwmPin>,
    ) -> Self {
        CharacterLcd {
            driver,
            geometry,
            control: DisplayControl::default(),
            backlight: backlight.map(Backlight::new),
            initialized: false,
        }
    }

    /// Initializes the controller, then the backlight if there is one.
    ///
    /// Leaves the display on, cleared, with the cursor hidden.
    pub fn init(&mut self) -> LcdResult<()> {
        self.driver.init(self.geometry.lines().is_multiline())?;
        if let Some(backlight) = &mut self.backlight {
            backlight.init()?;
        }
        self.control = DisplayControl {
            display_on: true,
            cursor_visible: false,
            cursor_blink: false,
        };
        self.initialized = true;
        debug!("{}x{} display ready", self.geometry.columns(), self.geometry.lines().count());
        Ok(())
    }

    fn ensure_initialized(&self) -> LcdResult<()> {
        if !self.initialized {
            return Err(LcdError::NotInitialized);
        }
        Ok(())
    }

    pub fn geometry(&self) -> DisplayGeometry {
        self.geometry
    }

    pub fn display_control(&self) -> DisplayControl {
        self.control
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Gets the backlight level, if there is a backlight.
    pub fn backlight_level(&self) -> Option<u8> {
        self.backlight.as_ref().map(Backlight::level)
    }

    /// Gives back the underlying driver.
    pub fn release(self) -> D {
        self.driver
    }

    /// Clears the display and moves the cursor home.
    pub fn clear(&mut self) -> LcdResult<()> {
        self.ensure_initialized()?;
        self.driver.clear_display()
    }

    fn write_control(&mut self, control: DisplayControl) -> LcdResult<()> {
        self.ensure_initialized()?;
        self.driver.set_display_control(
            control.display_on,
            control.cursor_visible,
            control.cursor_blink,
        )?;
        self.control = control;
        Ok(())
    }

    /// Shows a blinking cursor.
    pub fn cursor_on(&mut self) -> LcdResult<()> {
        self.cursor_on_blink(true)
    }

    /// Shows the cursor, blinking or not.
    pub fn cursor_on_blink(&mut self, blink: bool) -> LcdResult<()> {
        self.write_control(DisplayControl {
            cursor_visible: true,
            cursor_blink: blink,
            ..self.control
        })
    }

    pub fn cursor_off(&mut self) -> LcdResult<()> {
        self.write_control(DisplayControl {
            cursor_visible: false,
            cursor_blink: false,
            ..self.control
        })
    }

    /// Turns the display on. Cursor settings are kept.
    pub fn display_on(&mut self) -> LcdResult<()> {
        self.write_control(DisplayControl {
            display_on: true,
            ..self.control
        })
    }

    /// Blanks the display without losing its contents. Cursor settings are kept.
    pub fn display_off(&mut self) -> LcdResult<()> {
        self.write_control(DisplayControl {
            display_on: false,
            ..self.control
        })
    }

    /// Sets the backlight level, from `0` to [Backlight::MAX_LEVEL]. Without a backlight this does
    /// nothing.
    pub fn set_backlight(&mut self, level: u8) -> LcdResult<()> {
        self.ensure_initialized()?;
        if level > Backlight::MAX_LEVEL {
            return Err(LcdError::BacklightLevelOutOfRange {
                level,
                max: Backlight::MAX_LEVEL,
            });
        }
        match &mut self.backlight {
            Some(backlight) => backlight.set_level(level),
            None => {
                debug!("No backlight, ignoring level {}", level);
                Ok(())
            }
        }
    }

    /// Moves the cursor to the given cell.
    ///
    /// # Errors
    /// - [LcdError::PositionOutOfRange] if the cell is outside the display.
    pub fn goto_position(&mut self, column: u8, row: u8) -> LcdResult<()> {
        self.ensure_initialized()?;
        let command = self.geometry.position_command(column, row)?;
        self.driver.send_command(command)
    }

    fn write_char(&mut self, c: char) -> LcdResult<()> {
        if c.is_ascii() {
            self.driver.send_data(c as u8)
        } else {
            warn!("Non-ASCII character: {}", c);
            self.driver.send_data(b'?')
        }
    }

    /// Writes text at the cursor. Nothing wraps; what runs past the end of the line lands in
    /// invisible DDRAM (or on another line, depending on the module).
    pub fn print(&mut self, text: &str) -> LcdResult<()> {
        self.ensure_initialized()?;
        for c in text.chars() {
            self.write_char(c)?;
        }
        Ok(())
    }

    /// Writes text from the start of the given row.
    pub fn print_line(&mut self, text: &str, row: u8) -> LcdResult<()> {
        self.goto_position(0, row)?;
        self.print(text)
    }

    /// Writes text from the top left corner, moving to the next row every `columns` characters.
    /// After the last row it continues on the first one.
    pub fn print_wrapped(&mut self, text: &str) -> LcdResult<()> {
        self.goto_position(0, 0)?;

        let columns = self.geometry.columns() as usize;
        let lines = self.geometry.lines().count() as usize;
        for (i, c) in text.chars().enumerate() {
            self.write_char(c)?;
            let written = i + 1;
            if written % columns == 0 {
                self.goto_position(0, ((written / columns) % lines) as u8)?;
            }
        }
        Ok(())
    }

    /// Stores a custom character in one of the eight CGRAM slots.
    ///
    /// Afterwards the controller writes into CGRAM, so move the cursor (or clear) before printing.
    ///
    /// # Errors
    /// - [LcdError::GlyphSlotOutOfRange] if `slot` is not below 8.
    pub fn define_glyph(&mut self, slot: u8, bitmap: &GlyphBitmap) -> LcdResult<()> {
        self.ensure_initialized()?;
        if slot >= GLYPH_SLOTS {
            return Err(LcdError::GlyphSlotOutOfRange(slot));
        }
        self.driver.set_cgram_address(slot * 8)?;
        for &row in bitmap {
            self.driver.send_data(row)?;
        }
        Ok(())
    }

    /// Writes the custom character of a slot at the cursor.
    pub fn draw_glyph(&mut self, slot: u8) -> LcdResult<()> {
        self.ensure_initialized()?;
        if slot >= GLYPH_SLOTS {
            return Err(LcdError::GlyphSlotOutOfRange(slot));
        }
        self.driver.send_data(slot)
    }
}

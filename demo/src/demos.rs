use charlcd_gpio::lcd::hd44780::{CharacterLcd, GlyphBitmap};
use charlcd_gpio::lcd::hd44780::driver::HD44780Driver;
use eyre::eyre;
use log::{debug, info};
use std::str::FromStr;
use std::thread::sleep;
use std::time::Duration;

const PAGE_TIME: Duration = Duration::from_millis(2500);
const GLYPH_STEP_TIME: Duration = Duration::from_millis(300);

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum Demo {
    #[default]
    Wrapped,
    Line,
    Glyph,
}

impl FromStr for Demo {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "wrapped" => Ok(Demo::Wrapped),
            "line" => Ok(Demo::Line),
            "glyph" => Ok(Demo::Glyph),
            _ => Err(eyre!("Unknown demo {:?}, expected wrapped, line or glyph", s)),
        }
    }
}

impl Demo {
    /// Runs the demo until the process is stopped.
    pub fn run<D: HD44780Driver>(
        &self,
        lcd: &mut CharacterLcd<'_, D>,
        glyph: &GlyphBitmap,
    ) -> eyre::Result<()> {
        info!("Running {:?} demo", self);
        match self {
            Demo::Wrapped => wrapped(lcd),
            Demo::Line => line(lcd),
            Demo::Glyph => walk_glyph(lcd, glyph),
        }
    }
}

fn wrapped<D: HD44780Driver>(lcd: &mut CharacterLcd<'_, D>) -> eyre::Result<()> {
    loop {
        lcd.clear()?;
        lcd.print_wrapped("Hello World - wrapping demo")?;
        sleep(PAGE_TIME);

        lcd.clear()?;
        lcd.print_wrapped("0123456789ABCDEF BYE")?;
        sleep(PAGE_TIME);
    }
}

fn line<D: HD44780Driver>(lcd: &mut CharacterLcd<'_, D>) -> eyre::Result<()> {
    let row = lcd.geometry().lines().count().min(2) - 1;
    loop {
        lcd.clear()?;
        lcd.print_line("Line 2: hello", row)?;
        sleep(PAGE_TIME);
    }
}

fn walk_glyph<D: HD44780Driver>(
    lcd: &mut CharacterLcd<'_, D>,
    glyph: &GlyphBitmap,
) -> eyre::Result<()> {
    lcd.define_glyph(0, glyph)?;
    // Back to DDRAM
    lcd.clear()?;

    let geometry = lcd.geometry();
    loop {
        for row in 0..geometry.lines().count() {
            for column in 0..geometry.columns() {
                debug!("Glyph at ({}, {})", column, row);
                lcd.goto_position(column, row)?;
                lcd.draw_glyph(0)?;
                sleep(GLYPH_STEP_TIME);

                lcd.goto_position(column, row)?;
                lcd.print(" ")?;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_demo_names() {
        assert_eq!("wrapped".parse::<Demo>().unwrap(), Demo::Wrapped);
        assert_eq!("line".parse::<Demo>().unwrap(), Demo::Line);
        assert_eq!("glyph".parse::<Demo>().unwrap(), Demo::Glyph);
        assert!("scroll".parse::<Demo>().is_err());
    }
}

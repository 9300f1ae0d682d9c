use crate::lcd::hd44780::{LcdError, LcdResult};
use crate::pwm::{PwmExtension, PwmPin};
use log::debug;
use std::time::Duration;

/// PWM-dimmed backlight.
#[derive(Debug)]
pub struct Backlight<'a> {
    pin: &'a mut dyn PwmPin,
    level: u8,
}

impl<'a> Backlight<'a> {
    /// Brightest level.
    pub const MAX_LEVEL: u8 = 100;
    /// PWM period, about 2.5 kHz, well above visible flicker.
    pub const PERIOD: Duration = Duration::from_micros(400);

    pub fn new(pin: &'a mut dyn PwmPin) -> Self {
        Backlight { pin, level: 0 }
    }

    /// Programs the PWM period and turns the backlight fully on.
    pub fn init(&mut self) -> LcdResult<()> {
        self.pin.disable()?;
        // Duty must not exceed the period, so zero it before touching the period
        self.pin.set_duty_ns(0)?;
        self.pin.set_period(Self::PERIOD)?;
        self.set_level(Self::MAX_LEVEL)?;
        self.pin.enable()?;
        debug!("Backlight initialized on {:?}", self.pin);
        Ok(())
    }

    /// Sets the brightness, from `0` (off) to [Self::MAX_LEVEL].
    ///
    /// # Errors
    /// - [LcdError::BacklightLevelOutOfRange] if the level is above [Self::MAX_LEVEL].
    pub fn set_level(&mut self, level: u8) -> LcdResult<()> {
        if level > Self::MAX_LEVEL {
            return Err(LcdError::BacklightLevelOutOfRange {
                level,
                max: Self::MAX_LEVEL,
            });
        }
        self.pin
            .set_duty(Self::PERIOD * level as u32 / Self::MAX_LEVEL as u32)?;
        self.level = level;
        Ok(())
    }

    pub fn level(&self) -> u8 {
        self.level
    }
}

//! PWM outputs, used to dim the LCD backlight.
//!
//! See [SysfsPwmDriver] for the Linux implementation.
mod ext;
mod sysfs;

use crate::{GpioError, GpioResult};
use std::fmt::{Debug, Display};
use std::str::FromStr;
pub use ext::*;
pub use sysfs::*;

/// A PWM controller exposing one or more channels.
pub trait PwmDriver: Debug {
    /// Gets the amount of PWM channels of the controller.
    fn count(&self) -> GpioResult<usize>;

    /// Gets the PWM channel at the given index.
    fn get_pin(&self, index: usize) -> GpioResult<Box<dyn PwmPin + '_>>;
}

/// A single PWM channel. Times are in nanoseconds; [PwmExtension] offers the same in
/// [Duration](std::time::Duration).
pub trait PwmPin: Debug {
    fn period_ns(&self) -> GpioResult<u32>;
    fn set_period_ns(&mut self, period_ns: u32) -> GpioResult<()>;

    fn duty_ns(&self) -> GpioResult<u32>;
    /// Sets the high time of one period. Must not exceed the period.
    fn set_duty_ns(&mut self, duty_ns: u32) -> GpioResult<()>;

    fn polarity(&self) -> GpioResult<PwmPolarity>;
    fn set_polarity(&mut self, polarity: PwmPolarity) -> GpioResult<()>;

    fn is_enabled(&self) -> GpioResult<bool>;
    fn enable(&mut self) -> GpioResult<()>;
    fn disable(&mut self) -> GpioResult<()>;
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum PwmPolarity {
    #[default]
    Normal,
    Inversed,
}

impl FromStr for PwmPolarity {
    type Err = GpioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" => Ok(PwmPolarity::Normal),
            "inversed" => Ok(PwmPolarity::Inversed),
            _ => Err(GpioError::Other(format!("unknown PWM polarity {:?}", s))),
        }
    }
}

impl Display for PwmPolarity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let str = match self {
            PwmPolarity::Normal => "normal",
            PwmPolarity::Inversed => "inversed",
        };
        write!(f, "{}", str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polarity_round_trips_through_sysfs_names() {
        assert_eq!("normal".parse::<PwmPolarity>(), Ok(PwmPolarity::Normal));
        assert_eq!("inversed".parse::<PwmPolarity>(), Ok(PwmPolarity::Inversed));
        assert_eq!(PwmPolarity::Inversed.to_string(), "inversed");
        assert!("reversed".parse::<PwmPolarity>().is_err());
    }
}

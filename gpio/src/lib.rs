//! GPIO, PWM and delay abstractions used to bit-bang an HD44780-compatible character LCD.
//!
//! The hardware boundary is small: a [GpioDriver] that can configure pins as outputs
//! and write several of them in a single masked call, a [pwm::PwmPin] for the optional backlight,
//! and a [delay::Delay] for the blocking waits of the protocol. The protocol engine itself lives in
//! [lcd::hd44780].
pub mod delay;
pub mod gpiod;
pub mod lcd;
pub mod pwm;
pub mod raw;

#[cfg(test)]
pub(crate) mod mock;

use std::fmt::Debug;
use thiserror::Error;

#[derive(Debug, Error, Eq, PartialEq, Clone)]
pub enum GpioError {
    #[error("pin already in use")]
    AlreadyInUse,
    #[error("invalid argument")]
    InvalidArgument,
    #[error("the feature is not supported on this backend")]
    NotSupported,
    #[error("IO error: {0}")]
    Io(std::io::ErrorKind),
    #[error("error: {0}")]
    Other(String),
}

impl From<std::io::Error> for GpioError {
    fn from(err: std::io::Error) -> Self {
        GpioError::Io(err.kind())
    }
}

pub type GpioResult<T> = Result<T, GpioError>;

/// Highest pin index a 64-bit mask can address.
pub const MAX_PINS: usize = u64::BITS as usize;

/// Gets the mask bit of the given pin.
///
/// # Errors
/// - `GpioError::InvalidArgument` if the pin does not fit in a 64-bit mask.
pub fn pin_bit(pin: usize) -> GpioResult<u64> {
    if pin >= MAX_PINS {
        return Err(GpioError::InvalidArgument);
    }
    Ok(1 << pin)
}

/// Iterates over the pin indices set in the mask, lowest first.
pub fn mask_pins(mask: u64) -> impl Iterator<Item = usize> {
    (0..MAX_PINS).filter(move |&pin| mask & (1 << pin) != 0)
}

/// A GPIO backend able to drive several output pins with one masked write.
///
/// Masks are 64-bit words, bit `n` standing for pin `n`. Pins have to be claimed before use, so two
/// drivers can never talk over the same wires.
pub trait GpioDriver: Debug {
    /// Gets the amount of GPIO pins available.
    fn count(&self) -> GpioResult<usize>;

    /// Marks the pins in the mask as owned by the caller.
    ///
    /// # Errors
    /// - `GpioError::InvalidArgument` if any pin is out of range.
    /// - `GpioError::AlreadyInUse` if any pin is already claimed. No pin is claimed in that case.
    fn claim(&self, mask: u64) -> GpioResult<()>;

    /// Gives the pins in the mask back. Releasing pins that were not claimed does nothing.
    fn release(&self, mask: u64);

    /// Sets every pin in the mask to the output function.
    fn set_output(&self, mask: u64) -> GpioResult<()>;

    /// Sets every pin in the mask to the level of the matching bit of `value`.
    ///
    /// Bits of `value` outside the mask are ignored.
    fn put_masked(&self, mask: u64, value: u64) -> GpioResult<()>;

    /// Drives every pin in the mask low.
    fn clear_masked(&self, mask: u64) -> GpioResult<()> {
        self.put_masked(mask, 0)
    }

    /// Drives a single pin.
    fn put(&self, pin: usize, value: bool) -> GpioResult<()> {
        let bit = pin_bit(pin)?;
        self.put_masked(bit, if value { bit } else { 0 })
    }
}

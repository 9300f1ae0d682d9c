//! Extension traits for PWM pins.

use crate::pwm::PwmPin;
use crate::{GpioError, GpioResult};
use std::time::Duration;

fn to_ns(duration: Duration) -> GpioResult<u32> {
    u32::try_from(duration.as_nanos()).map_err(|_| GpioError::InvalidArgument)
}

/// Extension trait for PWM pins, providing methods to work with durations instead of raw
/// nanoseconds.
pub trait PwmExtension {
    /// Gets the period of the PWM pin as a [Duration].
    fn period(&self) -> GpioResult<Duration>;
    /// Sets the period of the PWM pin using a [Duration].
    ///
    /// # Errors
    /// - `GpioError::InvalidArgument` if the period does not fit in 32 bits of nanoseconds.
    fn set_period(&mut self, period: Duration) -> GpioResult<()>;

    /// Gets the duty cycle of the PWM pin as a [Duration].
    fn duty(&self) -> GpioResult<Duration>;
    /// Sets the duty cycle of the PWM pin using a [Duration].
    ///
    /// # Errors
    /// - `GpioError::InvalidArgument` if the duty is longer than the current period.
    fn set_duty(&mut self, duty: Duration) -> GpioResult<()>;
}

impl PwmExtension for dyn PwmPin + '_ {
    fn period(&self) -> GpioResult<Duration> {
        let period_ns = self.period_ns()?;
        Ok(Duration::from_nanos(period_ns.into()))
    }

    fn set_period(&mut self, period: Duration) -> GpioResult<()> {
        self.set_period_ns(to_ns(period)?)
    }

    fn duty(&self) -> GpioResult<Duration> {
        let duty_ns = self.duty_ns()?;
        Ok(Duration::from_nanos(duty_ns.into()))
    }

    fn set_duty(&mut self, duty: Duration) -> GpioResult<()> {
        let duty_ns = to_ns(duty)?;
        if duty_ns > self.period_ns()? {
            return Err(GpioError::InvalidArgument);
        }
        self.set_duty_ns(duty_ns)
    }
}

use crate::pwm::{PwmDriver, PwmPin, PwmPolarity};
use crate::{GpioError, GpioResult};
use log::debug;
use std::fmt::{Debug, Formatter};
use std::path::{Path, PathBuf};
use std::str::FromStr;

const SYSFS_PWM_PATH: &str = "/sys/class/pwm";

/// PWM controller exposed through `/sys/class/pwm/pwmchipN`.
///
/// On a Raspberry Pi this needs the `pwm` or `pwm-2chan` overlay, which also routes the channel to
/// its GPIO pin.
pub struct SysfsPwmDriver {
    base_path: PathBuf,
}

impl SysfsPwmDriver {
    pub fn get_chip(index: usize) -> GpioResult<Self> {
        let chip_path = Path::new(SYSFS_PWM_PATH).join(format!("pwmchip{}", index));
        Self::with_path(chip_path)
    }

    /// Uses the chip directory at the given path.
    pub fn with_path(chip_path: impl Into<PathBuf>) -> GpioResult<Self> {
        let base_path = chip_path.into();
        if !base_path.is_dir() {
            return Err(GpioError::InvalidArgument);
        }
        Ok(SysfsPwmDriver { base_path })
    }
}

impl Debug for SysfsPwmDriver {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "SysfsPwmDriver({:?})", self.base_path)
    }
}

impl PwmDriver for SysfsPwmDriver {
    fn count(&self) -> GpioResult<usize> {
        let content = std::fs::read_to_string(self.base_path.join("npwm"))?;
        content
            .trim()
            .parse()
            .map_err(|_| GpioError::Other("parsing PWM channel count failed".to_string()))
    }

    fn get_pin(&self, index: usize) -> GpioResult<Box<dyn PwmPin + '_>> {
        let path = self.base_path.join(format!("pwm{}", index));
        if !path.exists() {
            std::fs::write(self.base_path.join("export"), index.to_string())?;
            debug!("Exported PWM channel {} of {:?}", index, self.base_path);
        }
        if !path.exists() {
            return Err(GpioError::InvalidArgument);
        }
        Ok(Box::new(SysfsPwmPin { base_path: path }))
    }
}

pub struct SysfsPwmPin {
    base_path: PathBuf,
}

impl SysfsPwmPin {
    fn read_u32(&self, file: &str) -> GpioResult<u32> {
        let content = std::fs::read_to_string(self.base_path.join(file))?;
        content
            .trim()
            .parse()
            .map_err(|_| GpioError::Other(format!("parsing PWM {} failed", file)))
    }

    fn write(&self, file: &str, value: impl ToString) -> GpioResult<()> {
        std::fs::write(self.base_path.join(file), value.to_string())?;
        Ok(())
    }
}

impl Debug for SysfsPwmPin {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "SysfsPwmPin({:?})", self.base_path)
    }
}

impl PwmPin for SysfsPwmPin {
    fn period_ns(&self) -> GpioResult<u32> {
        self.read_u32("period")
    }

    fn set_period_ns(&mut self, period_ns: u32) -> GpioResult<()> {
        self.write("period", period_ns)
    }

    fn duty_ns(&self) -> GpioResult<u32> {
        self.read_u32("duty_cycle")
    }

    fn set_duty_ns(&mut self, duty_ns: u32) -> GpioResult<()> {
        self.write("duty_cycle", duty_ns)
    }

    fn polarity(&self) -> GpioResult<PwmPolarity> {
        let content = std::fs::read_to_string(self.base_path.join("polarity"))?;
        PwmPolarity::from_str(content.trim())
    }

    fn set_polarity(&mut self, polarity: PwmPolarity) -> GpioResult<()> {
        self.write("polarity", polarity)
    }

    fn is_enabled(&self) -> GpioResult<bool> {
        match self.read_u32("enable")? {
            1 => Ok(true),
            0 => Ok(false),
            _ => Err(GpioError::Other("parsing PWM enabled state failed".to_string())),
        }
    }

    fn enable(&mut self) -> GpioResult<()> {
        self.write("enable", 1)
    }

    fn disable(&mut self) -> GpioResult<()> {
        self.write("enable", 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pwm::PwmExtension;
    use std::time::Duration;

    fn fake_chip(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("charlcd-{}-{}", name, std::process::id()));
        _ = std::fs::remove_dir_all(&path);
        std::fs::create_dir_all(path.join("pwm0")).unwrap();
        std::fs::write(path.join("npwm"), "2\n").unwrap();
        path
    }

    #[test]
    fn reads_channel_count() {
        let path = fake_chip("count");
        let driver = SysfsPwmDriver::with_path(&path).unwrap();
        assert_eq!(driver.count(), Ok(2));
        std::fs::remove_dir_all(path).unwrap();
    }

    #[test]
    fn writes_period_and_duty_cycle_files() {
        let path = fake_chip("pin");
        let driver = SysfsPwmDriver::with_path(&path).unwrap();
        let mut pin = driver.get_pin(0).unwrap();

        pin.set_period(Duration::from_micros(400)).unwrap();
        pin.set_duty(Duration::from_micros(100)).unwrap();
        pin.enable().unwrap();

        assert_eq!(std::fs::read_to_string(path.join("pwm0/period")).unwrap(), "400000");
        assert_eq!(std::fs::read_to_string(path.join("pwm0/duty_cycle")).unwrap(), "100000");
        assert_eq!(pin.period(), Ok(Duration::from_micros(400)));
        assert_eq!(pin.duty(), Ok(Duration::from_micros(100)));
        assert_eq!(pin.is_enabled(), Ok(true));
        assert_eq!(pin.set_duty(Duration::from_micros(500)), Err(GpioError::InvalidArgument));

        drop(pin);
        std::fs::remove_dir_all(path).unwrap();
    }

    #[test]
    fn missing_chip_is_rejected() {
        let path = std::env::temp_dir().join("charlcd-no-such-chip");
        assert!(SysfsPwmDriver::with_path(path).is_err());
    }
}

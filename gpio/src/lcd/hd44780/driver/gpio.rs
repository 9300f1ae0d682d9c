use crate::GpioDriver;
use crate::delay::Delay;
use crate::lcd::hd44780::LcdResult;
use crate::lcd::hd44780::driver::{
    CLEAR_DISPLAY, CursorDirection, HD44780Driver, PinAssignment, PinMapper, RETURN_HOME,
    TimingProfile,
};
use log::{debug, trace};

/// HD44780 driver bit-banging the 4-bit interface over plain GPIO outputs.
///
/// Every nibble is presented on `D7..D4` and `RS` with a single masked write, then `E` is pulsed;
/// the controller latches the nibble on the falling edge of `E`. R/W is expected to be tied to
/// ground.
///
/// The driver claims its six pins for as long as it lives and is the only one allowed to touch
/// them. Transfers are blocking and must not be interleaved with anything else on the same pins:
/// a nibble sequence cut in half leaves the controller out of step.
#[derive(Debug)]
pub struct GpioHD44780Driver<'a> {
    gpio: &'a dyn GpioDriver,
    delay: &'a dyn Delay,
    pins: PinMapper,
    timing: TimingProfile,
}

impl<'a> GpioHD44780Driver<'a> {
    /// Creates the driver and claims the pins from the GPIO driver.
    ///
    /// Nothing is written to the pins until [HD44780Driver::init] is called.
    ///
    /// # Errors
    /// - [LcdError::PinOutOfRange](crate::lcd::hd44780::LcdError::PinOutOfRange) and
    ///   [LcdError::DuplicatePin](crate::lcd::hd44780::LcdError::DuplicatePin) for a bad
    ///   assignment.
    /// - [LcdError::Gpio](crate::lcd::hd44780::LcdError::Gpio) if a pin is already claimed.
    pub fn new(
        gpio: &'a dyn GpioDriver,
        delay: &'a dyn Delay,
        assignment: PinAssignment,
        timing: TimingProfile,
    ) -> LcdResult<Self> {
        let pins = PinMapper::new(assignment, gpio.count()?)?;
        gpio.claim(pins.config_mask())?;
        debug!("Claimed LCD pins {:?} on {:?}", assignment, gpio);

        Ok(GpioHD44780Driver {
            gpio,
            delay,
            pins,
            timing,
        })
    }

    pub fn pins(&self) -> &PinMapper {
        &self.pins
    }

    pub fn timing(&self) -> &TimingProfile {
        &self.timing
    }

    fn pulse_e(&self) -> LcdResult<()> {
        let pin_e = self.pins.enable_pin();
        // Set E pin to high
        self.gpio.put(pin_e, true)?;
        self.delay.delay(self.timing.enable_pulse);
        // Set E pin to low, the nibble is latched here
        self.gpio.put(pin_e, false)?;
        self.delay.delay(self.timing.settle);
        Ok(())
    }

    fn send_nibble(&self, nibble: u8, rs: bool) -> LcdResult<()> {
        trace!("Writing nibble: {:04b}, RS: {}", nibble, rs);
        let write = self.pins.payload(nibble, rs);
        self.gpio.put_masked(write.mask, write.value)?;
        self.pulse_e()
    }

    fn send(&mut self, data: u8, rs: bool) -> LcdResult<()> {
        trace!("Sending data: {:08b}, RS: {}", data, rs);
        self.send_nibble(data >> 4, rs)?;
        self.send_nibble(data & 0x0F, rs)
    }
}

impl Drop for GpioHD44780Driver<'_> {
    fn drop(&mut self) {
        self.gpio.release(self.pins.config_mask());
    }
}

impl HD44780Driver for GpioHD44780Driver<'_> {
    /// Runs the blind initialization sequence.
    ///
    /// All six pins become low outputs. Then `0011` is sent three times, which puts the controller
    /// in 8-bit mode whatever state it was in (even halfway through a 4-bit transfer), and `0010`
    /// switches it to 4-bit mode. From there on full bytes are sent: function set with the line
    /// mode, entry mode (increment, no shift), display on with the cursor hidden, and clear.
    fn init(&mut self, multiline: bool) -> LcdResult<()> {
        let config_mask = self.pins.config_mask();
        self.gpio.set_output(config_mask)?;
        self.gpio.clear_masked(config_mask)?;
        self.delay.delay(self.timing.power_on);

        debug!("Synchronizing LCD controller");
        for _ in 0..3 {
            self.send_nibble(0b0011, false)?;
            self.delay.delay(self.timing.probe_settle);
        }
        self.send_nibble(0b0010, false)?;

        self.function_set(false, multiline, false)?;
        self.set_entry_mode(CursorDirection::Right, false)?;
        self.set_display_control(true, false, false)?;
        self.clear_display()?;

        debug!("LCD controller initialized, multiline: {}", multiline);
        Ok(())
    }

    fn clear_display(&mut self) -> LcdResult<()> {
        self.send_command(CLEAR_DISPLAY)?;
        self.delay.delay(self.timing.clear_settle);
        Ok(())
    }

    fn return_home(&mut self) -> LcdResult<()> {
        self.send_command(RETURN_HOME)?;
        self.delay.delay(self.timing.clear_settle);
        Ok(())
    }

    fn send_command(&mut self, command: u8) -> LcdResult<()> {
        self.send(command, false)
    }

    fn send_data(&mut self, data: u8) -> LcdResult<()> {
        self.send(data, true)
    }
}

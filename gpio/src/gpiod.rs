//! GpiodDriver implementation for managing GPIO pins using the gpiod library.
//!
//! Works on any board exposing a GPIO character device. Every [GpioDriver::set_output] call
//! becomes one multi-line request, and a masked write over the pins of a request is a single
//! `set_values` call, so those pins change together.
use crate::{GpioDriver, GpioError, GpioResult, mask_pins};
use bitvec::vec::BitVec;
use log::{debug, trace};
use std::cell::RefCell;
use std::fmt::{Debug, Formatter};
use std::sync::atomic::AtomicU8;

/// Output lines requested together. Line `i` of the request is the `i`-th lowest pin of `pins`.
struct OutputRequest {
    pins: u64,
    lines: gpiod::Lines<gpiod::Output>,
}

/// Maps a pin-indexed masked write onto the line offsets of a request covering `pins`.
///
/// Only pins present in both `pins` and `mask` are masked in; every other line of the request is
/// left alone.
fn request_values(pins: u64, mask: u64, value: u64) -> gpiod::Masked<u64> {
    mask_pins(pins)
        .enumerate()
        .filter(|&(_, pin)| mask & (1 << pin) != 0)
        .fold(gpiod::Masked::default(), |values, (line, pin)| gpiod::Masked {
            bits: values.bits | ((value >> pin) & 1) << line,
            mask: values.mask | 1 << line,
        })
}

/// GpiodDriver is a GPIO driver that uses the gpiod library to manage GPIO pins.
pub struct GpiodDriver {
    chip: gpiod::Chip,
    used_pins: BitVec<AtomicU8>,
    outputs: RefCell<Vec<OutputRequest>>,
}

impl GpiodDriver {
    pub fn new(chip: gpiod::Chip) -> Self {
        let n = chip.num_lines() as usize;
        let bits = BitVec::repeat(false, n);
        Self {
            chip,
            used_pins: bits,
            outputs: RefCell::new(Vec::new()),
        }
    }

    /// Opens a GPIO character device, e.g. `/dev/gpiochip0`.
    pub fn open(device: impl gpiod_core::AsDevicePath) -> GpioResult<Self> {
        let chip = gpiod::Chip::new(device)?;
        debug!("Opened GPIO chip {} with {} lines", chip.name(), chip.num_lines());
        Ok(Self::new(chip))
    }

    fn check_mask(&self, mask: u64) -> GpioResult<()> {
        let n = self.count()?;
        if mask_pins(mask).any(|index| index >= n) {
            return Err(GpioError::InvalidArgument);
        }
        Ok(())
    }
}

impl Debug for GpiodDriver {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "GpiodDriver({})", self.chip.name())
    }
}

impl GpioDriver for GpiodDriver {
    fn count(&self) -> GpioResult<usize> {
        Ok(self.chip.num_lines() as usize)
    }

    fn claim(&self, mask: u64) -> GpioResult<()> {
        self.check_mask(mask)?;

        if mask_pins(mask).any(|index| self.used_pins[index]) {
            return Err(GpioError::AlreadyInUse);
        }

        for index in mask_pins(mask) {
            self.used_pins.set_aliased(index, true);
        }

        Ok(())
    }

    /// Releases the pins. A line request is handed back to the kernel as soon as one of its pins
    /// is released; its other pins need [GpioDriver::set_output] again before the next write.
    fn release(&self, mask: u64) {
        // Dropping a request hands its lines back to the kernel
        self.outputs
            .borrow_mut()
            .retain(|request| request.pins & mask == 0);

        let len = self.used_pins.len();
        for index in mask_pins(mask).filter(|&index| index < len) {
            self.used_pins.set_aliased(index, false);
        }
    }

    fn set_output(&self, mask: u64) -> GpioResult<()> {
        self.check_mask(mask)?;

        let mut outputs = self.outputs.borrow_mut();
        let configured = outputs.iter().fold(0, |pins, request| pins | request.pins);
        let pins = mask & !configured;
        if pins == 0 {
            return Ok(());
        }

        let lines = self.chip.request_lines(
            gpiod::Options::output(mask_pins(pins).map(|index| index as u32).collect::<Vec<_>>())
                .consumer(env!("CARGO_PKG_NAME")),
        )?;
        debug!("Requested lines {:#x} of {} as output", pins, self.chip.name());
        outputs.push(OutputRequest { pins, lines });

        Ok(())
    }

    fn put_masked(&self, mask: u64, value: u64) -> GpioResult<()> {
        self.check_mask(mask)?;
        trace!("Masked write: mask={:#x} value={:#x}", mask, value & mask);

        let outputs = self.outputs.borrow();
        let configured = outputs.iter().fold(0, |pins, request| pins | request.pins);
        if mask & !configured != 0 {
            return Err(GpioError::NotSupported);
        }

        for request in outputs.iter().filter(|request| request.pins & mask != 0) {
            request
                .lines
                .set_values(request_values(request.pins, mask, value))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Same pins as an LCD bus: D4..D7 on 2..5, RS on 14, E on 15
    const BUS: u64 = 0b11_1100 | 1 << 14 | 1 << 15;

    #[test]
    fn whole_payload_lands_in_one_masked_write() {
        let payload = 0b11_1100 | 1 << 14;
        let values = request_values(BUS, payload, 1 << 5 | 1 << 2 | 1 << 14);

        // Lines are numbered in pin order: 2, 3, 4, 5, 14, 15
        assert_eq!(values.mask, 0b01_1111);
        assert_eq!(values.bits, 0b01_1001);
    }

    #[test]
    fn single_pin_write_leaves_other_lines_alone() {
        let values = request_values(BUS, 1 << 15, u64::MAX);
        assert_eq!(values.mask, 1 << 5);
        assert_eq!(values.bits, 1 << 5);

        let values = request_values(BUS, 1 << 15, 0);
        assert_eq!(values.mask, 1 << 5);
        assert_eq!(values.bits, 0);
    }

    #[test]
    fn pins_outside_the_request_are_ignored() {
        let values = request_values(BUS, 1 << 6 | 1 << 2, 1 << 6 | 1 << 2);
        assert_eq!(values.mask, 1);
        assert_eq!(values.bits, 1);

        assert_eq!(request_values(BUS, 1 << 40, 1 << 40), gpiod::Masked::default());
    }

    #[test]
    fn opening_a_missing_chip_fails() {
        assert!(GpiodDriver::open("/dev/charlcd-no-such-gpiochip").is_err());
        assert!(GpiodDriver::open(String::from("/dev/charlcd-no-such-gpiochip")).is_err());
    }
}

//! Memory-mapped GPIO driver for BCM283x based Raspberry Pi boards.
use crate::{GpioDriver, GpioError, GpioResult, mask_pins};
use bitvec::vec::BitVec;
use log::{debug, trace};
use memmap2::{MmapOptions, MmapRaw};
use std::fmt::{Debug, Formatter};
use std::fs::OpenOptions;
use std::sync::atomic::AtomicU8;

/// GPIO driver writing straight into the GPIO register block.
///
/// Masked writes go through the `GPSETn`/`GPCLRn` registers, so every pin of a bank changes within
/// two consecutive register writes and no pin outside the mask is touched.
pub struct RawGpioDriver {
    mmap: MmapRaw,
    used_pins: BitVec<AtomicU8>,
}

impl RawGpioDriver {
    // 0x7e200000
    // #[cfg(target_pointer_width = "64")]
    // const GPIO_BASE: u32 = 0xFE200000;
    // #[cfg(target_pointer_width = "32")]
    const GPIO_BASE: u32 = 0x3F200000;

    const PIN_COUNT: usize = 58;

    /// Function select value for a plain output.
    pub const FUNCTION_OUTPUT: u8 = 0b001;
    /// Function select value for a plain input.
    pub const FUNCTION_INPUT: u8 = 0b000;

    fn create(path: &str) -> GpioResult<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)?;

        let mmap = MmapOptions::new()
            .offset(Self::GPIO_BASE as u64)
            .len(4096)
            .map_raw(&file)?;

        debug!("Mapped GPIO registers from {}", path);

        Ok(RawGpioDriver {
            mmap,
            used_pins: BitVec::repeat(false, Self::PIN_COUNT),
        })
    }

    pub fn new_gpiomem() -> GpioResult<Self> {
        Self::create("/dev/gpiomem")
    }

    pub fn new_mem() -> GpioResult<Self> {
        Self::create("/dev/mem")
    }

    fn check_mask(mask: u64) -> GpioResult<()> {
        if mask >> Self::PIN_COUNT != 0 {
            return Err(GpioError::InvalidArgument);
        }
        Ok(())
    }

    /// Sets the function select bits of a pin, e.g. to route it to an alternate function like PWM.
    pub fn raw_set_pin_function(&self, pin_index: usize, function: u8) -> GpioResult<()> {
        if function > 0b111 {
            return Err(GpioError::InvalidArgument);
        }

        if pin_index >= Self::PIN_COUNT {
            return Err(GpioError::InvalidArgument);
        }

        let mmap = self.mmap.as_mut_ptr() as *mut u32;
        // GPFSELn register
        let register_ptr = unsafe { mmap.add(pin_index / 10) };
        let shift = (pin_index % 10) * 3;

        let mut register_value = unsafe { register_ptr.read_volatile() };
        register_value &= !(0b111 << shift); // Clear the bits for this pin
        register_value |= (function as u32) << shift;
        unsafe { register_ptr.write_volatile(register_value) };

        Ok(())
    }

    /// Writes a whole bank at once: `set` bits go high through GPSETn, `clear` bits go low through
    /// GPCLRn.
    fn raw_write_bank(&self, bank: usize, set: u32, clear: u32) {
        let mmap = self.mmap.as_mut_ptr() as *mut u32;
        if set != 0 {
            // GPSETn register
            let register_ptr = unsafe { mmap.add(0x1c / 4 + bank) };
            unsafe { register_ptr.write_volatile(set) };
        }
        if clear != 0 {
            // GPCLRn register
            let register_ptr = unsafe { mmap.add(0x28 / 4 + bank) };
            unsafe { register_ptr.write_volatile(clear) };
        }
    }
}

impl Debug for RawGpioDriver {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "RawGpioDriver({:?})", self.mmap.as_ptr().addr())
    }
}

impl GpioDriver for RawGpioDriver {
    fn count(&self) -> GpioResult<usize> {
        Ok(Self::PIN_COUNT)
    }

    fn claim(&self, mask: u64) -> GpioResult<()> {
        Self::check_mask(mask)?;

        if mask_pins(mask).any(|index| self.used_pins[index]) {
            return Err(GpioError::AlreadyInUse);
        }

        for index in mask_pins(mask) {
            self.used_pins.set_aliased(index, true);
        }

        Ok(())
    }

    fn release(&self, mask: u64) {
        for index in mask_pins(mask).filter(|&index| index < Self::PIN_COUNT) {
            if self.used_pins[index] {
                _ = self.raw_set_pin_function(index, Self::FUNCTION_INPUT);
                self.used_pins.set_aliased(index, false);
            }
        }
    }

    fn set_output(&self, mask: u64) -> GpioResult<()> {
        Self::check_mask(mask)?;
        for index in mask_pins(mask) {
            self.raw_set_pin_function(index, Self::FUNCTION_OUTPUT)?;
        }
        Ok(())
    }

    fn put_masked(&self, mask: u64, value: u64) -> GpioResult<()> {
        Self::check_mask(mask)?;
        trace!("Masked write: mask={:#x} value={:#x}", mask, value & mask);

        for bank in 0..2 {
            let shift = bank * 32;
            let bank_mask = (mask >> shift) as u32;
            if bank_mask == 0 {
                continue;
            }
            let set = ((mask & value) >> shift) as u32;
            self.raw_write_bank(bank, set, bank_mask & !set);
        }

        Ok(())
    }
}

//! Recording GPIO backend for unit tests.
use crate::delay::Delay;
use crate::{GpioDriver, GpioError, GpioResult, mask_pins};
use std::cell::{Cell, RefCell};
use std::time::Duration;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Event {
    Output(u64),
    Put { mask: u64, value: u64 },
    Delay(Duration),
}

/// A fake pin bank that keeps every call in order and tracks the resulting pin levels.
///
/// It also implements [Delay], so writes and waits land in the same log.
#[derive(Debug)]
pub struct MockGpio {
    count: usize,
    claimed: Cell<u64>,
    levels: Cell<u64>,
    events: RefCell<Vec<Event>>,
}

impl MockGpio {
    pub fn new(count: usize) -> Self {
        Self {
            count,
            claimed: Cell::new(0),
            levels: Cell::new(0),
            events: RefCell::new(Vec::new()),
        }
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.borrow().clone()
    }

    pub fn clear_events(&self) {
        self.events.borrow_mut().clear();
    }

    pub fn levels(&self) -> u64 {
        self.levels.get()
    }

    pub fn claimed(&self) -> u64 {
        self.claimed.get()
    }

    /// Replays the log and returns the nibble present on the data pins at every falling edge of the
    /// enable pin, together with the register-select level.
    ///
    /// `data` lists the pins of D7, D6, D5, D4 in that order.
    pub fn latched_nibbles(&self, data: [usize; 4], rs: usize, enable: usize) -> Vec<(bool, u8)> {
        let mut levels = 0u64;
        let mut latched = Vec::new();
        for event in self.events.borrow().iter() {
            if let Event::Put { mask, value } = *event {
                let before = levels;
                levels = (levels & !mask) | (value & mask);
                let falling = before & (1 << enable) != 0 && levels & (1 << enable) == 0;
                if falling {
                    let nibble = data
                        .iter()
                        .fold(0u8, |acc, &pin| (acc << 1) | ((levels >> pin) & 1) as u8);
                    latched.push((levels & (1 << rs) != 0, nibble));
                }
            }
        }
        latched
    }
}

impl GpioDriver for MockGpio {
    fn count(&self) -> GpioResult<usize> {
        Ok(self.count)
    }

    fn claim(&self, mask: u64) -> GpioResult<()> {
        if mask_pins(mask).any(|pin| pin >= self.count) {
            return Err(GpioError::InvalidArgument);
        }
        if self.claimed.get() & mask != 0 {
            return Err(GpioError::AlreadyInUse);
        }
        self.claimed.set(self.claimed.get() | mask);
        Ok(())
    }

    fn release(&self, mask: u64) {
        self.claimed.set(self.claimed.get() & !mask);
    }

    fn set_output(&self, mask: u64) -> GpioResult<()> {
        self.events.borrow_mut().push(Event::Output(mask));
        Ok(())
    }

    fn put_masked(&self, mask: u64, value: u64) -> GpioResult<()> {
        self.levels.set((self.levels.get() & !mask) | (value & mask));
        self.events.borrow_mut().push(Event::Put { mask, value: value & mask });
        Ok(())
    }
}

impl Delay for MockGpio {
    fn delay(&self, duration: Duration) {
        self.events.borrow_mut().push(Event::Delay(duration));
    }
}

//! Blocking delays.

use std::fmt::Debug;
use std::thread::sleep;
use std::time::Duration;

/// A blocking delay. Every call runs to completion; there is no way to cancel it.
pub trait Delay: Debug {
    fn delay(&self, duration: Duration);
}

/// [Delay] backed by [std::thread::sleep].
#[derive(Copy, Clone, Debug, Default)]
pub struct StdDelay;

impl Delay for StdDelay {
    fn delay(&self, duration: Duration) {
        if !duration.is_zero() {
            sleep(duration);
        }
    }
}

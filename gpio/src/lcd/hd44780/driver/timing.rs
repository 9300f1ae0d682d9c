use std::time::Duration;

/// Waits used while talking to the controller.
///
/// Without a busy flag the driver can only wait long enough. [TimingProfile::standard] follows the
/// HD44780 datasheet with some margin, [TimingProfile::conservative] waits milliseconds everywhere
/// for slow clones and long cables.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct TimingProfile {
    /// How long E stays high.
    pub enable_pulse: Duration,
    /// How long to wait after the falling edge of E before the next transfer.
    pub settle: Duration,
    /// Extra wait after clear display and return home, which take far longer than other commands.
    pub clear_settle: Duration,
    /// Wait before the first transfer, for the controller's own power-on reset.
    pub power_on: Duration,
    /// Extra wait after each of the 8-bit probes of the init sequence.
    pub probe_settle: Duration,
}

impl TimingProfile {
    pub const fn standard() -> Self {
        TimingProfile {
            enable_pulse: Duration::from_micros(1),
            settle: Duration::from_micros(50),
            clear_settle: Duration::from_millis(2),
            power_on: Duration::from_millis(50),
            probe_settle: Duration::from_millis(5),
        }
    }

    pub const fn conservative() -> Self {
        TimingProfile {
            enable_pulse: Duration::from_millis(5),
            settle: Duration::from_millis(5),
            clear_settle: Duration::from_millis(10),
            power_on: Duration::ZERO,
            probe_settle: Duration::ZERO,
        }
    }
}

impl Default for TimingProfile {
    fn default() -> Self {
        Self::standard()
    }
}

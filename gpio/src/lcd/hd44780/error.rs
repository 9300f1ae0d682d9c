use crate::GpioError;
use thiserror::Error;

/// Errors of the HD44780 driver.
///
/// Every error is local and final: the wiring is write-only, so nothing is retried. Range checks
/// run before any pin is touched, so a rejected call leaves the display untouched.
#[derive(Debug, Error, Eq, PartialEq, Clone)]
pub enum LcdError {
    #[error("pin {0} is assigned to more than one signal")]
    DuplicatePin(usize),
    #[error("pin {pin} is out of range, the GPIO driver has {count} pins")]
    PinOutOfRange { pin: usize, count: usize },
    #[error("unsupported line count {0}, expected 1, 2 or 4")]
    UnsupportedLines(u8),
    #[error("invalid column count {columns}, expected 1 to {max}")]
    InvalidColumns { columns: u8, max: u8 },
    #[error("position ({column}, {row}) is outside the {columns}x{lines} display")]
    PositionOutOfRange {
        column: u8,
        row: u8,
        columns: u8,
        lines: u8,
    },
    #[error("glyph slot {0} is out of range, expected 0 to 7")]
    GlyphSlotOutOfRange(u8),
    #[error("backlight level {level} is out of range, expected 0 to {max}")]
    BacklightLevelOutOfRange { level: u8, max: u8 },
    #[error("address {address:#04x} does not fit in {max:#04x}")]
    AddressOutOfRange { address: u8, max: u8 },
    #[error("the display has not been initialized")]
    NotInitialized,
    #[error("protocol assumption violated: {0}")]
    ProtocolAssumptionViolation(String),
    #[error("GPIO error: {0}")]
    Gpio(#[from] GpioError),
}

/// Coarse classification of an [LcdError].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum LcdErrorKind {
    /// Bad pin assignment or geometry, caught at construction.
    Configuration,
    /// Argument outside of what the configured display accepts, caught at the call.
    Range,
    /// The call is not valid in the current state, e.g. before initialization.
    Usage,
    /// The controller did not behave as the protocol assumes.
    ProtocolAssumption,
    /// The GPIO or PWM backend failed.
    Hardware,
}

impl LcdError {
    pub fn kind(&self) -> LcdErrorKind {
        match self {
            LcdError::DuplicatePin(_)
            | LcdError::PinOutOfRange { .. }
            | LcdError::UnsupportedLines(_)
            | LcdError::InvalidColumns { .. }
            | LcdError::Gpio(GpioError::AlreadyInUse | GpioError::InvalidArgument) => {
                LcdErrorKind::Configuration
            }
            LcdError::PositionOutOfRange { .. }
            | LcdError::GlyphSlotOutOfRange(_)
            | LcdError::BacklightLevelOutOfRange { .. }
            | LcdError::AddressOutOfRange { .. } => LcdErrorKind::Range,
            LcdError::NotInitialized => LcdErrorKind::Usage,
            LcdError::ProtocolAssumptionViolation(_) => LcdErrorKind::ProtocolAssumption,
            LcdError::Gpio(_) => LcdErrorKind::Hardware,
        }
    }
}

pub type LcdResult<T> = Result<T, LcdError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_errors() {
        assert_eq!(LcdError::DuplicatePin(3).kind(), LcdErrorKind::Configuration);
        assert_eq!(LcdError::UnsupportedLines(3).kind(), LcdErrorKind::Configuration);
        assert_eq!(LcdError::Gpio(GpioError::AlreadyInUse).kind(), LcdErrorKind::Configuration);
        assert_eq!(LcdError::GlyphSlotOutOfRange(8).kind(), LcdErrorKind::Range);
        assert_eq!(
            LcdError::BacklightLevelOutOfRange { level: 101, max: 100 }.kind(),
            LcdErrorKind::Range
        );
        assert_eq!(LcdError::NotInitialized.kind(), LcdErrorKind::Usage);
        assert_eq!(
            LcdError::ProtocolAssumptionViolation("busy flag stuck".to_string()).kind(),
            LcdErrorKind::ProtocolAssumption
        );
        assert_eq!(
            LcdError::Gpio(GpioError::Io(std::io::ErrorKind::PermissionDenied)).kind(),
            LcdErrorKind::Hardware
        );
    }

    #[test]
    fn messages_name_the_offending_value() {
        let err = LcdError::PositionOutOfRange { column: 16, row: 0, columns: 16, lines: 2 };
        assert_eq!(err.to_string(), "position (16, 0) is outside the 16x2 display");
        assert_eq!(
            LcdError::AddressOutOfRange { address: 0x40, max: 0x3f }.to_string(),
            "address 0x40 does not fit in 0x3f"
        );
    }
}

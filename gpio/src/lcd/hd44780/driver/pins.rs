use crate::MAX_PINS;
use crate::lcd::hd44780::{LcdError, LcdResult};

/// GPIO pins the display is wired to.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct PinAssignment {
    pub data4: usize,
    pub data5: usize,
    pub data6: usize,
    pub data7: usize,
    pub register_select: usize,
    pub enable: usize,
}

impl PinAssignment {
    /// Creates the assignment from the data bus pins (`D4`, `D5`, `D6`, `D7`), RS and E.
    pub fn new(data: [usize; 4], register_select: usize, enable: usize) -> Self {
        let [data4, data5, data6, data7] = data;
        PinAssignment {
            data4,
            data5,
            data6,
            data7,
            register_select,
            enable,
        }
    }

    /// Pins in wire order: `D7`, `D6`, `D5`, `D4`, `RS`, `E`.
    pub fn wire_order(&self) -> [usize; 6] {
        [
            self.data7,
            self.data6,
            self.data5,
            self.data4,
            self.register_select,
            self.enable,
        ]
    }
}

/// A masked write: which pins take part, and the level each of them gets.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct PinWrite {
    pub mask: u64,
    pub value: u64,
}

/// Turns logical signal levels into masked GPIO writes.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct PinMapper {
    pins: [usize; 6],
}

impl PinMapper {
    /// The four data bits and RS, written on every transfer.
    pub const PAYLOAD_ROLES: usize = 5;
    /// Every pin of the interface, configured once at init.
    pub const CONFIG_ROLES: usize = 6;

    /// # Errors
    /// - [LcdError::PinOutOfRange] if a pin is not below `pin_count` (or does not fit a 64-bit
    ///   mask).
    /// - [LcdError::DuplicatePin] if two signals share a pin.
    pub fn new(assignment: PinAssignment, pin_count: usize) -> LcdResult<Self> {
        let pins = assignment.wire_order();
        let count = pin_count.min(MAX_PINS);

        for (i, &pin) in pins.iter().enumerate() {
            if pin >= count {
                return Err(LcdError::PinOutOfRange { pin, count });
            }
            if pins[..i].contains(&pin) {
                return Err(LcdError::DuplicatePin(pin));
            }
        }

        Ok(PinMapper { pins })
    }

    /// Maps levels, given in wire order, onto their pins.
    ///
    /// Only the first `values.len()` roles take part; at most six values are used.
    pub fn encode(&self, values: &[bool]) -> PinWrite {
        self.pins
            .iter()
            .zip(values)
            .fold(PinWrite::default(), |write, (&pin, &level)| PinWrite {
                mask: write.mask | 1 << pin,
                value: write.value | (level as u64) << pin,
            })
    }

    /// Encodes one nibble, most significant bit on `D7`, together with the register-select level.
    pub fn payload(&self, nibble: u8, register_select: bool) -> PinWrite {
        self.encode(&[
            nibble & 0b1000 != 0,
            nibble & 0b0100 != 0,
            nibble & 0b0010 != 0,
            nibble & 0b0001 != 0,
            register_select,
        ])
    }

    pub fn payload_mask(&self) -> u64 {
        self.encode(&[true; Self::PAYLOAD_ROLES]).mask
    }

    pub fn config_mask(&self) -> u64 {
        self.encode(&[true; Self::CONFIG_ROLES]).mask
    }

    pub fn enable_pin(&self) -> usize {
        self.pins[5]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapper() -> PinMapper {
        // D4..D7 on 2..5, RS on 14, E on 15
        PinMapper::new(PinAssignment::new([2, 3, 4, 5], 14, 15), 30).unwrap()
    }

    #[test]
    fn encoded_mask_covers_exactly_the_given_roles() {
        let mapper = mapper();
        let pins = [5, 4, 3, 2, 14, 15];
        for n in 0..=6 {
            for pattern in 0u32..(1 << n) {
                let values: Vec<bool> = (0..n).map(|i| pattern & (1 << i) != 0).collect();
                let write = mapper.encode(&values);

                assert_eq!(write.mask.count_ones() as usize, n);
                for (i, &pin) in pins.iter().enumerate().take(n) {
                    assert_ne!(write.mask & (1 << pin), 0);
                    assert_eq!(write.value & (1 << pin) != 0, values[i]);
                }
                assert_eq!(write.value & !write.mask, 0);
            }
        }
    }

    #[test]
    fn payload_puts_msb_on_d7() {
        let write = mapper().payload(0b1000, false);
        assert_eq!(write.value, 1 << 5);
        let write = mapper().payload(0b0001, true);
        assert_eq!(write.value, 1 << 2 | 1 << 14);
        assert_eq!(write.mask, 0b11_1100 | 1 << 14);
    }

    #[test]
    fn masks() {
        let mapper = mapper();
        assert_eq!(mapper.payload_mask(), 0b11_1100 | 1 << 14);
        assert_eq!(mapper.config_mask(), 0b11_1100 | 1 << 14 | 1 << 15);
        assert_eq!(mapper.enable_pin(), 15);
    }

    #[test]
    fn rejects_shared_pins() {
        let result = PinMapper::new(PinAssignment::new([2, 3, 4, 5], 3, 15), 30);
        assert_eq!(result, Err(LcdError::DuplicatePin(3)));
    }

    #[test]
    fn rejects_pins_the_driver_does_not_have() {
        let result = PinMapper::new(PinAssignment::new([2, 3, 4, 5], 14, 30), 30);
        assert_eq!(result, Err(LcdError::PinOutOfRange { pin: 30, count: 30 }));

        let result = PinMapper::new(PinAssignment::new([2, 3, 4, 64], 14, 15), 100);
        assert_eq!(result, Err(LcdError::PinOutOfRange { pin: 64, count: 64 }));
    }
}

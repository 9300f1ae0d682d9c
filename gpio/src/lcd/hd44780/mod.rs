//! HD44780 character LCD over the 4-bit parallel interface.
//!
//! The module is split in two layers:
//! - [driver] speaks the controller's instruction set. [driver::GpioHD44780Driver] bit-bangs it
//!   over six GPIO outputs (`D4`..`D7`, `RS`, `E`), with R/W tied to ground.
//! - [CharacterLcd] sits on top of any [driver::HD44780Driver] and knows the size of the glass:
//!   cursor positioning, printing, wrapping, custom glyphs and the optional [Backlight].
//!
//! Nothing is ever read back from the controller, so every wait comes from a
//! [driver::TimingProfile].
pub mod driver;

mod backlight;
mod display;
mod error;
mod geometry;

pub use backlight::Backlight;
pub use display::*;
pub use error::*;
pub use geometry::*;

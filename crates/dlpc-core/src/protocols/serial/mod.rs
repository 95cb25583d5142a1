//! RS485 framing for the auxiliary current driver.
//!
//! Fixed 10-byte frames: `55 AA | address | function | byte0 byte1 reserved
//! | checksum | DA C3`. The checksum is the 8-bit sum of the function code and
//! the three data bytes. Independent of the USB framing; nothing is shared.

pub mod error;
pub mod layout;
pub mod parser;

pub use error::SerialFrameError;
pub use parser::{SerialFrame, checksum, parse};

//! USB command/reply framing for the display controller.
//!
//! Commands are `flag | sequence | length (LE) | command (LE) | payload`,
//! where the length counts the payload plus the two command bytes. Replies
//! are `flag | sequence | length (LE) | data`, with bit 5 of the flag byte
//! reporting a rejected command. A frame never exceeds 512 bytes.
//!
//! Offsets live in `layout`, bounds-checked access in `reader`, and the
//! build/serialize/parse functions in `parser`.
//!
//! Version française (résumé):
//! Le module construit et décode les trames USB (drapeau, séquence, longueur
//! LE, commande LE). Le bit 5 du drapeau signale une commande refusée ; une
//! trame ne dépasse jamais 512 octets.

pub mod error;
pub mod layout;
pub mod parser;
pub mod reader;

pub use error::FrameError;
pub use parser::{
    CommandFrame, Direction, ReplyFrame, build, encode_reply, flag_byte, parse, parse_command,
    serialize,
};

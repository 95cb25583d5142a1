//! Wire framing for both command channels.
//!
//! Each protocol follows a layered structure:
//! - `layout`: byte offsets, constants and limits (source of truth)
//! - `reader`: bounds-checked byte access (USB only; serial frames are fixed)
//! - `parser`: build, serialize and validate frames
//! - `error`: explicit, actionable errors
//!
//! Parsers are pure and contain no I/O; the `dispatch` layer moves bytes.
//!
//! Version française (résumé):
//! Trames USB et RS485, chacune en couches layout/reader/parser/error. Les
//! parseurs sont purs ; les E/S passent par `dispatch` et `transport`.

pub mod serial;
pub mod usb;

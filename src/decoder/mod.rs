//! Decoder for the simulator's nested coverage container
//!
//! The container stores a satellite x time-step x flag jagged array as
//! nested `u64` length prefixes followed by fixed-width value blocks.
//! Decoding is all-or-nothing: the whole structure is scanned and checked
//! for rectangularity before a single dense tensor is allocated and filled.
//!
//! # Guarantees
//!
//! - A truncated input never yields a tensor
//! - Ragged input is rejected with the offending index path
//! - Trailing bytes after the declared structure are ignored

mod cursor;
mod decoder;
mod element;
mod encoder;
mod errors;

pub use cursor::ByteCursor;
pub use decoder::{decode, decode_file, decode_reader, DecodeStats, FormatDecoder};
pub use element::ElementWidth;
pub use encoder::{encode, encode_jagged};
pub use errors::{FormatError, FormatResult, IndexPath, ReadError, ReadResult};

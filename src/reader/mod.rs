//! Reader Module
//!
//! Byte-oriented input for the text-oriented parser:
//! - Decoder: incremental UTF-8 decoding across chunk boundaries
//! - Buffered: drive a parser from any `std::io::Read`

pub mod buffered;
pub mod decoder;

pub use buffered::{feed_reader, feed_reader_with_capacity, parse_reader, ReadError};
pub use decoder::Utf8Decoder;

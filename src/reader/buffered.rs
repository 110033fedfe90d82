//! Buffered Reader Adapter
//!
//! Drives a [`Parser`] from any source implementing `Read`, one buffer at
//! a time, so a document never has to be held in memory whole.

use std::io::{self, Read};

use thiserror::Error;

use super::decoder::Utf8Decoder;
use crate::sax::{Error as ParserError, Parser, SaxHandler};

/// Buffer size for reading chunks
const DEFAULT_BUFFER_SIZE: usize = 8192;

/// Failure while feeding a parser from a reader
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("read failed: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Parser(#[from] ParserError),
}

/// Read `reader` to the end, writing every chunk into `parser`
///
/// Stops at the first parser refusal (a pending strict-mode error or a
/// closed parser). Does not call `end()`, so several readers can feed one
/// document.
pub fn feed_reader<R: Read, H: SaxHandler>(
    reader: R,
    parser: &mut Parser<H>,
) -> Result<(), ReadError> {
    feed_reader_with_capacity(reader, parser, DEFAULT_BUFFER_SIZE)
}

/// [`feed_reader`] with an explicit read buffer size
pub fn feed_reader_with_capacity<R: Read, H: SaxHandler>(
    mut reader: R,
    parser: &mut Parser<H>,
    capacity: usize,
) -> Result<(), ReadError> {
    let mut buffer = vec![0u8; capacity.max(1)];
    let mut decoder = Utf8Decoder::new();
    let mut text = String::with_capacity(capacity);

    loop {
        // a refused parser leaves the rest of the input unread
        parser.check_open()?;
        let read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err.into()),
        };
        text.clear();
        decoder.decode(&buffer[..read], &mut text);
        if !text.is_empty() {
            parser.write(&text)?;
        }
    }

    parser.check_open()?;
    text.clear();
    decoder.finish(&mut text);
    if !text.is_empty() {
        parser.write(&text)?;
    }
    Ok(())
}

/// Parse a whole document from `reader`, finishing with `end()`
pub fn parse_reader<R: Read, H: SaxHandler>(
    reader: R,
    parser: &mut Parser<H>,
) -> Result<(), ReadError> {
    feed_reader(reader, parser)?;
    parser.close()?;
    Ok(())
}

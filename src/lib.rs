//! RustySax - Incremental push-based XML/HTML tokenizer
//!
//! Input arrives in arbitrary chunks through [`Parser::write`]; events go to
//! a [`SaxHandler`] as soon as they are recognised. Strict mode reports
//! well-formedness errors; loose mode recovers HTML-style markup.
//!
//! Drivers:
//! A: Handler callbacks (`Parser` + your `SaxHandler`)
//! B: Collected events (`parse_events`, `EventCollector`)
//! C: Byte streams (`feed_reader`, `StreamingTokenizer`)
//! D: Parallel documents (`tokenize_parallel`)
//! E: Arena DOM built from events (`XmlDocument`)
//!
//! ```
//! use rustysax::{parse_events, Event, ParserOptions};
//!
//! let events = parse_events("<a href=\"x\">hi</a>", ParserOptions::strict());
//! assert!(events.contains(&Event::Text("hi".into())));
//! ```

pub mod core;
pub mod dom;
pub mod reader;
pub mod sax;
pub mod strategy;

#[cfg(feature = "nif")]
mod nif;
#[cfg(feature = "nif")]
mod resource;
#[cfg(feature = "nif")]
mod term;

pub use dom::XmlDocument;
pub use reader::{feed_reader, parse_reader, ReadError};
pub use sax::{
    parse_events, Attribute, Error, ErrorKind, Event, EventCollector, ParseError, Parser,
    ParserOptions, SaxHandler, Tag,
};
pub use strategy::{tokenize_parallel, StreamingTokenizer};

// ============================================================================
// Allocator Configuration
// ============================================================================

#[cfg(all(feature = "nif", feature = "mimalloc"))]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

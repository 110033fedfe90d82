//! SAX (Simple API for XML) Module
//!
//! Push-based tokenizing: callers feed text with [`Parser::write`] and a
//! [`SaxHandler`] receives events as soon as each construct is complete.
//!
//! ## Architecture
//!
//! ```text
//! write(chunk) ---> State machine ---> SaxHandler callbacks
//!                        |                    |
//!                        v                    v
//!                  Buffer guard        EventCollector -> Vec<Event>
//! ```
//!
//! ## Modes
//!
//! - Strict: XML well-formedness; violations are reported and recovered from
//! - Loose: HTML-style input, case-folded names, raw `<script>` bodies,
//!   implicit close of unclosed elements at `end()`
//!
//! With `xmlns` enabled, tags and attributes carry their prefix, local
//! name and resolved URI, and namespace bindings are announced as they
//! enter and leave scope.

pub mod collector;
pub mod error;
pub mod events;
mod guard;
pub mod options;
pub mod parser;
pub mod state;

#[cfg(test)]
mod tests;

pub use collector::{parse_events, EventCollector};
pub use error::{Error, ErrorKind, ParseError};
pub use events::{
    Attribute, Event, NamespaceBinding, ProcessingInstruction, QualifiedName, SaxHandler, Tag,
};
pub use options::{ParserOptions, DEFAULT_MAX_BUFFER_LENGTH};
pub use parser::Parser;
pub use state::State;

//! Parse errors and API errors

use thiserror::Error;

/// Category of a parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Grammar violation: bad name character, malformed comment, misplaced doctype
    Syntax,
    /// Unmatched or unclosed tags, content outside the root element
    Unbalanced,
    /// An accumulation buffer without partial-flush semantics grew past the limit
    BufferOverrun,
    /// Malformed numeric reference or unknown named entity
    InvalidEntity,
    /// Unbound prefix or an illegal rebinding of `xml`/`xmlns`
    Namespace,
}

/// A recoverable parse error with positional context
///
/// Line is 1-based. Column and `position` count characters up to and
/// including the one that triggered the error, within the line and the
/// whole input respectively. All three are 0 when position tracking is off.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} (line {line}, column {column}, offset {position})")]
pub struct ParseError {
    pub kind: ErrorKind,
    pub message: String,
    pub line: usize,
    pub column: usize,
    pub position: usize,
}

impl ParseError {
    pub fn new(
        kind: ErrorKind,
        message: impl Into<String>,
        line: usize,
        column: usize,
        position: usize,
    ) -> Self {
        ParseError {
            kind,
            message: message.into(),
            line,
            column,
            position,
        }
    }
}

/// Errors returned by the parser entry points
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// `write` or `close` after `end()`; call `reset()` to start a new document
    #[error("cannot write after close; reset the parser first")]
    Closed,
    /// A strict-mode error is pending and has not been cleared with `resume()`
    #[error("unresolved parse error: {0}")]
    Unresumed(ParseError),
}

//! Parallel Tokenizing
//!
//! Uses Rayon to tokenize independent documents concurrently. Each document
//! gets its own parser; nothing is shared between them.

use rayon::prelude::*;

use crate::sax::{parse_events, Event, Parser, ParserOptions, SaxHandler};

/// Tokenize multiple documents in parallel, preserving input order
pub fn tokenize_parallel<S: AsRef<str> + Sync>(
    documents: &[S],
    options: &ParserOptions,
) -> Vec<Vec<Event>> {
    documents
        .par_iter()
        .map(|doc| parse_events(doc.as_ref(), options.clone()))
        .collect()
}

/// Run every document through a handler built by `make_handler` and map the finished handler
pub fn tokenize_map<S, H, F, M, T>(
    documents: &[S],
    options: &ParserOptions,
    make_handler: F,
    mapper: M,
) -> Vec<T>
where
    S: AsRef<str> + Sync,
    H: SaxHandler,
    F: Fn() -> H + Sync + Send,
    M: Fn(H) -> T + Sync + Send,
    T: Send,
{
    documents
        .par_iter()
        .map(|doc| {
            let mut parser = Parser::new(options.clone(), make_handler());
            // a fresh parser accepts its first write
            let _ = parser.write(doc.as_ref());
            parser.end();
            mapper(parser.into_handler())
        })
        .collect()
}

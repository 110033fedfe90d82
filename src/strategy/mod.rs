//! Parsing Strategy Module
//!
//! Ways of driving the tokenizer beyond a single `write`/`end` pair:
//! - Streaming: byte chunks in, queued events out (pull consumers, NIF)
//! - Parallel: many independent documents at once with Rayon

pub mod parallel;
pub mod streaming;

pub use parallel::{tokenize_map, tokenize_parallel};
pub use streaming::StreamingTokenizer;

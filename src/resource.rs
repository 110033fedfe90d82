//! ResourceArc Wrappers
//!
//! Persistent state for streaming tokenizers held by Elixir processes.

use rustler::ResourceArc;
use std::sync::{Mutex, MutexGuard};

use crate::sax::ParserOptions;
use crate::strategy::StreamingTokenizer;

/// Wrapper for StreamingTokenizer that can be stored in a ResourceArc
pub struct TokenizerResource {
    pub inner: Mutex<StreamingTokenizer>,
}

impl TokenizerResource {
    pub fn new(options: ParserOptions) -> Self {
        TokenizerResource {
            inner: Mutex::new(StreamingTokenizer::new(options)),
        }
    }

    /// Lock the tokenizer
    ///
    /// # Errors
    ///
    /// Returns `"mutex_poisoned"` if a previous holder panicked.
    pub fn lock(&self) -> Result<MutexGuard<'_, StreamingTokenizer>, &'static str> {
        self.inner.lock().map_err(|_| "mutex_poisoned")
    }
}

#[rustler::resource_impl]
impl rustler::Resource for TokenizerResource {}

impl Default for TokenizerResource {
    fn default() -> Self {
        Self::new(ParserOptions::default())
    }
}

/// Type alias for the ResourceArc
pub type TokenizerRef = ResourceArc<TokenizerResource>;

//! NIF entry points for `RustySax.Native`
//!
//! A tokenizer lives in a resource owned by the calling process; chunks are
//! fed as binaries and events come back as lists of terms. Whole-document
//! calls run on dirty CPU schedulers.

use rustler::{Binary, Encoder, Env, NifMap, NifResult, ResourceArc, Term};

use crate::resource::{TokenizerRef, TokenizerResource};
use crate::sax::{Error, ParserOptions};
use crate::strategy::{self, StreamingTokenizer};
use crate::term::{self, error_to_term, events_to_term};

/// Parser options as passed from Elixir
#[derive(Debug, NifMap)]
pub struct NifOptions {
    pub strict: bool,
    pub xmlns: bool,
    pub trim: bool,
    pub normalize: bool,
    pub lowercase: bool,
    pub noscript: bool,
    pub position: bool,
    pub max_buffer_length: Option<usize>,
}

impl From<NifOptions> for ParserOptions {
    fn from(opts: NifOptions) -> Self {
        ParserOptions::default()
            .with_strict(opts.strict)
            .xmlns(opts.xmlns)
            .trim(opts.trim)
            .normalize(opts.normalize)
            .lowercase(opts.lowercase)
            .noscript(opts.noscript)
            .position(opts.position)
            .max_buffer_length(opts.max_buffer_length)
    }
}

fn lock_error(reason: &'static str) -> rustler::Error {
    rustler::Error::Atom(reason)
}

fn write_result<'a>(env: Env<'a>, result: Result<(), Error>, available: usize) -> Term<'a> {
    match result {
        Ok(()) => (term::ok(), available).encode(env),
        Err(Error::Closed) => (term::error(), term::closed()).encode(env),
        Err(Error::Unresumed(err)) => error_to_term(env, &err),
    }
}

// ============================================================================
// Streaming Tokenizer
// ============================================================================

/// Create a new streaming tokenizer
#[rustler::nif]
fn tokenizer_new(options: NifOptions) -> TokenizerRef {
    ResourceArc::new(TokenizerResource::new(options.into()))
}

/// Feed a chunk; returns `{:ok, available_events}` or an error tuple
#[rustler::nif]
fn tokenizer_feed<'a>(env: Env<'a>, resource: TokenizerRef, chunk: Binary<'a>) -> NifResult<Term<'a>> {
    let mut inner = resource.lock().map_err(lock_error)?;
    let result = inner.feed(chunk.as_slice());
    Ok(write_result(env, result, inner.available_events()))
}

/// Take up to `max` queued events
#[rustler::nif]
fn tokenizer_take_events<'a>(env: Env<'a>, resource: TokenizerRef, max: usize) -> NifResult<Term<'a>> {
    let mut inner = resource.lock().map_err(lock_error)?;
    let events = inner.take_events(max);
    Ok(events_to_term(env, events))
}

/// Clear a pending error so feeding may continue
#[rustler::nif]
fn tokenizer_resume(resource: TokenizerRef) -> NifResult<rustler::Atom> {
    resource.lock().map_err(lock_error)?.resume();
    Ok(term::ok())
}

/// Get tokenizer status: `{available_events, has_pending_bytes, closed}`
#[rustler::nif]
fn tokenizer_status(resource: TokenizerRef) -> NifResult<(usize, bool, bool)> {
    let inner = resource.lock().map_err(lock_error)?;
    Ok((inner.available_events(), inner.has_pending(), inner.is_closed()))
}

/// End the document and return every remaining event
#[rustler::nif]
fn tokenizer_finalize<'a>(env: Env<'a>, resource: TokenizerRef) -> NifResult<Term<'a>> {
    let mut inner = resource.lock().map_err(lock_error)?;
    let events = inner.finalize();
    Ok(events_to_term(env, events))
}

/// Start a new document on the same tokenizer
#[rustler::nif]
fn tokenizer_reset(resource: TokenizerRef) -> NifResult<rustler::Atom> {
    resource.lock().map_err(lock_error)?.reset();
    Ok(term::ok())
}

// ============================================================================
// Whole Documents
// ============================================================================

/// Tokenize a complete document into a list of events
#[rustler::nif(schedule = "DirtyCpu")]
fn tokenize<'a>(env: Env<'a>, input: Binary<'a>, options: NifOptions) -> NifResult<Term<'a>> {
    let mut tokenizer = StreamingTokenizer::new(options.into());
    // a fresh tokenizer accepts its first chunk; errors are queued as events
    let _ = tokenizer.feed(input.as_slice());
    Ok(events_to_term(env, tokenizer.finalize()))
}

/// Tokenize many documents in parallel, one event list per document
#[rustler::nif(schedule = "DirtyCpu")]
fn tokenize_parallel<'a>(env: Env<'a>, inputs: Vec<Binary<'a>>, options: NifOptions) -> NifResult<Term<'a>> {
    let documents: Vec<String> = inputs
        .iter()
        .map(|input| String::from_utf8_lossy(input.as_slice()).into_owned())
        .collect();
    let results = strategy::tokenize_parallel(&documents, &options.into());

    let mut list = Term::list_new_empty(env);
    for events in results.into_iter().rev() {
        list = list.list_prepend(events_to_term(env, events));
    }
    Ok(list)
}

rustler::init!("Elixir.RustySax.Native");

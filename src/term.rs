//! Elixir Term Conversion Utilities
//!
//! Converts tokenizer events to Elixir terms. Strings become binaries;
//! each event is a bare atom or a tuple tagged with the event atom.

use rustler::{Encoder, Env, NewBinary, Term};

use crate::sax::{Attribute, Event, NamespaceBinding, ParseError, Tag};

// Pre-defined atoms for efficiency - created once at compile time
rustler::atoms! {
    ok,
    ready,
    open_tag,
    close_tag,
    attribute,
    text,
    open_cdata,
    cdata,
    close_cdata,
    comment,
    doctype,
    sgml_declaration,
    processing_instruction,
    open_namespace,
    close_namespace,
    script,
    error,
    end,
    closed,
}

/// Convert a string to a binary term (more efficient than .encode())
#[inline]
pub fn str_to_binary<'a>(env: Env<'a>, s: &str) -> Term<'a> {
    let bytes = s.as_bytes();
    let mut binary = NewBinary::new(env, bytes.len());
    binary.as_mut_slice().copy_from_slice(bytes);
    binary.into()
}

/// Convert collected events to an Elixir list
pub fn events_to_term<'a>(env: Env<'a>, events: Vec<Event>) -> Term<'a> {
    let mut list = Term::list_new_empty(env);
    for event in events.iter().rev() {
        list = list.list_prepend(event_to_term(env, event));
    }
    list
}

fn attributes_to_term<'a>(env: Env<'a>, attributes: &[Attribute]) -> Term<'a> {
    let mut list = Term::list_new_empty(env);
    for attr in attributes.iter().rev() {
        let pair = (str_to_binary(env, &attr.name), str_to_binary(env, &attr.value));
        list = list.list_prepend(pair.encode(env));
    }
    list
}

fn tag_to_term<'a>(env: Env<'a>, tag: &Tag) -> Term<'a> {
    (
        open_tag(),
        str_to_binary(env, &tag.name),
        attributes_to_term(env, &tag.attributes),
        tag.self_closing,
    )
        .encode(env)
}

fn binding_to_term<'a>(env: Env<'a>, tag: rustler::Atom, binding: &NamespaceBinding) -> Term<'a> {
    (
        tag,
        str_to_binary(env, &binding.prefix),
        str_to_binary(env, &binding.uri),
    )
        .encode(env)
}

/// `{:error, message, {line, column, offset}}`
pub fn error_to_term<'a>(env: Env<'a>, err: &ParseError) -> Term<'a> {
    (
        error(),
        str_to_binary(env, &err.message),
        (err.line, err.column, err.position),
    )
        .encode(env)
}

/// Convert a single event to an Elixir term
pub fn event_to_term<'a>(env: Env<'a>, event: &Event) -> Term<'a> {
    match event {
        Event::Ready => ready().encode(env),
        Event::OpenTag(tag) => tag_to_term(env, tag),
        Event::CloseTag(name) => (close_tag(), str_to_binary(env, name)).encode(env),
        Event::Attribute(attr) => (
            attribute(),
            str_to_binary(env, &attr.name),
            str_to_binary(env, &attr.value),
        )
            .encode(env),
        Event::Text(s) => (text(), str_to_binary(env, s)).encode(env),
        Event::OpenCData => open_cdata().encode(env),
        Event::CData(s) => (cdata(), str_to_binary(env, s)).encode(env),
        Event::CloseCData => close_cdata().encode(env),
        Event::Comment(s) => (comment(), str_to_binary(env, s)).encode(env),
        Event::Doctype(s) => (doctype(), str_to_binary(env, s)).encode(env),
        Event::SgmlDeclaration(s) => (sgml_declaration(), str_to_binary(env, s)).encode(env),
        Event::ProcessingInstruction(pi) => (
            processing_instruction(),
            str_to_binary(env, &pi.name),
            str_to_binary(env, &pi.body),
        )
            .encode(env),
        Event::OpenNamespace(binding) => binding_to_term(env, open_namespace(), binding),
        Event::CloseNamespace(binding) => binding_to_term(env, close_namespace(), binding),
        Event::Script(s) => (script(), str_to_binary(env, s)).encode(env),
        Event::Error(err) => error_to_term(env, err),
        Event::End => end().encode(env),
    }
}

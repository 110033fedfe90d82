//! Event Collector
//!
//! Implements SaxHandler by recording owned events for batch consumption.

use super::error::ParseError;
use super::events::{Attribute, Event, NamespaceBinding, ProcessingInstruction, SaxHandler, Tag};
use super::options::ParserOptions;
use super::parser::Parser;

/// Collector that gathers events during parsing
#[derive(Debug, Default)]
pub struct EventCollector {
    events: Vec<Event>,
    /// Whether `Ready` events are recorded
    keep_ready: bool,
}

impl EventCollector {
    /// Create a collector that skips `Ready` events
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(64),
            keep_ready: false,
        }
    }

    /// Create a collector that also records `Ready`
    pub fn with_ready() -> Self {
        Self {
            events: Vec::with_capacity(64),
            keep_ready: true,
        }
    }

    /// Take the collected events
    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    /// Take up to `max` events, leaving the rest queued
    pub fn take_up_to(&mut self, max: usize) -> Vec<Event> {
        let count = max.min(self.events.len());
        if count == self.events.len() {
            std::mem::take(&mut self.events)
        } else {
            self.events.drain(..count).collect()
        }
    }

    /// Get the collected events as a slice
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Get number of collected events
    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    /// Errors recorded so far
    pub fn errors(&self) -> impl Iterator<Item = &ParseError> {
        self.events.iter().filter_map(|e| match e {
            Event::Error(err) => Some(err),
            _ => None,
        })
    }
}

impl SaxHandler for EventCollector {
    fn ready(&mut self) {
        if self.keep_ready {
            self.events.push(Event::Ready);
        }
    }

    fn open_tag(&mut self, tag: &Tag) {
        self.events.push(Event::OpenTag(tag.clone()));
    }

    fn close_tag(&mut self, name: &str) {
        self.events.push(Event::CloseTag(name.to_string()));
    }

    fn attribute(&mut self, attribute: &Attribute) {
        self.events.push(Event::Attribute(attribute.clone()));
    }

    fn text(&mut self, text: &str) {
        self.events.push(Event::Text(text.to_string()));
    }

    fn open_cdata(&mut self) {
        self.events.push(Event::OpenCData);
    }

    fn cdata(&mut self, data: &str) {
        self.events.push(Event::CData(data.to_string()));
    }

    fn close_cdata(&mut self) {
        self.events.push(Event::CloseCData);
    }

    fn comment(&mut self, comment: &str) {
        self.events.push(Event::Comment(comment.to_string()));
    }

    fn doctype(&mut self, doctype: &str) {
        self.events.push(Event::Doctype(doctype.to_string()));
    }

    fn sgml_declaration(&mut self, declaration: &str) {
        self.events.push(Event::SgmlDeclaration(declaration.to_string()));
    }

    fn processing_instruction(&mut self, pi: &ProcessingInstruction) {
        self.events.push(Event::ProcessingInstruction(pi.clone()));
    }

    fn open_namespace(&mut self, binding: &NamespaceBinding) {
        self.events.push(Event::OpenNamespace(binding.clone()));
    }

    fn close_namespace(&mut self, binding: &NamespaceBinding) {
        self.events.push(Event::CloseNamespace(binding.clone()));
    }

    fn script(&mut self, script: &str) {
        self.events.push(Event::Script(script.to_string()));
    }

    fn error(&mut self, error: &ParseError) {
        self.events.push(Event::Error(error.clone()));
    }

    fn end(&mut self) {
        self.events.push(Event::End);
    }
}

/// Parse a complete document and return its events
///
/// Strict-mode errors do not stop the parse: they are recorded as
/// `Event::Error` next to the recovered events.
pub fn parse_events(input: &str, options: ParserOptions) -> Vec<Event> {
    let mut parser = Parser::new(options, EventCollector::new());
    // A fresh parser is neither closed nor holding an error
    let _ = parser.write(input);
    parser.end();
    parser.into_handler().take_events()
}

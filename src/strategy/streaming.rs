//! Streaming Tokenizer
//!
//! Stateful tokenizer that accepts byte chunks and queues events for
//! pull-style consumers. Memory stays bounded by the buffer guard plus
//! whatever events the consumer has not taken yet.

use crate::reader::Utf8Decoder;
use crate::sax::{Error, Event, EventCollector, ParseError, Parser, ParserOptions};

/// Chunk-fed tokenizer with an event queue
pub struct StreamingTokenizer {
    parser: Parser<EventCollector>,
    /// Holds back multi-byte sequences split across chunks
    decoder: Utf8Decoder,
    /// Decoded text of the current chunk
    scratch: String,
}

impl StreamingTokenizer {
    /// Create a new streaming tokenizer
    pub fn new(options: ParserOptions) -> Self {
        StreamingTokenizer {
            parser: Parser::new(options, EventCollector::new()),
            decoder: Utf8Decoder::new(),
            scratch: String::with_capacity(8192),
        }
    }

    /// Feed a chunk of bytes
    ///
    /// A refused chunk is not decoded, so it can be fed again after `resume`.
    pub fn feed(&mut self, chunk: &[u8]) -> Result<(), Error> {
        self.parser.check_open()?;
        self.scratch.clear();
        self.decoder.decode(chunk, &mut self.scratch);
        if self.scratch.is_empty() {
            return Ok(());
        }
        self.parser.write(&self.scratch)
    }

    /// Feed a chunk of text
    pub fn feed_str(&mut self, chunk: &str) -> Result<(), Error> {
        self.parser.write(chunk)
    }

    /// Take up to `max` queued events
    /// Returns events and leaves remaining events in place
    pub fn take_events(&mut self, max: usize) -> Vec<Event> {
        self.parser.handler_mut().take_up_to(max)
    }

    /// Get number of queued events
    pub fn available_events(&self) -> usize {
        self.parser.handler().event_count()
    }

    /// Check if bytes of an incomplete character are held back
    pub fn has_pending(&self) -> bool {
        self.decoder.has_pending()
    }

    /// The strict-mode error blocking further input, if any
    pub fn pending_error(&self) -> Option<&ParseError> {
        self.parser.error()
    }

    /// Clear a pending error so feeding may continue
    pub fn resume(&mut self) {
        self.parser.resume();
    }

    pub fn is_closed(&self) -> bool {
        self.parser.is_closed()
    }

    /// Finish the document and return every queued event
    ///
    /// Always succeeds: errors are already queued as `Event::Error`.
    pub fn finalize(&mut self) -> Vec<Event> {
        self.scratch.clear();
        self.decoder.finish(&mut self.scratch);
        if !self.scratch.is_empty() {
            self.parser.resume();
            // refuses only when already closed, and then there is nothing to finish
            let _ = self.parser.write(&self.scratch);
        }
        self.parser.end();
        self.parser.handler_mut().take_events()
    }

    /// Start a new document, dropping queued events and held-back bytes
    pub fn reset(&mut self) {
        self.decoder = Utf8Decoder::new();
        self.parser.reset();
        self.parser.handler_mut().take_events();
    }
}

impl Default for StreamingTokenizer {
    fn default() -> Self {
        Self::new(ParserOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_streaming_simple() {
        let mut tokenizer = StreamingTokenizer::new(ParserOptions::strict());
        tokenizer.feed(b"<root>").unwrap();
        tokenizer.feed(b"<item/>").unwrap();
        tokenizer.feed(b"</root>").unwrap();

        let events = tokenizer.take_events(10);
        assert_eq!(events.len(), 4);
        assert_eq!(events[1].element_name(), Some("item"));
    }

    #[test]
    fn test_streaming_chunks() {
        let mut tokenizer = StreamingTokenizer::new(ParserOptions::strict());
        tokenizer.feed(b"<ro").unwrap();
        assert_eq!(tokenizer.available_events(), 0);
        tokenizer.feed(b"ot><i").unwrap();
        tokenizer.feed(b"tem/></root>").unwrap();

        let events = tokenizer.finalize();
        assert_eq!(events.len(), 5);
        assert_eq!(events.last(), Some(&Event::End));
    }

    #[test]
    fn test_partial_take() {
        let mut tokenizer = StreamingTokenizer::new(ParserOptions::strict());
        tokenizer.feed(b"<a><b/><c/></a>").unwrap();
        assert_eq!(tokenizer.available_events(), 6);

        let first = tokenizer.take_events(2);
        assert_eq!(first.len(), 2);
        assert_eq!(tokenizer.available_events(), 4);
    }

    #[test]
    fn test_split_multibyte_character() {
        let bytes = "<a>ü</a>".as_bytes();
        let mut tokenizer = StreamingTokenizer::new(ParserOptions::strict());
        tokenizer.feed(&bytes[..4]).unwrap();
        assert!(tokenizer.has_pending());
        tokenizer.feed(&bytes[4..]).unwrap();

        let events = tokenizer.finalize();
        assert_eq!(events[1], Event::Text("ü".into()));
    }

    #[test]
    fn test_error_gate_and_resume() {
        let mut tokenizer = StreamingTokenizer::new(ParserOptions::strict());
        tokenizer.feed(b"<a>&nope;").unwrap();
        assert!(tokenizer.pending_error().is_some());
        assert!(tokenizer.feed(b"</a>").is_err());

        tokenizer.resume();
        tokenizer.feed(b"</a>").unwrap();
        let events = tokenizer.finalize();
        assert!(events.iter().any(Event::is_error));
        assert!(tokenizer.is_closed());
    }

    #[test]
    fn test_refused_chunk_can_be_fed_again() {
        let bytes = "xyé".as_bytes();
        let (head, tail) = bytes.split_at(bytes.len() - 1);

        let mut tokenizer = StreamingTokenizer::new(ParserOptions::strict());
        tokenizer.feed(b"<a>&bad;").unwrap();
        assert!(matches!(tokenizer.feed(head), Err(Error::Unresumed(_))));
        assert!(!tokenizer.has_pending());

        tokenizer.resume();
        tokenizer.feed(head).unwrap();
        tokenizer.feed(tail).unwrap();
        let text: String = tokenizer
            .finalize()
            .iter()
            .filter_map(|e| match e {
                Event::Text(t) => Some(t.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(text, "&bad;xyé");
    }

    #[test]
    fn test_reset_drops_queue() {
        let mut tokenizer = StreamingTokenizer::new(ParserOptions::loose());
        tokenizer.feed(b"<a>text").unwrap();
        tokenizer.reset();
        assert_eq!(tokenizer.available_events(), 0);

        tokenizer.feed(b"<b/>").unwrap();
        assert_eq!(tokenizer.available_events(), 2);
    }
}

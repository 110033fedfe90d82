//! Incremental SAX Parser
//!
//! A character-at-a-time state machine fed by [`Parser::write`]. Input may
//! be split at any character boundary: the events produced are the same
//! however the document is chunked.
//!
//! ## Recovery
//!
//! Nothing aborts the parse. In strict mode every well-formedness violation
//! is reported through [`SaxHandler::error`] and the parser carries on with
//! the same recovery loose mode uses; the error is then held until
//! [`Parser::resume`] is called. Loose mode reports nothing.

use std::collections::HashMap;

use memchr::{memchr2, memchr_iter, memrchr};

use crate::core::chars::{
    is_attrib_end, is_entity_char, is_name_char, is_name_start_char, is_quote, is_whitespace,
};
use crate::core::entities;
use crate::core::namespace::{ns, qname, NamespaceScopes, ScopeId, ROOT_SCOPE};

use super::error::{Error, ErrorKind, ParseError};
use super::events::{
    Attribute, NamespaceBinding, ProcessingInstruction, QualifiedName, SaxHandler, Tag,
};
use super::guard::{buffer_limit, next_check, split_bounded, Buffers};
use super::options::ParserOptions;
use super::state::State;

/// An element on the open stack, with the namespace frame in effect for it
#[derive(Debug, Clone)]
pub(super) struct OpenElement {
    pub tag: Tag,
    pub scope: ScopeId,
}

/// Which buffer an entity reference expands into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntityTarget {
    Text,
    AttribValue,
}

/// Streaming XML tokenizer driving a [`SaxHandler`]
pub struct Parser<H: SaxHandler> {
    pub(super) handler: H,
    pub(super) options: ParserOptions,
    pub(super) state: State,
    pub(super) buffers: Buffers,
    /// Active quote character in quoted states
    quote: Option<char>,
    /// Open elements, innermost last
    tags: Vec<OpenElement>,
    /// Start tag under construction
    tag: Option<OpenElement>,
    /// Attributes deferred until the start tag completes (xmlns mode)
    attrib_list: Vec<(String, String)>,
    scopes: NamespaceScopes,
    /// Per-parser entity definitions, consulted before the built-in table
    custom_entities: HashMap<String, String>,
    pub(super) position: usize,
    line: usize,
    column: usize,
    start_tag_position: usize,
    pub(super) buffer_check_position: usize,
    /// The close tag being scanned came from inside a `<script>` body
    script_close: bool,
    closed: bool,
    closed_root: bool,
    saw_root: bool,
    saw_doctype: bool,
    error: Option<ParseError>,
}

impl<H: SaxHandler> Parser<H> {
    /// Create a parser and emit `ready`
    pub fn new(options: ParserOptions, handler: H) -> Self {
        let mut parser = Parser {
            handler,
            options,
            state: State::Begin,
            buffers: Buffers::default(),
            quote: None,
            tags: Vec::new(),
            tag: None,
            attrib_list: Vec::new(),
            scopes: NamespaceScopes::new(),
            custom_entities: HashMap::new(),
            position: 0,
            line: 1,
            column: 0,
            start_tag_position: 0,
            buffer_check_position: 0,
            script_close: false,
            closed: false,
            closed_root: false,
            saw_root: false,
            saw_doctype: false,
            error: None,
        };
        parser.init();
        parser
    }

    /// Return to the initial state, keeping options, handler and custom entities
    fn init(&mut self) {
        self.state = State::Begin;
        self.buffers.clear();
        self.quote = None;
        self.tags.clear();
        self.tag = None;
        self.attrib_list.clear();
        self.scopes = NamespaceScopes::new();
        self.position = 0;
        self.line = 1;
        self.column = 0;
        self.start_tag_position = 0;
        self.buffer_check_position = next_check(0, self.options.max_buffer_length, 0);
        self.script_close = false;
        self.closed = false;
        self.closed_root = false;
        self.saw_root = false;
        self.saw_doctype = false;
        self.error = None;
        self.handler.ready();
    }

    /// Whether `write` would accept input right now
    ///
    /// Byte-level drivers call this before decoding a chunk so that a
    /// refused chunk leaves their own state untouched.
    pub fn check_open(&self) -> Result<(), Error> {
        if let Some(err) = &self.error {
            return Err(Error::Unresumed(err.clone()));
        }
        if self.closed {
            return Err(Error::Closed);
        }
        Ok(())
    }

    /// Feed a chunk of input
    ///
    /// Fails without consuming anything if the parser is closed or a
    /// strict-mode error is pending.
    pub fn write(&mut self, chunk: &str) -> Result<(), Error> {
        self.check_open()?;

        let bytes = chunk.as_bytes();
        let mut i = 0;
        while i < chunk.len() {
            if self.state == State::Text && self.saw_root && !self.closed_root {
                let rest = &chunk[i..];
                let run = memchr2(b'<', b'&', &bytes[i..]).unwrap_or(rest.len());
                if run > 0 {
                    let consumed = self.append_text_run(&rest[..run]);
                    if consumed > 0 {
                        i += consumed;
                        if self.position >= self.buffer_check_position {
                            self.check_buffer_length();
                        }
                        continue;
                    }
                }
            }

            let Some(c) = chunk[i..].chars().next() else {
                break;
            };
            i += c.len_utf8();
            self.advance(c);
            self.step(c);
            if self.position >= self.buffer_check_position {
                self.check_buffer_length();
            }
        }
        Ok(())
    }

    /// Finish the document
    ///
    /// Reports unclosed structure (strict mode), flushes pending text,
    /// closes remaining elements (loose mode) and emits `end`. The parser
    /// is closed afterwards; `reset()` starts a new document.
    pub fn end(&mut self) {
        if self.closed {
            return;
        }
        if self.saw_root && !self.closed_root {
            self.strict_fail(ErrorKind::Unbalanced, "Unclosed root tag");
        }
        if !self.state.is_resting() {
            self.strict_fail(ErrorKind::Syntax, "Unexpected end");
        }
        self.close_text();
        if !self.buffers.script.is_empty() {
            let script = std::mem::take(&mut self.buffers.script);
            self.handler.script(&script);
        }
        if !self.options.strict {
            while let Some(open) = self.tags.pop() {
                self.close_element(open);
            }
        }
        self.handler.end();

        // the pending error, if any, stays visible until reset
        self.closed = true;
        self.buffers.clear();
        self.tags.clear();
        self.tag = None;
        self.attrib_list.clear();
        self.scopes = NamespaceScopes::new();
    }

    /// `end()`, refusing like `write` when the parser cannot accept it
    pub fn close(&mut self) -> Result<(), Error> {
        self.check_open()?;
        self.end();
        Ok(())
    }

    /// Clear a pending error so writing may continue
    pub fn resume(&mut self) {
        self.error = None;
    }

    /// Emit pending text, cdata and script content without changing state
    pub fn flush(&mut self) {
        self.close_text();
        if !self.buffers.cdata.is_empty() {
            let data = std::mem::take(&mut self.buffers.cdata);
            self.handler.cdata(&data);
        }
        if !self.buffers.script.is_empty() {
            let script = std::mem::take(&mut self.buffers.script);
            self.handler.script(&script);
        }
    }

    /// Discard all document state and emit `ready` again
    pub fn reset(&mut self) {
        log::trace!(target: "rustysax", "parser reset at offset {}", self.position);
        self.init();
    }

    /// Define an entity for this parser, shadowing the built-in table
    pub fn define_entity(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.custom_entities.insert(name.into(), value.into());
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    pub fn into_handler(self) -> H {
        self.handler
    }

    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Characters consumed since construction or reset
    pub fn position(&self) -> usize {
        self.position
    }

    /// Current line, starting at 1
    pub fn line(&self) -> usize {
        self.line
    }

    /// Column of the last character consumed, 0 at the start of a line
    pub fn column(&self) -> usize {
        self.column
    }

    /// Number of open elements
    pub fn depth(&self) -> usize {
        self.tags.len()
    }

    /// Names of the open elements, outermost first
    pub fn open_tags(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(|open| open.tag.name.as_str())
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// The pending strict-mode error, if any
    pub fn error(&self) -> Option<&ParseError> {
        self.error.as_ref()
    }

    #[inline]
    fn advance(&mut self, c: char) {
        self.position += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
    }

    /// Append a run of plain text inside the root element
    ///
    /// Stops at the next scheduled buffer check; returns the bytes consumed.
    fn append_text_run(&mut self, run: &str) -> usize {
        let budget = self.buffer_check_position.saturating_sub(self.position);
        let mut chars = 0;
        let mut end = run.len();
        for (idx, _) in run.char_indices() {
            if chars == budget {
                end = idx;
                break;
            }
            chars += 1;
        }
        if end == 0 {
            return 0;
        }

        let taken = &run[..end];
        let bytes = taken.as_bytes();
        self.position += chars;
        match memrchr(b'\n', bytes) {
            Some(last) => {
                self.line += memchr_iter(b'\n', bytes).count();
                self.column = taken[last + 1..].chars().count();
            }
            None => self.column += chars,
        }
        self.buffers.text.push_str(taken);
        end
    }

    fn step(&mut self, c: char) {
        match self.state {
            State::Begin => self.begin(c),
            State::Text => self.text(c),
            State::TextEntity => self.entity(c, EntityTarget::Text, State::Text),
            State::AttribValueEntityQ => {
                self.entity(c, EntityTarget::AttribValue, State::AttribValueQuoted)
            }
            State::AttribValueEntityU => {
                self.entity(c, EntityTarget::AttribValue, State::AttribValueUnquoted)
            }
            State::Script => {
                if c == '<' {
                    self.state = State::ScriptEnding;
                } else {
                    self.buffers.script.push(c);
                }
            }
            State::ScriptEnding => {
                if c == '/' {
                    self.state = State::CloseTag;
                    self.script_close = true;
                    self.buffers.tag_name.clear();
                } else {
                    self.buffers.script.push('<');
                    if c != '<' {
                        self.buffers.script.push(c);
                        self.state = State::Script;
                    }
                }
            }
            State::OpenWaka => self.open_waka(c),
            State::SgmlDecl => self.sgml_decl(c),
            State::SgmlDeclQuoted => {
                if Some(c) == self.quote {
                    self.state = State::SgmlDecl;
                    self.quote = None;
                }
                self.buffers.sgml_decl.push(c);
            }
            State::Doctype => {
                if c == '>' {
                    self.state = State::Text;
                    let doctype = std::mem::take(&mut self.buffers.doctype);
                    self.close_text();
                    self.handler.doctype(&doctype);
                    self.saw_doctype = true;
                } else {
                    self.buffers.doctype.push(c);
                    if c == '[' {
                        self.state = State::DoctypeDtd;
                    } else if is_quote(c) {
                        self.state = State::DoctypeQuoted;
                        self.quote = Some(c);
                    }
                }
            }
            State::DoctypeQuoted => {
                self.buffers.doctype.push(c);
                if Some(c) == self.quote {
                    self.quote = None;
                    self.state = State::Doctype;
                }
            }
            State::DoctypeDtd => {
                self.buffers.doctype.push(c);
                if c == ']' {
                    self.state = State::Doctype;
                } else if is_quote(c) {
                    self.state = State::DoctypeDtdQuoted;
                    self.quote = Some(c);
                }
            }
            State::DoctypeDtdQuoted => {
                self.buffers.doctype.push(c);
                if Some(c) == self.quote {
                    self.state = State::DoctypeDtd;
                    self.quote = None;
                }
            }
            State::CommentStarting => {
                if c == '-' {
                    self.state = State::Comment;
                    self.buffers.comment.clear();
                } else {
                    self.buffers.sgml_decl.push('-');
                    self.state = State::SgmlDecl;
                    self.step(c);
                }
            }
            State::Comment => {
                if c == '-' {
                    self.state = State::CommentEnding;
                } else {
                    self.buffers.comment.push(c);
                }
            }
            State::CommentEnding => {
                if c == '-' {
                    self.state = State::CommentEnded;
                } else {
                    self.buffers.comment.push('-');
                    self.buffers.comment.push(c);
                    self.state = State::Comment;
                }
            }
            State::CommentEnded => self.comment_ended(c),
            State::Cdata => {
                if c == ']' {
                    self.state = State::CdataEnding;
                } else {
                    self.buffers.cdata.push(c);
                }
            }
            State::CdataEnding => {
                if c == ']' {
                    self.state = State::CdataEnding2;
                } else {
                    self.buffers.cdata.push(']');
                    self.buffers.cdata.push(c);
                    self.state = State::Cdata;
                }
            }
            State::CdataEnding2 => {
                if c == '>' {
                    if !self.buffers.cdata.is_empty() {
                        let data = std::mem::take(&mut self.buffers.cdata);
                        self.close_text();
                        self.handler.cdata(&data);
                    }
                    self.close_text();
                    self.handler.close_cdata();
                    self.state = State::Text;
                } else if c == ']' {
                    self.buffers.cdata.push(']');
                } else {
                    self.buffers.cdata.push_str("]]");
                    self.buffers.cdata.push(c);
                    self.state = State::Cdata;
                }
            }
            State::ProcInst => {
                if c == '?' {
                    self.state = State::ProcInstEnding;
                } else if is_whitespace(c) {
                    self.state = State::ProcInstBody;
                } else {
                    self.buffers.proc_inst_name.push(c);
                }
            }
            State::ProcInstBody => {
                if self.buffers.proc_inst_body.is_empty() && is_whitespace(c) {
                    // leading whitespace is not part of the body
                } else if c == '?' {
                    self.state = State::ProcInstEnding;
                } else {
                    self.buffers.proc_inst_body.push(c);
                }
            }
            State::ProcInstEnding => {
                if c == '>' {
                    let pi = ProcessingInstruction {
                        name: std::mem::take(&mut self.buffers.proc_inst_name),
                        body: std::mem::take(&mut self.buffers.proc_inst_body),
                    };
                    self.close_text();
                    self.handler.processing_instruction(&pi);
                    self.state = State::Text;
                } else if c == '?' {
                    self.buffers.proc_inst_body.push('?');
                } else {
                    self.buffers.proc_inst_body.push('?');
                    self.buffers.proc_inst_body.push(c);
                    self.state = State::ProcInstBody;
                }
            }
            State::OpenTag => {
                if is_name_char(c) {
                    self.buffers.tag_name.push(c);
                } else {
                    self.new_tag();
                    if c == '>' {
                        self.open_tag(false);
                    } else if c == '/' {
                        self.state = State::OpenTagSlash;
                    } else {
                        if !is_whitespace(c) {
                            self.strict_fail(ErrorKind::Syntax, "Invalid character in tag name");
                        }
                        self.state = State::Attrib;
                    }
                }
            }
            State::OpenTagSlash => {
                if c == '>' {
                    self.open_tag(true);
                    self.close_tag();
                } else {
                    self.strict_fail(
                        ErrorKind::Syntax,
                        "Forward-slash in opening tag not followed by >",
                    );
                    self.state = State::Attrib;
                    self.step(c);
                }
            }
            State::Attrib => {
                if is_whitespace(c) {
                    return;
                }
                if c == '>' {
                    self.open_tag(false);
                } else if c == '/' {
                    self.state = State::OpenTagSlash;
                } else if is_name_start_char(c) {
                    self.buffers.attrib_name.clear();
                    self.buffers.attrib_name.push(c);
                    self.buffers.attrib_value.clear();
                    self.state = State::AttribName;
                } else {
                    self.strict_fail(ErrorKind::Syntax, "Invalid attribute name");
                }
            }
            State::AttribName => {
                if c == '=' {
                    self.state = State::AttribValue;
                } else if c == '>' || c == '/' {
                    self.strict_fail(ErrorKind::Syntax, "Attribute without value");
                    self.buffers.attrib_value = self.buffers.attrib_name.clone();
                    self.attrib();
                    if c == '>' {
                        self.open_tag(false);
                    } else {
                        self.state = State::OpenTagSlash;
                    }
                } else if is_whitespace(c) {
                    self.state = State::AttribNameSawWhite;
                } else if is_name_char(c) {
                    self.buffers.attrib_name.push(c);
                } else {
                    self.strict_fail(ErrorKind::Syntax, "Invalid attribute name");
                }
            }
            State::AttribNameSawWhite => {
                if c == '=' {
                    self.state = State::AttribValue;
                } else if !is_whitespace(c) {
                    self.strict_fail(ErrorKind::Syntax, "Attribute without value");
                    self.buffers.attrib_value.clear();
                    self.attrib();
                    self.state = State::Attrib;
                    self.step(c);
                }
            }
            State::AttribValue => {
                if is_whitespace(c) {
                    return;
                }
                if is_quote(c) {
                    self.quote = Some(c);
                    self.state = State::AttribValueQuoted;
                } else {
                    self.strict_fail(ErrorKind::Syntax, "Unquoted attribute value");
                    self.state = State::AttribValueUnquoted;
                    self.buffers.attrib_value.clear();
                    self.step(c);
                }
            }
            State::AttribValueQuoted => {
                if Some(c) != self.quote {
                    if c == '&' {
                        self.state = State::AttribValueEntityQ;
                    } else {
                        self.buffers.attrib_value.push(c);
                    }
                    return;
                }
                self.attrib();
                self.quote = None;
                self.state = State::AttribValueClosed;
            }
            State::AttribValueClosed => {
                if is_whitespace(c) {
                    self.state = State::Attrib;
                } else if c == '>' {
                    self.open_tag(false);
                } else if c == '/' {
                    self.state = State::OpenTagSlash;
                } else if is_name_start_char(c) {
                    self.strict_fail(ErrorKind::Syntax, "No whitespace between attributes");
                    self.buffers.attrib_name.clear();
                    self.buffers.attrib_name.push(c);
                    self.buffers.attrib_value.clear();
                    self.state = State::AttribName;
                } else {
                    self.strict_fail(ErrorKind::Syntax, "Invalid attribute name");
                }
            }
            State::AttribValueUnquoted => {
                if !is_attrib_end(c) {
                    if c == '&' {
                        self.state = State::AttribValueEntityU;
                    } else {
                        self.buffers.attrib_value.push(c);
                    }
                    return;
                }
                self.attrib();
                if c == '>' {
                    self.open_tag(false);
                } else {
                    self.state = State::Attrib;
                }
            }
            State::CloseTag => self.close_tag_char(c),
            State::CloseTagSawWhite => {
                if is_whitespace(c) {
                    return;
                }
                if c == '>' {
                    self.close_tag();
                } else {
                    self.strict_fail(ErrorKind::Syntax, "Invalid characters in closing tag");
                }
            }
        }
    }

    fn begin(&mut self, c: char) {
        // A byte order mark is dropped only as the very first character
        if c == '\u{FEFF}' && self.position == 1 {
            return;
        }
        if c == '<' {
            self.state = State::OpenWaka;
            self.start_tag_position = self.position;
        } else if !is_whitespace(c) {
            self.strict_fail(ErrorKind::Unbalanced, "Non-whitespace before first tag.");
            self.buffers.text.push(c);
            self.state = State::Text;
        }
    }

    fn text(&mut self, c: char) {
        if c == '<' {
            self.state = State::OpenWaka;
            self.start_tag_position = self.position;
            return;
        }
        if !is_whitespace(c) && (!self.saw_root || self.closed_root) {
            self.strict_fail(ErrorKind::Unbalanced, "Text data outside of root node.");
        }
        if c == '&' {
            self.state = State::TextEntity;
        } else {
            self.buffers.text.push(c);
        }
    }

    fn open_waka(&mut self, c: char) {
        if c == '!' {
            self.state = State::SgmlDecl;
            self.buffers.sgml_decl.clear();
        } else if is_whitespace(c) {
            // `<   tag` is tolerated
        } else if is_name_start_char(c) {
            self.state = State::OpenTag;
            self.buffers.tag_name.clear();
            self.buffers.tag_name.push(c);
        } else if c == '/' {
            self.state = State::CloseTag;
            self.script_close = false;
            self.buffers.tag_name.clear();
        } else if c == '?' {
            self.state = State::ProcInst;
            self.buffers.proc_inst_name.clear();
            self.buffers.proc_inst_body.clear();
        } else {
            self.strict_fail(ErrorKind::Syntax, "Unencoded <");
            // keep the whitespace skipped since the '<'
            let skipped = self.position.saturating_sub(self.start_tag_position + 1);
            let mut literal = String::with_capacity(skipped + 1);
            literal.push('<');
            literal.extend(std::iter::repeat(' ').take(skipped));
            self.push_text(&literal);
            self.state = State::Text;
            self.step(c);
        }
    }

    fn sgml_decl(&mut self, c: char) {
        let decl = &self.buffers.sgml_decl;
        if decl.is_empty() && c == '-' {
            self.state = State::CommentStarting;
        } else if completes_keyword(decl, c, "[CDATA[") {
            self.state = State::Cdata;
            self.buffers.sgml_decl.clear();
            self.buffers.cdata.clear();
            self.close_text();
            self.handler.open_cdata();
        } else if completes_keyword(decl, c, "DOCTYPE") {
            self.state = State::Doctype;
            if self.saw_doctype || self.saw_root {
                self.strict_fail(ErrorKind::Syntax, "Inappropriately located doctype declaration");
            }
            self.buffers.doctype.clear();
            self.buffers.sgml_decl.clear();
        } else if c == '>' {
            let decl = std::mem::take(&mut self.buffers.sgml_decl);
            self.close_text();
            self.handler.sgml_declaration(&decl);
            self.state = State::Text;
        } else {
            if is_quote(c) {
                self.state = State::SgmlDeclQuoted;
                self.quote = Some(c);
            }
            self.buffers.sgml_decl.push(c);
        }
    }

    fn comment_ended(&mut self, c: char) {
        if c == '>' {
            let raw = std::mem::take(&mut self.buffers.comment);
            let comment = apply_text_options(&self.options, raw);
            if !comment.is_empty() {
                self.close_text();
                self.handler.comment(&comment);
            }
            self.state = State::Text;
        } else if c == '-' {
            self.strict_fail(ErrorKind::Syntax, "Malformed comment");
            self.buffers.comment.push('-');
        } else {
            self.strict_fail(ErrorKind::Syntax, "Malformed comment");
            self.buffers.comment.push_str("--");
            self.buffers.comment.push(c);
            self.state = State::Comment;
        }
    }

    fn entity(&mut self, c: char, target: EntityTarget, return_state: State) {
        if c == ';' {
            let name = std::mem::take(&mut self.buffers.entity);
            let expansion = self.resolve_entity(&name);
            let expansion = match expansion {
                Some(value) => value,
                None => {
                    self.strict_fail(ErrorKind::InvalidEntity, "Invalid character entity");
                    format!("&{name};")
                }
            };
            self.push_to(target, &expansion);
            self.state = return_state;
        } else if is_entity_char(c) {
            self.buffers.entity.push(c);
        } else {
            self.strict_fail(ErrorKind::InvalidEntity, "Invalid character entity");
            let name = std::mem::take(&mut self.buffers.entity);
            self.push_to(target, &format!("&{name}"));
            self.state = return_state;
            self.step(c);
        }
    }

    fn push_to(&mut self, target: EntityTarget, s: &str) {
        match target {
            EntityTarget::Text => self.push_text(s),
            EntityTarget::AttribValue => self.buffers.attrib_value.push_str(s),
        }
    }

    /// Append several characters to the text buffer at once
    ///
    /// The copied content may come from a buffer that is already past the
    /// limit, so the text is emitted at once instead of waiting for the
    /// next scheduled check.
    fn push_text(&mut self, s: &str) {
        self.buffers.text.push_str(s);
        if buffer_limit(self.options.max_buffer_length)
            .is_some_and(|max| self.buffers.text.len() >= max)
        {
            self.close_text();
        }
    }

    fn resolve_entity(&self, name: &str) -> Option<String> {
        if let Some(value) = self.custom_entities.get(name) {
            return Some(value.clone());
        }
        if !self.custom_entities.is_empty() {
            if let Some(value) = self.custom_entities.get(&name.to_ascii_lowercase()) {
                return Some(value.clone());
            }
        }
        entities::parse_entity(name).map(String::from)
    }

    fn close_tag_char(&mut self, c: char) {
        if self.buffers.tag_name.is_empty() {
            if is_whitespace(c) {
                return;
            }
            if is_name_start_char(c) {
                self.buffers.tag_name.push(c);
            } else if self.script_close {
                self.buffers.script.push_str("</");
                self.buffers.script.push(c);
                self.script_close = false;
                self.state = State::Script;
            } else if c == '>' {
                self.close_tag();
            } else {
                self.strict_fail(ErrorKind::Syntax, "Invalid tagname in closing tag.");
            }
        } else if c == '>' {
            self.close_tag();
        } else if is_name_char(c) {
            self.buffers.tag_name.push(c);
        } else if self.script_close {
            let name = std::mem::take(&mut self.buffers.tag_name);
            self.buffers.script.push_str("</");
            self.buffers.script.push_str(&name);
            self.script_close = false;
            self.state = State::Script;
            self.step(c);
        } else {
            if !is_whitespace(c) {
                self.strict_fail(ErrorKind::Syntax, "Invalid tagname in closing tag");
            }
            self.state = State::CloseTagSawWhite;
        }
    }

    /// Fold a name to the loose-mode case
    fn fold_case(&self, name: &mut String) {
        if self.options.strict {
            return;
        }
        *name = if self.options.lowercase {
            name.to_lowercase()
        } else {
            name.to_uppercase()
        };
    }

    #[inline]
    fn current_scope(&self) -> ScopeId {
        self.tags.last().map_or(ROOT_SCOPE, |open| open.scope)
    }

    /// Begin building a start tag from the scanned name
    fn new_tag(&mut self) {
        let mut name = std::mem::take(&mut self.buffers.tag_name);
        self.fold_case(&mut name);
        self.buffers.tag_name = name.clone();

        let scope = self.current_scope();
        if self.options.xmlns {
            self.scopes.truncate_after(scope);
        }
        self.tag = Some(OpenElement {
            tag: Tag::new(name),
            scope,
        });
        self.attrib_list.clear();
    }

    /// Record the scanned attribute on the tag under construction
    fn attrib(&mut self) {
        let mut name = std::mem::take(&mut self.buffers.attrib_name);
        self.fold_case(&mut name);
        let value = std::mem::take(&mut self.buffers.attrib_value);

        let Some(open) = self.tag.as_ref() else {
            return;
        };
        // first occurrence wins
        if open.tag.has_attribute(&name) || self.attrib_list.iter().any(|(n, _)| *n == name) {
            return;
        }

        if !self.options.xmlns {
            let attribute = Attribute::new(name, value);
            self.close_text();
            self.handler.attribute(&attribute);
            if let Some(open) = self.tag.as_mut() {
                open.tag.attributes.push(attribute);
            }
            return;
        }

        let (prefix, local) = qname(&name, true);
        if prefix == "xmlns" {
            if local == "xml" && value != ns::XML {
                self.strict_fail(
                    ErrorKind::Namespace,
                    format!("xml: prefix must be bound to {}\nActual: {}", ns::XML, value),
                );
            } else if local == "xmlns" && value != ns::XMLNS {
                self.strict_fail(
                    ErrorKind::Namespace,
                    format!("xmlns: prefix must be bound to {}\nActual: {}", ns::XMLNS, value),
                );
            } else {
                let parent = self.current_scope();
                let local = local.to_string();
                if let Some(open) = self.tag.as_mut() {
                    if open.scope == parent {
                        open.scope = self.scopes.push_frame(parent);
                    }
                    self.scopes.bind(open.scope, &local, &value);
                }
            }
        }
        // reported once the tag is complete and every binding is known
        self.attrib_list.push((name, value));
    }

    /// Complete the start tag under construction
    fn open_tag(&mut self, self_closing: bool) {
        let Some(mut open) = self.tag.take() else {
            return;
        };

        if self.options.xmlns {
            let (prefix, local) = qname(&open.tag.name, false);
            let (prefix, local) = (prefix.to_string(), local.to_string());
            let mut uri = self
                .scopes
                .resolve(open.scope, &prefix)
                .unwrap_or_default()
                .to_string();
            if !prefix.is_empty() && uri.is_empty() {
                self.strict_fail(
                    ErrorKind::Namespace,
                    format!("Unbound namespace prefix: {:?}", open.tag.name),
                );
                uri = prefix.clone();
            }
            open.tag.qualified = Some(QualifiedName { prefix, local, uri });

            if open.scope != self.current_scope() {
                self.close_text();
                for (prefix, uri) in self.scopes.own_bindings(open.scope) {
                    self.handler.open_namespace(&NamespaceBinding {
                        prefix: prefix.clone(),
                        uri: uri.clone(),
                    });
                }
            }

            for (name, value) in std::mem::take(&mut self.attrib_list) {
                let (prefix, local) = qname(&name, true);
                let mut uri = if prefix.is_empty() {
                    String::new()
                } else {
                    self.scopes
                        .resolve(open.scope, prefix)
                        .unwrap_or_default()
                        .to_string()
                };
                if !prefix.is_empty() && prefix != "xmlns" && uri.is_empty() {
                    self.strict_fail(
                        ErrorKind::Namespace,
                        format!("Unbound namespace prefix: {prefix:?}"),
                    );
                    uri = prefix.to_string();
                }
                let qualified = QualifiedName {
                    prefix: prefix.to_string(),
                    local: local.to_string(),
                    uri,
                };
                let attribute = Attribute {
                    name,
                    value,
                    qualified: Some(qualified),
                };
                self.close_text();
                self.handler.attribute(&attribute);
                open.tag.attributes.push(attribute);
            }
        }

        open.tag.self_closing = self_closing;
        self.saw_root = true;
        log::trace!(target: "rustysax", "open <{}> at depth {}", open.tag.name, self.tags.len());
        self.close_text();
        self.handler.open_tag(&open.tag);

        let script = !self_closing
            && self.options.captures_script()
            && open.tag.name.eq_ignore_ascii_case("script");
        self.tags.push(open);
        if !self_closing {
            self.state = if script { State::Script } else { State::Text };
            self.buffers.tag_name.clear();
        }
        self.buffers.attrib_name.clear();
        self.buffers.attrib_value.clear();
        self.attrib_list.clear();
    }

    /// Resolve the scanned close tag against the open stack
    fn close_tag(&mut self) {
        let script_close = std::mem::replace(&mut self.script_close, false);
        if self.buffers.tag_name.is_empty() {
            self.strict_fail(ErrorKind::Syntax, "Weird empty close tag.");
            self.push_text("</>");
            self.state = State::Text;
            return;
        }

        if script_close {
            if !self.buffers.tag_name.eq_ignore_ascii_case("script") {
                let name = std::mem::take(&mut self.buffers.tag_name);
                self.buffers.script.push_str("</");
                self.buffers.script.push_str(&name);
                self.buffers.script.push('>');
                self.state = State::Script;
                return;
            }
            if !self.buffers.script.is_empty() {
                let script = std::mem::take(&mut self.buffers.script);
                self.close_text();
                self.handler.script(&script);
            }
        }

        let raw = std::mem::take(&mut self.buffers.tag_name);
        let mut name = raw.clone();
        self.fold_case(&mut name);

        let mut found = None;
        let mut reported = false;
        for idx in (0..self.tags.len()).rev() {
            if self.tags[idx].tag.name == name {
                found = Some(idx);
                break;
            }
            if !reported {
                self.strict_fail(ErrorKind::Unbalanced, "Unexpected close tag");
                reported = true;
            }
        }

        let Some(target) = found else {
            self.strict_fail(ErrorKind::Unbalanced, format!("Unmatched closing tag: {raw}"));
            self.push_text(&format!("</{raw}>"));
            self.state = State::Text;
            return;
        };

        while self.tags.len() > target {
            let Some(open) = self.tags.pop() else {
                break;
            };
            self.close_element(open);
        }
        if target == 0 {
            self.closed_root = true;
        }
        self.buffers.attrib_name.clear();
        self.buffers.attrib_value.clear();
        self.attrib_list.clear();
        self.state = State::Text;
    }

    /// Emit `close_tag` for an element already popped off the stack
    fn close_element(&mut self, open: OpenElement) {
        log::trace!(target: "rustysax", "close </{}> at depth {}", open.tag.name, self.tags.len());
        self.close_text();
        self.handler.close_tag(&open.tag.name);

        if self.options.xmlns {
            let parent = self.current_scope();
            if open.scope != parent {
                for (prefix, uri) in self.scopes.own_bindings(open.scope) {
                    self.handler.close_namespace(&NamespaceBinding {
                        prefix: prefix.clone(),
                        uri: uri.clone(),
                    });
                }
                self.scopes.release(open.scope);
            }
        }
    }

    /// Emit pending text, after trim/normalize
    ///
    /// With a buffer limit set, no single `text` event exceeds it.
    pub(super) fn close_text(&mut self) {
        if self.buffers.text.is_empty() {
            return;
        }
        let raw = std::mem::take(&mut self.buffers.text);
        let text = apply_text_options(&self.options, raw);
        if text.is_empty() {
            return;
        }
        match buffer_limit(self.options.max_buffer_length) {
            Some(max) if text.len() > max => {
                for piece in split_bounded(&text, max) {
                    self.handler.text(piece);
                }
            }
            _ => self.handler.text(&text),
        }
    }

    /// Report an error in strict mode; loose mode recovers silently
    pub(super) fn strict_fail(&mut self, kind: ErrorKind, message: impl Into<String>) {
        if self.options.strict {
            self.fail(kind, message.into());
        }
    }

    fn fail(&mut self, kind: ErrorKind, message: String) {
        self.close_text();
        let err = if self.options.position {
            ParseError::new(kind, message, self.line, self.column, self.position)
        } else {
            ParseError::new(kind, message, 0, 0, 0)
        };
        log::debug!(target: "rustysax", "{err}");
        self.handler.error(&err);
        // the first error is the one held until resume
        if self.error.is_none() {
            self.error = Some(err);
        }
    }
}

/// Whether `decl` followed by `c` spells `keyword`, ignoring ASCII case
fn completes_keyword(decl: &str, c: char, keyword: &str) -> bool {
    let Some(last) = keyword.chars().last() else {
        return false;
    };
    let head = &keyword[..keyword.len() - last.len_utf8()];
    decl.len() == head.len() && decl.eq_ignore_ascii_case(head) && c.eq_ignore_ascii_case(&last)
}

/// Apply the `trim` and `normalize` options to text or comment content
fn apply_text_options(options: &ParserOptions, text: String) -> String {
    let text = if options.trim {
        let trimmed = text.trim();
        if trimmed.len() == text.len() {
            text
        } else {
            trimmed.to_string()
        }
    } else {
        text
    };
    if !options.normalize {
        return text;
    }
    let mut normalized = String::with_capacity(text.len());
    let mut in_space = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !in_space {
                normalized.push(' ');
            }
            in_space = true;
        } else {
            normalized.push(c);
            in_space = false;
        }
    }
    normalized
}

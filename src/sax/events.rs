//! SAX Event Types
//!
//! Payloads delivered to a [`SaxHandler`], and the owned [`Event`] form
//! used when events are collected for later consumption.

use super::error::ParseError;

/// Namespace-qualified name, present only in xmlns mode
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QualifiedName {
    pub prefix: String,
    pub local: String,
    pub uri: String,
}

/// An attribute as reported by `attribute` and stored on its [`Tag`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
    /// Prefix, local part and resolved URI (xmlns mode only)
    pub qualified: Option<QualifiedName>,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Attribute {
            name: name.into(),
            value: value.into(),
            qualified: None,
        }
    }
}

/// An element start tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    /// Tag name, case-folded in loose mode
    pub name: String,
    /// Attributes in document order, duplicates dropped
    pub attributes: Vec<Attribute>,
    pub self_closing: bool,
    /// Prefix, local part and resolved URI (xmlns mode only)
    pub qualified: Option<QualifiedName>,
}

impl Tag {
    pub fn new(name: impl Into<String>) -> Self {
        Tag {
            name: name.into(),
            attributes: Vec::new(),
            self_closing: false,
            qualified: None,
        }
    }

    /// Look up an attribute value by name
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Whether an attribute of this name was already recorded
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.iter().any(|a| a.name == name)
    }
}

/// `<?name body?>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessingInstruction {
    pub name: String,
    pub body: String,
}

/// A prefix binding entering or leaving scope
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceBinding {
    /// Empty for the default namespace
    pub prefix: String,
    pub uri: String,
}

/// Receiver of parser events
///
/// Every method defaults to a no-op, so a handler implements only the
/// events it cares about. Text and node events arrive in document order;
/// pending text is always flushed before the next node event.
pub trait SaxHandler {
    /// The parser was constructed or reset
    fn ready(&mut self) {}

    /// A start tag is complete; its attributes were reported just before
    fn open_tag(&mut self, _tag: &Tag) {}

    /// An element closed (explicitly, by recovery, or because it was self-closing)
    fn close_tag(&mut self, _name: &str) {}

    fn attribute(&mut self, _attribute: &Attribute) {}

    fn text(&mut self, _text: &str) {}

    fn open_cdata(&mut self) {}

    fn cdata(&mut self, _data: &str) {}

    fn close_cdata(&mut self) {}

    fn comment(&mut self, _comment: &str) {}

    /// Doctype body, everything between `<!DOCTYPE` and `>`
    fn doctype(&mut self, _doctype: &str) {}

    /// `<!...>` that is not a doctype, comment or CDATA section
    fn sgml_declaration(&mut self, _declaration: &str) {}

    fn processing_instruction(&mut self, _pi: &ProcessingInstruction) {}

    fn open_namespace(&mut self, _binding: &NamespaceBinding) {}

    fn close_namespace(&mut self, _binding: &NamespaceBinding) {}

    /// Raw `<script>` body (loose mode only)
    fn script(&mut self, _script: &str) {}

    fn error(&mut self, _error: &ParseError) {}

    /// `end()` finished; the parser is closed until reset
    fn end(&mut self) {}
}

/// Handler that ignores every event
impl SaxHandler for () {}

impl<H: SaxHandler + ?Sized> SaxHandler for &mut H {
    fn ready(&mut self) {
        (**self).ready()
    }
    fn open_tag(&mut self, tag: &Tag) {
        (**self).open_tag(tag)
    }
    fn close_tag(&mut self, name: &str) {
        (**self).close_tag(name)
    }
    fn attribute(&mut self, attribute: &Attribute) {
        (**self).attribute(attribute)
    }
    fn text(&mut self, text: &str) {
        (**self).text(text)
    }
    fn open_cdata(&mut self) {
        (**self).open_cdata()
    }
    fn cdata(&mut self, data: &str) {
        (**self).cdata(data)
    }
    fn close_cdata(&mut self) {
        (**self).close_cdata()
    }
    fn comment(&mut self, comment: &str) {
        (**self).comment(comment)
    }
    fn doctype(&mut self, doctype: &str) {
        (**self).doctype(doctype)
    }
    fn sgml_declaration(&mut self, declaration: &str) {
        (**self).sgml_declaration(declaration)
    }
    fn processing_instruction(&mut self, pi: &ProcessingInstruction) {
        (**self).processing_instruction(pi)
    }
    fn open_namespace(&mut self, binding: &NamespaceBinding) {
        (**self).open_namespace(binding)
    }
    fn close_namespace(&mut self, binding: &NamespaceBinding) {
        (**self).close_namespace(binding)
    }
    fn script(&mut self, script: &str) {
        (**self).script(script)
    }
    fn error(&mut self, error: &ParseError) {
        (**self).error(error)
    }
    fn end(&mut self) {
        (**self).end()
    }
}

/// Owned form of every handler callback
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Ready,
    OpenTag(Tag),
    CloseTag(String),
    Attribute(Attribute),
    Text(String),
    OpenCData,
    CData(String),
    CloseCData,
    Comment(String),
    Doctype(String),
    SgmlDeclaration(String),
    ProcessingInstruction(ProcessingInstruction),
    OpenNamespace(NamespaceBinding),
    CloseNamespace(NamespaceBinding),
    Script(String),
    Error(ParseError),
    End,
}

impl Event {
    #[inline]
    pub fn is_open_tag(&self) -> bool {
        matches!(self, Event::OpenTag(_))
    }

    #[inline]
    pub fn is_close_tag(&self) -> bool {
        matches!(self, Event::CloseTag(_))
    }

    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self, Event::Text(_))
    }

    #[inline]
    pub fn is_error(&self) -> bool {
        matches!(self, Event::Error(_))
    }

    /// Element name for open and close events
    pub fn element_name(&self) -> Option<&str> {
        match self {
            Event::OpenTag(tag) => Some(&tag.name),
            Event::CloseTag(name) => Some(name),
            _ => None,
        }
    }

    /// Replay this event into a handler
    pub fn dispatch<H: SaxHandler + ?Sized>(&self, handler: &mut H) {
        match self {
            Event::Ready => handler.ready(),
            Event::OpenTag(tag) => handler.open_tag(tag),
            Event::CloseTag(name) => handler.close_tag(name),
            Event::Attribute(attr) => handler.attribute(attr),
            Event::Text(text) => handler.text(text),
            Event::OpenCData => handler.open_cdata(),
            Event::CData(data) => handler.cdata(data),
            Event::CloseCData => handler.close_cdata(),
            Event::Comment(comment) => handler.comment(comment),
            Event::Doctype(doctype) => handler.doctype(doctype),
            Event::SgmlDeclaration(decl) => handler.sgml_declaration(decl),
            Event::ProcessingInstruction(pi) => handler.processing_instruction(pi),
            Event::OpenNamespace(binding) => handler.open_namespace(binding),
            Event::CloseNamespace(binding) => handler.close_namespace(binding),
            Event::Script(script) => handler.script(script),
            Event::Error(err) => handler.error(err),
            Event::End => handler.end(),
        }
    }
}

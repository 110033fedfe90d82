//! XML Node representation
//!
//! Uses NodeId (u32) for compact node references into the document arena.

/// Compact node identifier (index into arena)
pub type NodeId = u32;

/// Type of XML node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Document root
    Document,
    /// Element node
    Element,
    /// Text content
    Text,
    /// CDATA section
    CData,
    /// Comment
    Comment,
    /// Processing instruction
    ProcessingInstruction,
}

/// A node in the arena
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlNode {
    pub kind: NodeKind,
    /// Parent node (None for the document node and for detached nodes)
    pub parent: Option<NodeId>,
    /// Children in document order
    pub children: Vec<NodeId>,
    /// Element or PI name; empty for other kinds
    pub name: String,
    /// Character data of text, CDATA, comment and PI nodes
    pub value: String,
    /// Element attributes in document order
    pub attributes: Vec<(String, String)>,
}

impl XmlNode {
    fn with_kind(kind: NodeKind) -> Self {
        XmlNode {
            kind,
            parent: None,
            children: Vec::new(),
            name: String::new(),
            value: String::new(),
            attributes: Vec::new(),
        }
    }

    /// Create a new document root node
    pub fn document() -> Self {
        Self::with_kind(NodeKind::Document)
    }

    /// Create a new element node
    pub fn element(name: impl Into<String>) -> Self {
        XmlNode {
            name: name.into(),
            ..Self::with_kind(NodeKind::Element)
        }
    }

    /// Create a new text node
    pub fn text(value: impl Into<String>) -> Self {
        XmlNode {
            value: value.into(),
            ..Self::with_kind(NodeKind::Text)
        }
    }

    /// Create a new CDATA node
    pub fn cdata(value: impl Into<String>) -> Self {
        XmlNode {
            value: value.into(),
            ..Self::with_kind(NodeKind::CData)
        }
    }

    /// Create a new comment node
    pub fn comment(value: impl Into<String>) -> Self {
        XmlNode {
            value: value.into(),
            ..Self::with_kind(NodeKind::Comment)
        }
    }

    /// Create a processing instruction node
    pub fn processing_instruction(name: impl Into<String>, body: impl Into<String>) -> Self {
        XmlNode {
            name: name.into(),
            value: body.into(),
            ..Self::with_kind(NodeKind::ProcessingInstruction)
        }
    }

    #[inline]
    pub fn is_element(&self) -> bool {
        self.kind == NodeKind::Element
    }

    #[inline]
    pub fn is_text(&self) -> bool {
        self.kind == NodeKind::Text
    }

    #[inline]
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Attribute value by name
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

//! XML Document - Arena-based DOM representation
//!
//! Nodes live in a single arena and refer to each other by [`NodeId`].
//! Detaching a node (remove, or moving it under a new parent) leaves it in
//! the arena so outstanding ids stay valid.

use super::builder::TreeBuilder;
use super::node::{NodeId, NodeKind, XmlNode};
use crate::core::entities::{encode_attribute, encode_text};
use crate::sax::{ParseError, Parser, ParserOptions};
use thiserror::Error;

/// Failure of a tree edit that takes markup
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
    /// The fragment is not well-formed; carries the first error
    #[error("invalid fragment: {0}")]
    Parse(ParseError),
    /// The target is unknown or cannot hold children
    #[error("node {0} cannot take children")]
    InvalidParent(NodeId),
}

/// An XML document stored in arena format
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDocument {
    /// Arena of nodes; index 0 is the document node
    nodes: Vec<XmlNode>,
    /// Doctype body, if the input declared one
    doctype: Option<String>,
    /// Errors reported while building, in input order
    errors: Vec<ParseError>,
}

impl XmlDocument {
    /// Id of the document node
    pub const DOCUMENT: NodeId = 0;

    /// Create an empty document
    pub fn new() -> Self {
        XmlDocument {
            nodes: vec![XmlNode::document()],
            doctype: None,
            errors: Vec::new(),
        }
    }

    /// Parse a document in strict mode
    ///
    /// Well-formedness errors do not stop the build; they are available
    /// from [`errors`](Self::errors).
    pub fn parse(input: &str) -> Self {
        Self::parse_with_options(input, ParserOptions::strict())
    }

    /// Parse a document with explicit parser options
    pub fn parse_with_options(input: &str, options: ParserOptions) -> Self {
        let mut parser = Parser::new(options, TreeBuilder::new());
        // a fresh parser accepts its first write
        let _ = parser.write(input);
        parser.end();
        parser.into_handler().into_document()
    }

    /// Get node count
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get a node by ID
    #[inline]
    pub fn get_node(&self, id: NodeId) -> Option<&XmlNode> {
        self.nodes.get(id as usize)
    }

    #[inline]
    pub(crate) fn get_node_mut(&mut self, id: NodeId) -> Option<&mut XmlNode> {
        self.nodes.get_mut(id as usize)
    }

    /// First element child of the document node
    pub fn root_element_id(&self) -> Option<NodeId> {
        self.children(Self::DOCUMENT)
            .iter()
            .copied()
            .find(|&id| self.get_node(id).is_some_and(XmlNode::is_element))
    }

    /// Root element name
    pub fn root_name(&self) -> Option<&str> {
        self.root_element_id()
            .and_then(|id| self.get_node(id))
            .map(|node| node.name.as_str())
    }

    /// Children of a node in document order
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get_node(id)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get_node(id).and_then(|node| node.parent)
    }

    pub fn doctype(&self) -> Option<&str> {
        self.doctype.as_deref()
    }

    pub(crate) fn set_doctype(&mut self, doctype: &str) {
        self.doctype = Some(doctype.to_string());
    }

    /// Errors reported while the document was built
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    pub(crate) fn record_error(&mut self, error: ParseError) {
        self.errors.push(error);
    }

    /// Add a detached node to the arena
    pub fn add_node(&mut self, node: XmlNode) -> NodeId {
        let id = self.nodes.len() as NodeId;
        self.nodes.push(XmlNode { parent: None, ..node });
        id
    }

    /// Create a detached element
    pub fn create_element(&mut self, name: impl Into<String>) -> NodeId {
        self.add_node(XmlNode::element(name))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, value: impl Into<String>) -> NodeId {
        self.add_node(XmlNode::text(value))
    }

    /// Move `child` to the end of `parent`'s children
    ///
    /// Returns None when either id is unknown, `child` is the document node,
    /// or `child` is `parent` or one of its ancestors.
    pub fn append(&mut self, parent: NodeId, child: NodeId) -> Option<NodeId> {
        self.attach(parent, child, false)
    }

    /// Move `child` to the front of `parent`'s children
    pub fn prepend(&mut self, parent: NodeId, child: NodeId) -> Option<NodeId> {
        self.attach(parent, child, true)
    }

    fn attach(&mut self, parent: NodeId, child: NodeId, front: bool) -> Option<NodeId> {
        if child == Self::DOCUMENT || self.get_node(child).is_none() {
            return None;
        }
        // walk up from parent; meeting child would create a cycle
        let mut current = Some(parent);
        while let Some(id) = current {
            if id == child {
                return None;
            }
            current = self.get_node(id)?.parent;
        }

        if let Some(old_parent) = self.parent(child) {
            self.remove(old_parent, child);
        }
        let node = self.get_node_mut(parent)?;
        if front {
            node.children.insert(0, child);
        } else {
            node.children.push(child);
        }
        self.get_node_mut(child)?.parent = Some(parent);
        Some(child)
    }

    /// Child of `parent` at `index`
    pub fn child(&self, parent: NodeId, index: usize) -> Option<NodeId> {
        self.children(parent).get(index).copied()
    }

    /// Detach the child at `index`, returning its id
    pub fn remove_at(&mut self, parent: NodeId, index: usize) -> Option<NodeId> {
        let child = self.child(parent, index)?;
        self.remove(parent, child);
        Some(child)
    }

    /// Parse `xml` and append its top-level nodes to `parent`
    ///
    /// The fragment is parsed in strict mode and may hold several
    /// top-level elements. Returns the ids of the attached nodes in order.
    pub fn append_xml(&mut self, parent: NodeId, xml: &str) -> Result<Vec<NodeId>, DomError> {
        let ids = self.import_fragment(parent, xml)?;
        for &id in &ids {
            self.attach(parent, id, false);
        }
        Ok(ids)
    }

    /// Parse `xml` and insert its top-level nodes at the front of `parent`
    pub fn prepend_xml(&mut self, parent: NodeId, xml: &str) -> Result<Vec<NodeId>, DomError> {
        let ids = self.import_fragment(parent, xml)?;
        for &id in ids.iter().rev() {
            self.attach(parent, id, true);
        }
        Ok(ids)
    }

    /// Parse a fragment and copy its top-level subtrees into this arena, detached
    fn import_fragment(&mut self, parent: NodeId, xml: &str) -> Result<Vec<NodeId>, DomError> {
        let can_hold = self
            .get_node(parent)
            .is_some_and(|node| matches!(node.kind, NodeKind::Document | NodeKind::Element));
        if !can_hold {
            return Err(DomError::InvalidParent(parent));
        }

        let fragment = XmlDocument::parse(xml);
        if let Some(err) = fragment.errors().first() {
            return Err(DomError::Parse(err.clone()));
        }
        Ok(fragment
            .children(Self::DOCUMENT)
            .iter()
            .filter_map(|&id| self.import(&fragment, id))
            .collect())
    }

    /// Copy `root` and its descendants from `source`; the copy is detached
    fn import(&mut self, source: &XmlDocument, root: NodeId) -> Option<NodeId> {
        let copy = |node: &XmlNode| XmlNode {
            children: Vec::new(),
            ..node.clone()
        };
        let top = self.add_node(copy(source.get_node(root)?));
        let mut stack = vec![(root, top)];
        while let Some((from, to)) = stack.pop() {
            for &child in source.children(from) {
                let Some(node) = source.get_node(child) else {
                    continue;
                };
                let id = self.add_node(copy(node));
                self.get_node_mut(id)?.parent = Some(to);
                self.get_node_mut(to)?.children.push(id);
                stack.push((child, id));
            }
        }
        Some(top)
    }

    /// Position of `child` among `parent`'s children
    pub fn index_of(&self, parent: NodeId, child: NodeId) -> Option<usize> {
        self.children(parent).iter().position(|&id| id == child)
    }

    /// Detach `child` from `parent`; false if it was not a child
    pub fn remove(&mut self, parent: NodeId, child: NodeId) -> bool {
        let Some(idx) = self.index_of(parent, child) else {
            return false;
        };
        if let Some(node) = self.get_node_mut(parent) {
            node.children.remove(idx);
        }
        if let Some(node) = self.get_node_mut(child) {
            node.parent = None;
        }
        true
    }

    /// Attribute value by name
    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.get_node(id).and_then(|node| node.attribute(name))
    }

    /// Set an attribute, replacing an existing value; false for unknown or non-element ids
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: impl Into<String>) -> bool {
        let Some(node) = self.get_node_mut(id).filter(|node| node.is_element()) else {
            return false;
        };
        let value = value.into();
        match node.attributes.iter_mut().find(|(n, _)| n == name) {
            Some(attr) => attr.1 = value,
            None => node.attributes.push((name.to_string(), value)),
        }
        true
    }

    /// Concatenated text and CDATA of a node and its descendants
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        let mut stack = vec![id];
        while let Some(id) = stack.pop() {
            let Some(node) = self.get_node(id) else {
                continue;
            };
            match node.kind {
                NodeKind::Text | NodeKind::CData => out.push_str(&node.value),
                NodeKind::Document | NodeKind::Element => {
                    stack.extend(node.children.iter().rev());
                }
                NodeKind::Comment | NodeKind::ProcessingInstruction => {}
            }
        }
        out
    }

    /// Serialize the whole document
    pub fn to_xml(&self) -> String {
        self.node_to_xml(Self::DOCUMENT)
    }

    /// Serialize one node and its subtree
    pub fn node_to_xml(&self, id: NodeId) -> String {
        enum Step {
            Enter(NodeId),
            Leave(NodeId),
        }

        let mut out = String::new();
        let mut stack = vec![Step::Enter(id)];
        while let Some(step) = stack.pop() {
            let id = match step {
                Step::Enter(id) => id,
                Step::Leave(id) => {
                    if let Some(node) = self.get_node(id) {
                        out.push_str("</");
                        out.push_str(&node.name);
                        out.push('>');
                    }
                    continue;
                }
            };
            let Some(node) = self.get_node(id) else {
                continue;
            };
            match node.kind {
                NodeKind::Document => {
                    stack.extend(node.children.iter().rev().map(|&c| Step::Enter(c)));
                }
                NodeKind::Element => {
                    out.push('<');
                    out.push_str(&node.name);
                    for (name, value) in &node.attributes {
                        out.push(' ');
                        out.push_str(name);
                        out.push_str("=\"");
                        out.push_str(&encode_attribute(value));
                        out.push('"');
                    }
                    if node.children.is_empty() {
                        out.push_str("/>");
                    } else {
                        out.push('>');
                        stack.push(Step::Leave(id));
                        stack.extend(node.children.iter().rev().map(|&c| Step::Enter(c)));
                    }
                }
                NodeKind::Text => out.push_str(&encode_text(&node.value)),
                NodeKind::CData => {
                    out.push_str("<![CDATA[");
                    out.push_str(&node.value);
                    out.push_str("]]>");
                }
                NodeKind::Comment => {
                    out.push_str("<!--");
                    out.push_str(&node.value);
                    out.push_str("-->");
                }
                NodeKind::ProcessingInstruction => {
                    out.push_str("<?");
                    out.push_str(&node.name);
                    if !node.value.is_empty() {
                        out.push(' ');
                        out.push_str(&node.value);
                    }
                    out.push_str("?>");
                }
            }
        }
        out
    }
}

impl Default for XmlDocument {
    fn default() -> Self {
        Self::new()
    }
}

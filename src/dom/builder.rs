//! Tree Builder
//!
//! SaxHandler that assembles an [`XmlDocument`] as events arrive. The
//! insertion point follows open and close events; errors are recorded on
//! the document and never stop the build.

use super::document::XmlDocument;
use super::node::{NodeId, XmlNode};
use crate::sax::{ParseError, ProcessingInstruction, SaxHandler, Tag};

/// Handler building an arena document
#[derive(Debug, Default)]
pub struct TreeBuilder {
    doc: XmlDocument,
    /// Current insertion point
    cursor: NodeId,
    /// CDATA node receiving `cdata` pieces
    open_cdata: Option<NodeId>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        TreeBuilder {
            doc: XmlDocument::new(),
            cursor: XmlDocument::DOCUMENT,
            open_cdata: None,
        }
    }

    pub fn document(&self) -> &XmlDocument {
        &self.doc
    }

    pub fn into_document(self) -> XmlDocument {
        self.doc
    }

    fn insert(&mut self, node: XmlNode) -> NodeId {
        let id = self.doc.add_node(node);
        let attached = self.doc.append(self.cursor, id);
        debug_assert!(attached.is_some(), "insertion point {} rejected a child", self.cursor);
        id
    }
}

impl SaxHandler for TreeBuilder {
    fn ready(&mut self) {
        *self = TreeBuilder::new();
    }

    fn open_tag(&mut self, tag: &Tag) {
        let mut element = XmlNode::element(tag.name.as_str());
        element.attributes = tag
            .attributes
            .iter()
            .map(|attr| (attr.name.clone(), attr.value.clone()))
            .collect();
        self.cursor = self.insert(element);
    }

    fn close_tag(&mut self, _name: &str) {
        self.cursor = self.doc.parent(self.cursor).unwrap_or(XmlDocument::DOCUMENT);
    }

    fn text(&mut self, text: &str) {
        // pieces of one run of text arrive back to back; keep them in one node
        if let Some(&last) = self.doc.children(self.cursor).last() {
            if let Some(node) = self.doc.get_node_mut(last).filter(|n| n.is_text()) {
                node.value.push_str(text);
                return;
            }
        }
        self.insert(XmlNode::text(text));
    }

    fn open_cdata(&mut self) {
        self.open_cdata = Some(self.insert(XmlNode::cdata("")));
    }

    fn cdata(&mut self, data: &str) {
        if let Some(node) = self.open_cdata.and_then(|id| self.doc.get_node_mut(id)) {
            node.value.push_str(data);
        }
    }

    fn close_cdata(&mut self) {
        self.open_cdata = None;
    }

    fn comment(&mut self, comment: &str) {
        self.insert(XmlNode::comment(comment));
    }

    fn doctype(&mut self, doctype: &str) {
        self.doc.set_doctype(doctype);
    }

    fn processing_instruction(&mut self, pi: &ProcessingInstruction) {
        self.insert(XmlNode::processing_instruction(pi.name.as_str(), pi.body.as_str()));
    }

    fn error(&mut self, error: &ParseError) {
        self.doc.record_error(error.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sax::{Parser, ParserOptions};

    fn build(input: &str, options: ParserOptions) -> XmlDocument {
        let mut parser = Parser::new(options, TreeBuilder::new());
        parser.write(input).unwrap();
        parser.end();
        parser.into_handler().into_document()
    }

    #[test]
    fn test_split_text_is_merged() {
        let body = "x".repeat(100);
        let doc = build(
            &format!("<a>{body}</a>"),
            ParserOptions::strict().max_buffer_length(Some(16)),
        );
        let a = doc.root_element_id().unwrap();
        assert_eq!(doc.children(a).len(), 1);
        assert_eq!(doc.text_content(a), body);
    }

    #[test]
    fn test_split_cdata_is_one_node() {
        let body = "c".repeat(60);
        let doc = build(
            &format!("<a><![CDATA[{body}]]></a>"),
            ParserOptions::strict().max_buffer_length(Some(16)),
        );
        let a = doc.root_element_id().unwrap();
        assert_eq!(doc.children(a).len(), 1);
        assert_eq!(doc.get_node(doc.children(a)[0]).unwrap().value, body);
    }

    #[test]
    fn test_loose_recovery_shapes_tree() {
        let doc = build("<ul><li>one<li>two</ul>", ParserOptions::loose());
        assert_eq!(doc.to_xml(), "<UL><LI>one<LI>two</LI></LI></UL>");
    }

    #[test]
    fn test_every_node_is_attached() {
        let doc = build(
            "<a>t<!--c--><b x=\"1\"><![CDATA[d]]><?p q?></b></a>",
            ParserOptions::strict(),
        );
        assert!(doc.errors().is_empty());
        for id in 1..doc.node_count() as NodeId {
            let parent = doc.parent(id).unwrap();
            assert!(doc.index_of(parent, id).is_some());
        }
        assert_eq!(doc.node_count(), 7);
    }

    #[test]
    fn test_doctype_and_pi() {
        let doc = build("<?xml version=\"1.0\"?><!DOCTYPE r><r/>", ParserOptions::strict());
        assert_eq!(doc.doctype(), Some(" r"));
        assert_eq!(doc.to_xml(), "<?xml version=\"1.0\"?><r/>");
    }
}

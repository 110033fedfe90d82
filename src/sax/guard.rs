//! Buffer Guard
//!
//! Bounds the accumulation buffers. Checks are scheduled rather than run
//! per character: after each check the next one is placed at the earliest
//! position where any buffer could reach the limit.
//!
//! Lengths are measured in UTF-8 bytes, so the bound holds for memory use as
//! well as for the size of every emitted text, cdata or script piece. A
//! character adds at most four bytes to a buffer, which sets the schedule.

use super::error::ErrorKind;
use super::events::SaxHandler;
use super::parser::Parser;

/// Smallest limit the guard accepts
const MIN_BUFFER_LENGTH: usize = 10;

/// Widest UTF-8 encoding of a single character
const MAX_CHAR_WIDTH: usize = 4;

/// The limit actually enforced for a configured `max_buffer_length`
pub(crate) fn buffer_limit(limit: Option<usize>) -> Option<usize> {
    limit.map(|limit| limit.max(MIN_BUFFER_LENGTH))
}

/// Position of the next check, given the longest buffer still under the limit
pub(crate) fn next_check(position: usize, limit: Option<usize>, longest: usize) -> usize {
    let Some(limit) = limit else {
        return usize::MAX;
    };
    let headroom = limit.max(MIN_BUFFER_LENGTH).saturating_sub(longest);
    position.saturating_add((headroom / MAX_CHAR_WIDTH).max(1))
}

/// The accumulation buffers, one per construct being scanned
#[derive(Debug, Default)]
pub(crate) struct Buffers {
    pub comment: String,
    pub sgml_decl: String,
    pub text: String,
    pub tag_name: String,
    pub doctype: String,
    pub proc_inst_name: String,
    pub proc_inst_body: String,
    pub entity: String,
    pub attrib_name: String,
    pub attrib_value: String,
    pub cdata: String,
    pub script: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BufferKind {
    Comment,
    SgmlDecl,
    Text,
    TagName,
    Doctype,
    ProcInstName,
    ProcInstBody,
    Entity,
    AttribName,
    AttribValue,
    CData,
    Script,
}

impl BufferKind {
    pub const ALL: [BufferKind; 12] = [
        BufferKind::Comment,
        BufferKind::SgmlDecl,
        BufferKind::Text,
        BufferKind::TagName,
        BufferKind::Doctype,
        BufferKind::ProcInstName,
        BufferKind::ProcInstBody,
        BufferKind::Entity,
        BufferKind::AttribName,
        BufferKind::AttribValue,
        BufferKind::CData,
        BufferKind::Script,
    ];

    /// Name used in "Max buffer length exceeded" messages
    pub fn name(self) -> &'static str {
        match self {
            BufferKind::Comment => "comment",
            BufferKind::SgmlDecl => "sgmlDecl",
            BufferKind::Text => "textNode",
            BufferKind::TagName => "tagName",
            BufferKind::Doctype => "doctype",
            BufferKind::ProcInstName => "procInstName",
            BufferKind::ProcInstBody => "procInstBody",
            BufferKind::Entity => "entity",
            BufferKind::AttribName => "attribName",
            BufferKind::AttribValue => "attribValue",
            BufferKind::CData => "cdata",
            BufferKind::Script => "script",
        }
    }
}

impl Buffers {
    pub fn get(&self, kind: BufferKind) -> &str {
        match kind {
            BufferKind::Comment => &self.comment,
            BufferKind::SgmlDecl => &self.sgml_decl,
            BufferKind::Text => &self.text,
            BufferKind::TagName => &self.tag_name,
            BufferKind::Doctype => &self.doctype,
            BufferKind::ProcInstName => &self.proc_inst_name,
            BufferKind::ProcInstBody => &self.proc_inst_body,
            BufferKind::Entity => &self.entity,
            BufferKind::AttribName => &self.attrib_name,
            BufferKind::AttribValue => &self.attrib_value,
            BufferKind::CData => &self.cdata,
            BufferKind::Script => &self.script,
        }
    }

    pub fn clear(&mut self) {
        *self = Buffers::default();
    }
}

/// Split `data` into pieces of at most `max` bytes on char boundaries
pub(crate) fn split_bounded(data: &str, max: usize) -> Vec<&str> {
    let mut pieces = Vec::with_capacity(data.len() / max.max(1) + 1);
    let mut rest = data;
    while rest.len() > max {
        let mut cut = max;
        while cut > 0 && !rest.is_char_boundary(cut) {
            cut -= 1;
        }
        if cut == 0 {
            // max is below the width of the first char
            cut = rest.chars().next().map_or(rest.len(), char::len_utf8);
        }
        let (head, tail) = rest.split_at(cut);
        pieces.push(head);
        rest = tail;
    }
    if !rest.is_empty() {
        pieces.push(rest);
    }
    pieces
}

impl<H: SaxHandler> Parser<H> {
    /// Enforce the buffer limit and schedule the next check
    pub(super) fn check_buffer_length(&mut self) {
        let Some(max_allowed) = buffer_limit(self.options.max_buffer_length) else {
            self.buffer_check_position = usize::MAX;
            return;
        };
        let mut max_actual = 0;

        for kind in BufferKind::ALL {
            let len = self.buffers.get(kind).len();
            if len < max_allowed {
                max_actual = max_actual.max(len);
                continue;
            }
            match kind {
                BufferKind::Text => {
                    log::debug!(target: "rustysax", "flushing {len} bytes of text at offset {}", self.position);
                    self.close_text();
                }
                BufferKind::CData => {
                    log::debug!(target: "rustysax", "flushing {len} bytes of cdata at offset {}", self.position);
                    let data = std::mem::take(&mut self.buffers.cdata);
                    self.close_text();
                    for piece in split_bounded(&data, max_allowed) {
                        self.handler.cdata(piece);
                    }
                }
                BufferKind::Script => {
                    log::debug!(target: "rustysax", "flushing {len} bytes of script at offset {}", self.position);
                    let script = std::mem::take(&mut self.buffers.script);
                    self.close_text();
                    for piece in split_bounded(&script, max_allowed) {
                        self.handler.script(piece);
                    }
                }
                // Reported again at each later check while it stays oversized
                _ => self.strict_fail(
                    ErrorKind::BufferOverrun,
                    format!("Max buffer length exceeded: {}", kind.name()),
                ),
            }
        }

        self.buffer_check_position = next_check(self.position, Some(max_allowed), max_actual);
    }
}

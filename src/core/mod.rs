//! Core XML primitives
//!
//! Building blocks shared by the tokenizer and the tree builder:
//! - Chars: XML character classes (whitespace, name start, name)
//! - Entities: named entity table, reference decoding, output escaping
//! - Namespace: arena of prefix scopes and qualified-name splitting

pub mod chars;
pub mod entities;
pub mod namespace;

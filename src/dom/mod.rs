//! DOM Module - Arena-based XML Document
//!
//! A small tree built from tokenizer events:
//! - Arena allocation for nodes
//! - NodeId (u32) indices instead of pointers
//! - Append/prepend/remove (nodes or raw XML) and attribute edits
//! - Serialization back to XML text

pub mod builder;
pub mod document;
pub mod node;

pub use builder::TreeBuilder;
pub use document::{DomError, XmlDocument};
pub use node::{NodeId, NodeKind, XmlNode};

//! Reader for the MapleCode binary document format.
//!
//! `Document::read_from_data` decodes a byte slice into an immutable
//! `Document`; `Node`/`NodeRange`/`Argument` are non-owning cursor views
//! borrowed from it for traversal and typed field access. Every decode
//! operation is total: malformed input yields a typed `Error` rather than
//! a panic.

mod argument;
mod document;
mod error;
mod layout;
mod node;
mod nodetype;
mod strtab;
mod width;

pub use argument::Argument;
pub use document::{Document, Widths};
pub use error::{Error, Result};
pub use node::{Node, NodeIter, NodeRange};
pub use nodetype::{NodeArgumentKind, NodeType};

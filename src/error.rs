//! Error types returned by the MapleCode decoder.
//!
//! Every failure mode is non-recoverable: decoding aborts at the first one
//! and no partial `Document` is ever returned.

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("declared table lengths exceed the supplied byte count")]
    TruncatedPayload,
    #[error("nodes are declared but no type dictionary is available")]
    MissingTypeList,
    #[error("both an inline and an external type dictionary were supplied")]
    DuplicateTypeList,
    #[error("an external type dictionary's widths do not match this document's widths")]
    WidthMismatch,
    #[error("a string in the data region is not NUL-terminated before the end of the region")]
    InvalidString,
    #[error("a type record has an out-of-range name index, data offset, or argument kind")]
    InvalidTypeDef,
    #[error("a node references a string index outside the string table")]
    InvalidStringIndex,
    #[error("a node references a type index outside the type dictionary")]
    InvalidNodeType,
    #[error("a node's declared extent exceeds the node table")]
    InvalidNodeData,
    #[error("parent search could not place the target node in the hierarchy")]
    InvalidHierarchy,
    #[error("a typed argument accessor was invoked for the wrong argument kind")]
    WrongArgumentKind,
    #[error("a typed data blob's length is not a multiple of the element size")]
    DataAlignment,
}

pub type Result<T> = std::result::Result<T, Error>;

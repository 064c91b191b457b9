//! Error types for the Huffman codec.
//!
//! All operations return structured errors rather than panicking. Every way
//! an archive can be structurally wrong is a [`LayoutError`]; the crate-level
//! [`Error`] wraps it together with caller mistakes and sink I/O failures.

use std::fmt;
use thiserror::Error;

/// Top-level error type for all codec operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The input is not a valid archive (or not a valid entity stream)
    #[error("malformed input: {0}")]
    Layout(#[from] LayoutError),

    /// Caller asked for an entity width the format does not support
    #[error("unsupported entity width {0}: expected 1, 2, 4 or 8")]
    UnsupportedWidth(u8),

    /// Second pass over the input met an entity the first pass never saw
    #[error("entity {0} missing from code table: input changed between passes")]
    UnknownEntity(String),

    /// A count grew past what its header field can hold
    #[error("{field} does not fit in the layout header")]
    Capacity { field: &'static str },

    /// Writing to the output sink failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Archive sections, used to say where a layout error happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Header,
    Entities,
    Tree,
    Data,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Section::Header => "header",
            Section::Entities => "entity",
            Section::Tree => "tree",
            Section::Data => "data",
        };
        f.write_str(name)
    }
}

/// Malformed-input errors.
///
/// The format carries no redundancy, so each variant names the first
/// inconsistency the decoder ran into.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    /// A fixed-width read ran out of bytes
    #[error("unexpected end of stream: needed {wanted} bytes, got {got}")]
    UnexpectedEnd { wanted: usize, got: usize },

    /// The stream ended before a section's declared length
    #[error("{section} section truncated: header declares {declared} bytes, stream ended after {read}")]
    Truncated {
        section: Section,
        declared: u64,
        read: u64,
    },

    /// Leaf marker seen while no branch was open
    #[error("unexpected leaf in tree section at bit {bit}")]
    UnexpectedLeaf { bit: u64 },

    /// Tree section references more leaves than were supplied
    #[error("missing leaf: tree section needs more than {available} entities")]
    MissingLeaf { available: usize },

    /// A child was attached to a branch that already has two
    #[error("invalid tree: branch already full at bit {bit}")]
    BranchFull { bit: u64 },

    /// Number of leaves placed in the tree disagrees with the header
    #[error("entity count mismatch: header declares {declared}, tree placed {placed} of {supplied} supplied")]
    EntityCountMismatch {
        declared: u32,
        placed: u64,
        supplied: usize,
    },

    /// Tree section ended with branches still open (or none at all)
    #[error("incomplete tree: {open} branches left open")]
    IncompleteTree { open: usize },

    /// Data section steered the walk off the tree
    #[error("invalid code in data section at bit {bit}")]
    InvalidCode { bit: u64 },

    /// Data section ended in the middle of a code
    #[error("data section ends inside a code")]
    TruncatedCode,

    /// Header carries an unknown layout version
    #[error("unsupported layout version {0}")]
    UnsupportedVersion(u8),

    /// Header carries an entity size the format does not define
    #[error("unsupported entity size {0} in header")]
    UnsupportedEntitySize(u8),

    /// Header declares no entities but non-empty sections
    #[error("empty archive declares {tree} tree bytes and {data} data bytes")]
    NonEmptySections { tree: u32, data: u64 },

    /// Bytes left over after the data section
    #[error("{0} trailing bytes after data section")]
    TrailingBytes(usize),
}

/// Type alias for Result with our Error type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_error_message_names_section() {
        let err: Error = LayoutError::Truncated {
            section: Section::Tree,
            declared: 4,
            read: 3,
        }
        .into();
        assert_eq!(
            err.to_string(),
            "malformed input: tree section truncated: header declares 4 bytes, stream ended after 3"
        );
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::WriteZero, "sink closed");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }
}

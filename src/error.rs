//! Error types.

use crate::tree::NodeKind;

/// An invalid UTF-8 sequence found in the input.
///
/// Parsing never stops on these: the sequence is replaced by U+FFFD and the
/// location is recorded on the [`Document`](crate::Document).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
#[error("malformed UTF-8 ({len} byte(s)) at offset {offset}")]
pub struct MalformedUnicode {
    /// Byte offset of the sequence in the original input.
    pub offset: usize,
    /// Number of bytes that were replaced.
    pub len: usize,
}

/// A tree edit that would break the document structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum TreeError {
    #[error("a {parent:?} node cannot contain a {child:?} node")]
    CannotContain { parent: NodeKind, child: NodeKind },

    #[error("a node cannot be moved inside itself")]
    Cycle,

    #[error("the node has no parent")]
    NoParent,
}

/// Errors surfaced to callers.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Input contained bytes that are not valid UTF-8.
    #[error(transparent)]
    MalformedUnicode(#[from] MalformedUnicode),

    /// A construction or rewrite step was rejected.
    #[error("invalid tree edit: {0}")]
    InvalidTree(#[from] TreeError),

    /// The output sink rejected rendered HTML.
    #[error("failed to write rendered HTML")]
    RenderSink(#[from] std::io::Error),
}

use decor_syntax::NodeKind;
use text_size::{TextRange, TextSize};

/// Failure of a conversion in either direction. No partial tree is ever
/// returned alongside one.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("unsupported node kind `{kind}` at {range:?}")]
    UnsupportedNodeKind { kind: NodeKind, range: TextRange },
    #[error("invalid range: {left:?} is after {right:?}")]
    InvalidRange { left: TextSize, right: TextSize },
    #[error("inconsistent markup on `{node}` at trivia {index}: {reason}")]
    InconsistentMarkup { node: &'static str, index: usize, reason: &'static str },
    #[error("expected {expected}, found {found}")]
    AssertionMismatch { expected: &'static str, found: &'static str },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

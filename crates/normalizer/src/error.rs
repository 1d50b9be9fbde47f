use settrie::SetTrieError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("Normalizer error: invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Normalizer error: unknown attribute '{0}'")]
    UnknownAttribute(String),
    #[error("Normalizer error: attribute '{0}' declared twice")]
    DuplicateAttribute(String),
    #[error("Normalizer error: invalid state: {0}")]
    InvalidState(String),
    #[error("Normalizer error: cannot read '{path}': {e}")]
    Io { path: String, e: String },
    #[error("Normalizer error: malformed schema document: {0}")]
    Document(String),
    #[error(transparent)]
    SetTrie(#[from] SetTrieError),
}

/// Sample rows contradicting a declared multivalued dependency.
///
/// Reported as a warning only; the dependency is kept.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MvdViolation {
    #[error(
        "MVD violation: block {block:?} holds {size} rows, not a multiple of its run length {run}"
    )]
    UnevenPartition {
        block: Vec<String>,
        size: usize,
        run: usize,
    },
    #[error("MVD violation: block {block:?} mixes right-hand values {first:?} and {second:?} in one partition")]
    MixedPartition {
        block: Vec<String>,
        first: Vec<String>,
        second: Vec<String>,
    },
    #[error("MVD violation: block {block:?} repeats right-hand values {values:?} in adjacent partitions")]
    RepeatedPartition {
        block: Vec<String>,
        values: Vec<String>,
    },
    #[error("MVD violation: block {block:?} pairs {left:?} and {right:?} with different remaining values")]
    Dependent {
        block: Vec<String>,
        left: Vec<String>,
        right: Vec<String>,
    },
}

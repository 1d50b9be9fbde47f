use normalizer::NormalizeError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EmitError {
    #[error("Emitter error: table index {0} out of range")]
    UnknownTable(usize),
    #[error("Emitter error: cannot write '{path}': {e}")]
    Io { path: String, e: String },
    #[error(transparent)]
    Normalize(#[from] NormalizeError),
}

use thiserror::Error;

/// Failures raised by set trie containers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SetTrieError {
    #[error("Set trie error: invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Set trie error: set {0} not found")]
    NotFound(String),
    #[error("Set trie error: invalid state: {0}")]
    InvalidState(String),
}

impl SetTrieError {
    /// Cursor was created against an older revision of its container.
    pub(crate) fn stale_cursor(captured: u64, current: u64) -> Self {
        Self::InvalidState(format!(
            "container modified during enumeration (cursor revision {}, container revision {})",
            captured, current
        ))
    }
}

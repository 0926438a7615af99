use std::path::PathBuf;

use thiserror::Error;

/// Failure taxonomy of a collection operation.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("cannot read {}: {source}", path.display())]
    Read { path: PathBuf, source: std::io::Error },
    #[error("malformed JSON in {}: {source}", path.display())]
    Parse { path: PathBuf, source: serde_json::Error },
    #[error("corrupt collection {}: {reason}", path.display())]
    CorruptCollection { path: PathBuf, reason: String },
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("record {0} not found")]
    NotFound(String),
    #[error("cannot write {}: {reason}", path.display())]
    Write { path: PathBuf, reason: String },
}

impl StoreError {
    pub fn invalid(msg: impl Into<String>) -> Self { Self::InvalidInput(msg.into()) }

    /// Short stable name, used as a metrics label.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Read { .. } => "read_error",
            Self::Parse { .. } => "parse_error",
            Self::CorruptCollection { .. } => "corrupt_collection",
            Self::InvalidInput(_) => "invalid_input",
            Self::NotFound(_) => "not_found",
            Self::Write { .. } => "write_error",
        }
    }

    /// Client-caused failures (4xx) as opposed to storage failures (5xx).
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidInput(_) | Self::NotFound(_))
    }
}

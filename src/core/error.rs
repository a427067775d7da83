use crate::core::TodoId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TodoError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed collection blob: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid storage key '{0}'")]
    InvalidKey(String),

    #[error("Duplicate todo id {0} in collection")]
    DuplicateId(TodoId),

    #[error("No free todo id left in the collection")]
    IdSpaceExhausted,

    #[error("Lock error: {0}")]
    LockError(String),
}

pub type Result<T> = std::result::Result<T, TodoError>;

impl<T> From<std::sync::PoisonError<T>> for TodoError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        Self::LockError(err.to_string())
    }
}

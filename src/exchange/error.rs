use thiserror::Error;
use uuid::Uuid;

/// Reasons a choice list cannot be submitted.
///
/// These are recovered locally (inline notice plus shake) and never cross the
/// builder boundary as an `Err`.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Select at least one university before submitting")]
    EmptySelection,

    #[error("Choice ranks are out of order, please review your list")]
    NonContiguousRank,
}

#[derive(Error, Debug)]
pub enum BuilderError {
    #[error("University not found: {0}")]
    UniversityNotFound(Uuid),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Api Error: {0}")]
    Api(String),
}

pub type Result<T> = std::result::Result<T, BuilderError>;

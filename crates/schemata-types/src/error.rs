use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("Type {0} is not supported")]
    UnsupportedKind(String),

    #[error("invalid date: {0}")]
    InvalidDate(String),
}

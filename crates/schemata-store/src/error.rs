/// Errors from store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// An update targeted a key that holds no entry.
    #[error("entry {key} of {model} not found")]
    NotFound { model: String, key: String },

    /// A create targeted a key that already holds an entry.
    #[error("entry {key} of {model} already exists")]
    AlreadyExists { model: String, key: String },

    /// Failure reported by the storage backend itself.
    #[error("store backend error: {0}")]
    Backend(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_model_and_key() {
        let err = StoreError::AlreadyExists {
            model: "user".into(),
            key: "42".into(),
        };
        assert_eq!(err.to_string(), "entry 42 of user already exists");

        let err = StoreError::Backend("disk full".into());
        assert_eq!(err.to_string(), "store backend error: disk full");
    }
}

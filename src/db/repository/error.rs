//! Error types for repository operations.

/// Result type for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Error type for repository operations.
///
/// Variants are tagged at the raise site so callers can classify a failure
/// without inspecting message text. `NotFound` carries the exact message the
/// client sees; the other variants carry internal detail for the logs.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Requested entity does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Connection pool or backing store connectivity failure.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query execution failure.
    #[error("Query error: {0}")]
    Query(String),

    /// Configuration or initialization failure.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Unexpected failure with no better classification.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RepositoryError {
    /// Whether retrying the operation could succeed.
    ///
    /// Only connectivity failures are considered transient.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Connection(_))
    }
}

#[cfg(feature = "postgres-repo")]
impl From<diesel::result::Error> for RepositoryError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => {
                RepositoryError::NotFound("Record not found".to_string())
            }
            diesel::result::Error::DatabaseError(kind, info) => RepositoryError::Query(format!(
                "{} (kind={:?})",
                info.message(),
                kind
            )),
            diesel::result::Error::DeserializationError(e) => {
                RepositoryError::Internal(format!("Deserialization error: {}", e))
            }
            diesel::result::Error::SerializationError(e) => {
                RepositoryError::Internal(format!("Serialization error: {}", e))
            }
            other => RepositoryError::Query(other.to_string()),
        }
    }
}

#[cfg(feature = "postgres-repo")]
impl From<diesel::r2d2::PoolError> for RepositoryError {
    fn from(err: diesel::r2d2::PoolError) -> Self {
        RepositoryError::Connection(err.to_string())
    }
}

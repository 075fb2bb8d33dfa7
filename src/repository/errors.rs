use thiserror::Error;

/// Result type returned by every repository operation.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Errors surfaced by the storage layer.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The addressed row does not exist.
    #[error("entity not found")]
    NotFound,
    /// A conditional update lost against a concurrent write.
    #[error("entity was modified concurrently")]
    Conflict,
    /// A uniqueness constraint was violated.
    #[error("entity already exists")]
    Duplicate,
    #[error("database error: {0}")]
    Database(diesel::result::Error),
    #[error("connection pool error: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),
}

impl From<diesel::result::Error> for RepositoryError {
    fn from(value: diesel::result::Error) -> Self {
        match value {
            diesel::result::Error::NotFound => RepositoryError::NotFound,
            diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::UniqueViolation,
                _,
            ) => RepositoryError::Duplicate,
            other => RepositoryError::Database(other),
        }
    }
}

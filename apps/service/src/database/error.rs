use thiserror::Error;

/// Failure talking to the backing status store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be reached at all (pool exhausted, connect failure).
    #[error("status store unavailable: {0}")]
    Unavailable(String),

    #[error("status store query failed: {0}")]
    Query(#[from] libsql::Error),

    /// A row was read but could not be decoded into a site record.
    #[error("corrupt site record: {0}")]
    Corrupt(String),
}

impl From<deadpool::managed::PoolError<libsql::Error>> for StoreError {
    fn from(error: deadpool::managed::PoolError<libsql::Error>) -> Self {
        match error {
            deadpool::managed::PoolError::Backend(inner) => StoreError::Query(inner),
            other => StoreError::Unavailable(other.to_string()),
        }
    }
}

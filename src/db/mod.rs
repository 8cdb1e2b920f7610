//! Persistent store plumbing shared by the blog and user repositories

pub mod pool;
pub mod schema;

pub use pool::{check_health, create_pool};
pub use schema::ensure_schema;

use std::future::Future;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("duplicate value for unique field {field}")]
    Duplicate { field: &'static str },

    #[error("store operation timed out: {operation}")]
    Timeout { operation: &'static str },
}

impl StoreError {
    /// Map an insert failure, turning unique violations into [`StoreError::Duplicate`].
    pub fn from_insert(err: sqlx::Error, field: &'static str) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                StoreError::Duplicate { field }
            }
            _ => StoreError::Database(err),
        }
    }
}

/// Run a store call under a deadline.
pub async fn with_deadline<T, F>(
    deadline: Duration,
    operation: &'static str,
    fut: F,
) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    match tokio::time::timeout(deadline, fut).await {
        Ok(result) => result.map_err(StoreError::from),
        Err(_) => Err(StoreError::Timeout { operation }),
    }
}

/// PostgreSQL `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";

/// Failure talking to the store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(sqlx::Error),

    /// A write tripped a unique constraint, named by `constraint`.
    #[error("Unique constraint violated: {constraint}")]
    Conflict { constraint: String },

    /// The store could not be reached. Raised by non-SQL stores.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
                return Self::Conflict {
                    constraint: db_err.constraint().unwrap_or("unknown").to_string(),
                };
            }
        }
        Self::Database(err)
    }
}

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Failed to connect to the database: {0}")]
    ConnectionError(#[source] sqlx::Error),

    #[error("Failed to query alert events: {0}")]
    QueryError(#[from] sqlx::Error),
}

/// How a failed alert query should be treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryFailure {
    /// A referenced table does not exist. This is an expected schema
    /// variant and the caller may retry with a query that avoids it.
    UndefinedRelation,
    /// Anything else.
    Fatal,
}

/// SQLSTATE for `undefined_table`.
pub const UNDEFINED_TABLE: &str = "42P01";

/// Classifies a PostgreSQL SQLSTATE code.
pub fn classify_sqlstate(code: Option<&str>) -> QueryFailure {
    match code {
        Some(UNDEFINED_TABLE) => QueryFailure::UndefinedRelation,
        _ => QueryFailure::Fatal,
    }
}

/// Classifies a driver error. Only server-reported errors carry a SQLSTATE.
pub fn classify(err: &sqlx::Error) -> QueryFailure {
    match err {
        sqlx::Error::Database(db_err) => classify_sqlstate(db_err.code().as_deref()),
        _ => QueryFailure::Fatal,
    }
}

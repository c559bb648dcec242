use std::path::PathBuf;

use rusqlite::ErrorCode;
use thiserror::Error;

/// Failures that abort store initialization.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("cannot reset store at {}: {source}", path.display())]
    StoreState {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("constraint violated while inserting into {table}: {source}")]
    ConstraintViolation {
        table: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

impl StoreError {
    /// Classify an insertion failure for `table`.
    pub(crate) fn on_insert(table: &'static str) -> impl Fn(rusqlite::Error) -> StoreError {
        move |source| match source.sqlite_error_code() {
            Some(ErrorCode::ConstraintViolation) => StoreError::ConstraintViolation { table, source },
            _ => StoreError::Sqlite(source),
        }
    }
}

/// Failure of a post-population reporting query. Never fatal.
#[derive(Error, Debug)]
#[error("diagnostic query `{query}` failed: {source}")]
pub struct DiagnosticError {
    pub query: &'static str,
    #[source]
    pub source: rusqlite::Error,
}

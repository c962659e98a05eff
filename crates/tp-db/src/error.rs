use thiserror::Error;

/// Errors surfaced by content store implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(sqlx::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A unique constraint rejected the write
    #[error("conflict: {0}")]
    Conflict(String),

    /// A foreign key pointed at a record that does not exist
    #[error("invalid reference: {0}")]
    InvalidReference(String),

    /// A stored counter would overflow its column
    #[error("out of range: {0}")]
    OutOfRange(String),
}

/// SQLSTATE `numeric_value_out_of_range`
const NUMERIC_OUT_OF_RANGE: &str = "22003";

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let Some(db_err) = err.as_database_error() {
            if db_err.is_unique_violation() {
                return Self::Conflict(db_err.message().to_string());
            }
            if db_err.is_foreign_key_violation() {
                return Self::InvalidReference(db_err.message().to_string());
            }
            if db_err.code().as_deref() == Some(NUMERIC_OUT_OF_RANGE) {
                return Self::OutOfRange(db_err.message().to_string());
            }
        }
        Self::Database(err)
    }
}

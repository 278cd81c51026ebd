use rusqlite::ErrorCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record {key} already exists in {table}")]
    AlreadyExists { table: String, key: String },

    #[error("cannot update field {field}: {reason}")]
    InvalidUpdate { field: String, reason: &'static str },

    #[error("stored document {key} in {table} is corrupt: {source}")]
    Corrupt {
        table: String,
        key: String,
        source: serde_json::Error,
    },

    #[error("failed to encode document: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("sqlite: {0}")]
    Sqlite(#[source] rusqlite::Error),

    #[error("store lock poisoned")]
    LockPoisoned,

    /// The store could not take the call in time, e.g. the writer lock
    /// stayed held past the busy timeout.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        match e.sqlite_error_code() {
            Some(ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked) => {
                Self::Unavailable(e.to_string())
            }
            _ => Self::Sqlite(e),
        }
    }
}

impl StoreError {
    pub fn invalid_update(field: &str, reason: &'static str) -> Self {
        Self::InvalidUpdate {
            field: field.to_string(),
            reason,
        }
    }
}

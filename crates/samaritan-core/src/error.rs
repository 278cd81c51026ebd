use samaritan_db::StoreError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid request: {0}")]
    Validation(String),

    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: String },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("{table}/{key} does not match the record shape: {source}")]
    Mapping {
        table: String,
        key: String,
        source: serde_json::Error,
    },

    #[error("failed to encode record: {0}")]
    Encode(#[from] serde_json::Error),

    /// The first step of a two-record action succeeded and the second did
    /// not. The completed step is not rolled back.
    #[error("help by {user_id} on issue {issue_id} half applied ({completed} done, {pending} failed): {source}")]
    PartiallyApplied {
        user_id: String,
        issue_id: String,
        completed: &'static str,
        pending: &'static str,
        source: Box<EngineError>,
    },
}

impl EngineError {
    pub fn not_found(kind: &'static str, id: &str) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}

//! Document store adapter.
//!
//! Every engine talks to storage through the [`Store`] trait: point lookup,
//! full-table scan with an optional filter and projection, overwrite put,
//! create-if-absent insert, and single-record update. No call is atomic with
//! any other call; callers compose multi-record actions themselves.

pub mod error;
pub mod expr;
pub mod memory;
pub mod migrations;
pub mod sqlite;

#[cfg(test)]
mod conformance;

pub use error::StoreError;
pub use expr::{Document, Filter, Projection, UpdateOp};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

pub type Result<T> = std::result::Result<T, StoreError>;

/// Single-record document storage.
///
/// Tables are created on first write. A record exists exactly when a document
/// is stored under its key; the contents of the document play no part in that.
pub trait Store: Send + Sync {
    /// Point lookup by key.
    fn get(&self, table: &str, key: &str) -> Result<Option<Document>>;

    /// Full-table scan. Cost is linear in the table size whatever the filter.
    /// An empty table yields an empty vector.
    fn scan(
        &self,
        table: &str,
        filter: Option<&Filter>,
        projection: Option<&Projection>,
    ) -> Result<Vec<Document>>;

    /// Overwrite put. Last writer wins.
    fn put(&self, table: &str, key: &str, document: Document) -> Result<()>;

    /// Create-if-absent put. Fails with [`StoreError::AlreadyExists`] when the
    /// key is already present, leaving the stored document untouched.
    fn insert(&self, table: &str, key: &str, document: Document) -> Result<()>;

    /// Apply `ops` to one record as a unit and return the updated document.
    ///
    /// Returns `Ok(None)` when no record is stored under `key`; an update
    /// never creates a record. If any op is rejected none of them apply.
    fn update(&self, table: &str, key: &str, ops: &[UpdateOp]) -> Result<Option<Document>>;
}

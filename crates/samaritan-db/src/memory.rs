use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use crate::expr::{Document, Filter, Projection, UpdateOp, apply_ops};
use crate::{Result, Store, StoreError};

type Tables = HashMap<String, BTreeMap<String, Document>>;

/// Process-local store. Each call takes one lock, so every call is atomic
/// for the record it touches and nothing more.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>> {
        self.tables.lock().map_err(|_| StoreError::LockPoisoned)
    }
}

impl Store for MemoryStore {
    fn get(&self, table: &str, key: &str) -> Result<Option<Document>> {
        let tables = self.lock()?;
        Ok(tables.get(table).and_then(|rows| rows.get(key)).cloned())
    }

    fn scan(
        &self,
        table: &str,
        filter: Option<&Filter>,
        projection: Option<&Projection>,
    ) -> Result<Vec<Document>> {
        let tables = self.lock()?;
        let Some(rows) = tables.get(table) else {
            return Ok(Vec::new());
        };

        Ok(rows
            .values()
            .filter(|doc| filter.is_none_or(|f| f.matches(doc)))
            .map(|doc| match projection {
                Some(p) => p.apply(doc),
                None => doc.clone(),
            })
            .collect())
    }

    fn put(&self, table: &str, key: &str, document: Document) -> Result<()> {
        let mut tables = self.lock()?;
        tables
            .entry(table.to_string())
            .or_default()
            .insert(key.to_string(), document);
        Ok(())
    }

    fn insert(&self, table: &str, key: &str, document: Document) -> Result<()> {
        let mut tables = self.lock()?;
        let rows = tables.entry(table.to_string()).or_default();
        if rows.contains_key(key) {
            return Err(StoreError::AlreadyExists {
                table: table.to_string(),
                key: key.to_string(),
            });
        }
        rows.insert(key.to_string(), document);
        Ok(())
    }

    fn update(&self, table: &str, key: &str, ops: &[UpdateOp]) -> Result<Option<Document>> {
        let mut tables = self.lock()?;
        let Some(doc) = tables.get_mut(table).and_then(|rows| rows.get_mut(key)) else {
            return Ok(None);
        };
        apply_ops(doc, ops)?;
        Ok(Some(doc.clone()))
    }
}

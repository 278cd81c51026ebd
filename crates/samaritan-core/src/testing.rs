use std::sync::{Arc, Barrier, Mutex};

use chrono::{DateTime, Duration, Utc};
use samaritan_db::{Document, Filter, MemoryStore, Projection, Store, StoreError, UpdateOp};
use serde_json::Value;

use crate::clock::Clock;
use crate::{Engines, Tables};

pub fn document(value: Value) -> Document {
    match value {
        Value::Object(map) => map,
        other => panic!("expected an object, got {other}"),
    }
}

pub fn engines_on(store: Arc<dyn Store>) -> Engines {
    Engines::new(store, &Tables::default(), Arc::new(StepClock::default()))
}

/// Clock that moves one second forward on every reading.
pub struct StepClock {
    next: Mutex<DateTime<Utc>>,
}

impl Default for StepClock {
    fn default() -> Self {
        Self {
            next: Mutex::new(DateTime::from_timestamp(1_700_000_000, 0).unwrap()),
        }
    }
}

impl Clock for StepClock {
    fn now(&self) -> DateTime<Utc> {
        let mut next = self.next.lock().unwrap();
        let now = *next;
        *next = now + Duration::seconds(1);
        now
    }
}

/// Store whose updates on one table fail until healed.
pub struct FaultyStore {
    inner: Arc<MemoryStore>,
    failing: Mutex<Option<String>>,
}

impl FaultyStore {
    pub fn new(inner: Arc<MemoryStore>) -> Self {
        Self {
            inner,
            failing: Mutex::new(None),
        }
    }

    pub fn fail_updates_on(&self, table: &str) {
        *self.failing.lock().unwrap() = Some(table.to_string());
    }

    pub fn heal(&self) {
        *self.failing.lock().unwrap() = None;
    }
}

impl Store for FaultyStore {
    fn get(&self, table: &str, key: &str) -> samaritan_db::Result<Option<Document>> {
        self.inner.get(table, key)
    }

    fn scan(
        &self,
        table: &str,
        filter: Option<&Filter>,
        projection: Option<&Projection>,
    ) -> samaritan_db::Result<Vec<Document>> {
        self.inner.scan(table, filter, projection)
    }

    fn put(&self, table: &str, key: &str, document: Document) -> samaritan_db::Result<()> {
        self.inner.put(table, key, document)
    }

    fn insert(&self, table: &str, key: &str, document: Document) -> samaritan_db::Result<()> {
        self.inner.insert(table, key, document)
    }

    fn update(
        &self,
        table: &str,
        key: &str,
        ops: &[UpdateOp],
    ) -> samaritan_db::Result<Option<Document>> {
        if self.failing.lock().unwrap().as_deref() == Some(table) {
            return Err(StoreError::Unavailable(format!("injected failure on {table}")));
        }
        self.inner.update(table, key, ops)
    }
}

/// Store whose scans of one table hold every caller at a barrier after the
/// read, so that all of them observe the table before any of them writes.
pub struct RacingStore {
    inner: Arc<MemoryStore>,
    table: String,
    barrier: Barrier,
}

impl RacingStore {
    pub fn new(inner: Arc<MemoryStore>, table: &str, racers: usize) -> Self {
        Self {
            inner,
            table: table.to_string(),
            barrier: Barrier::new(racers),
        }
    }
}

impl Store for RacingStore {
    fn get(&self, table: &str, key: &str) -> samaritan_db::Result<Option<Document>> {
        self.inner.get(table, key)
    }

    fn scan(
        &self,
        table: &str,
        filter: Option<&Filter>,
        projection: Option<&Projection>,
    ) -> samaritan_db::Result<Vec<Document>> {
        let rows = self.inner.scan(table, filter, projection)?;
        if table == self.table {
            self.barrier.wait();
        }
        Ok(rows)
    }

    fn put(&self, table: &str, key: &str, document: Document) -> samaritan_db::Result<()> {
        self.inner.put(table, key, document)
    }

    fn insert(&self, table: &str, key: &str, document: Document) -> samaritan_db::Result<()> {
        self.inner.insert(table, key, document)
    }

    fn update(
        &self,
        table: &str,
        key: &str,
        ops: &[UpdateOp],
    ) -> samaritan_db::Result<Option<Document>> {
        self.inner.update(table, key, ops)
    }
}

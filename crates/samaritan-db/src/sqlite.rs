use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use rusqlite::{Connection, OptionalExtension, TransactionBehavior};
use tracing::{debug, info};

use crate::expr::{Document, Filter, Projection, UpdateOp, apply_ops};
use crate::{Result, Store, StoreError, migrations};

/// Document store on SQLite: one JSON body per `(collection, key)` row.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn open(path: &Path, busy_timeout: Duration) -> Result<Self> {
        let conn = Connection::open(path)?;

        // WAL mode for concurrent reads
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.busy_timeout(busy_timeout)?;

        migrations::run(&conn)?;

        info!("Store opened at {}", path.display());
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        migrations::run(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self.conn.lock().map_err(|_| StoreError::LockPoisoned)?;
        f(&conn)
    }

    pub fn with_conn_mut<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T>,
    {
        let mut conn = self.conn.lock().map_err(|_| StoreError::LockPoisoned)?;
        f(&mut conn)
    }
}

fn decode(table: &str, key: &str, body: &str) -> Result<Document> {
    serde_json::from_str(body).map_err(|source| StoreError::Corrupt {
        table: table.to_string(),
        key: key.to_string(),
        source,
    })
}

fn select_body(conn: &Connection, table: &str, key: &str) -> Result<Option<String>> {
    let body = conn
        .query_row(
            "SELECT body FROM documents WHERE collection = ?1 AND key = ?2",
            [table, key],
            |row| row.get(0),
        )
        .optional()?;
    Ok(body)
}

impl Store for SqliteStore {
    fn get(&self, table: &str, key: &str) -> Result<Option<Document>> {
        self.with_conn(|conn| {
            select_body(conn, table, key)?
                .map(|body| decode(table, key, &body))
                .transpose()
        })
    }

    fn scan(
        &self,
        table: &str,
        filter: Option<&Filter>,
        projection: Option<&Projection>,
    ) -> Result<Vec<Document>> {
        let rows = self.with_conn(|conn| {
            let mut stmt = conn
                .prepare("SELECT key, body FROM documents WHERE collection = ?1 ORDER BY rowid")?;
            let rows = stmt
                .query_map([table], |row| {
                    Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })?;

        debug!("Scanned {} rows from {}", rows.len(), table);

        let mut documents = Vec::new();
        for (key, body) in rows {
            let doc = decode(table, &key, &body)?;
            if filter.is_none_or(|f| f.matches(&doc)) {
                documents.push(match projection {
                    Some(p) => p.apply(&doc),
                    None => doc,
                });
            }
        }
        Ok(documents)
    }

    fn put(&self, table: &str, key: &str, document: Document) -> Result<()> {
        let body = serde_json::to_string(&document)?;
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO documents (collection, key, body) VALUES (?1, ?2, ?3)
                 ON CONFLICT (collection, key)
                 DO UPDATE SET body = excluded.body, updated_at = datetime('now')",
                [table, key, body.as_str()],
            )?;
            Ok(())
        })
    }

    fn insert(&self, table: &str, key: &str, document: Document) -> Result<()> {
        let body = serde_json::to_string(&document)?;
        let inserted = self.with_conn(|conn| {
            let changed = conn.execute(
                "INSERT OR IGNORE INTO documents (collection, key, body) VALUES (?1, ?2, ?3)",
                [table, key, body.as_str()],
            )?;
            Ok(changed)
        })?;

        if inserted == 0 {
            return Err(StoreError::AlreadyExists {
                table: table.to_string(),
                key: key.to_string(),
            });
        }
        Ok(())
    }

    fn update(&self, table: &str, key: &str, ops: &[UpdateOp]) -> Result<Option<Document>> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

            let Some(body) = select_body(&tx, table, key)? else {
                return Ok(None);
            };
            let mut doc = decode(table, key, &body)?;
            apply_ops(&mut doc, ops)?;

            tx.execute(
                "UPDATE documents SET body = ?3, updated_at = datetime('now')
                 WHERE collection = ?1 AND key = ?2",
                [table, key, serde_json::to_string(&doc)?.as_str()],
            )?;
            tx.commit()?;

            Ok(Some(doc))
        })
    }
}

// src/db/kv.rs
use chrono::Utc;
use rusqlite::{params, OptionalExtension, TransactionBehavior};

use crate::db::connection::Database;
use crate::db::StoreError;

/// Outcome of a read-modify-write closure passed to [`KeyValueStore::update`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Write {
    /// Leave the stored value as it was.
    Keep,
    /// Replace (or create) the stored value.
    Put(String),
}

/// Durable string-keyed string values, the local stand-in for browser storage.
///
/// Missing keys read as `None`; structured values are encoded by the caller.
#[derive(Clone, Debug)]
pub struct KeyValueStore {
    db: Database,
}

impl KeyValueStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.db.with_conn(|conn| {
            let value = conn
                .query_row(
                    "select value from kv_store where key = ?",
                    params![key],
                    |r| r.get(0),
                )
                .optional()?;
            Ok(value)
        })
    }

    pub fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let now = Utc::now().timestamp();
        self.db.with_conn(|conn| {
            conn.execute(
                "insert into kv_store (key, value, updated_at) values (?, ?, ?)
                 on conflict(key) do update set value = excluded.value, updated_at = excluded.updated_at",
                params![key, value, now],
            )?;
            Ok(())
        })
    }

    pub fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.db.with_conn(|conn| {
            conn.execute("delete from kv_store where key = ?", params![key])?;
            Ok(())
        })
    }

    pub fn list_keys(&self) -> Result<Vec<String>, StoreError> {
        self.db.with_conn(|conn| {
            let mut stmt = conn.prepare("select key from kv_store order by key")?;
            let rows = stmt.query_map([], |r| r.get::<_, String>(0))?;

            let mut keys = Vec::new();
            for r in rows {
                keys.push(r?);
            }
            Ok(keys)
        })
    }

    /// Read-modify-write a single key under the SQLite write lock.
    ///
    /// The IMMEDIATE transaction makes concurrent writers on other threads
    /// queue behind this one, so two rapid mutations of the same collection
    /// cannot lose each other's update.
    pub fn update<T, F>(&self, key: &str, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(Option<String>) -> Result<(Write, T), StoreError>,
    {
        let now = Utc::now().timestamp();
        self.db.with_conn(|conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

            let current: Option<String> = tx
                .query_row(
                    "select value from kv_store where key = ?",
                    params![key],
                    |r| r.get(0),
                )
                .optional()?;

            let (write, out) = match f(current) {
                Ok(res) => res,
                Err(e) => {
                    tx.rollback().ok();
                    return Err(e);
                }
            };

            if let Write::Put(value) = write {
                tx.execute(
                    "insert into kv_store (key, value, updated_at) values (?, ?, ?)
                     on conflict(key) do update set value = excluded.value, updated_at = excluded.updated_at",
                    params![key, value, now],
                )?;
            }

            tx.commit()?;
            Ok(out)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection::init_db;
    use tempfile::TempDir;

    fn store() -> (TempDir, KeyValueStore) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("kv.sqlite3");
        let db = Database::new(path.to_string_lossy().to_string());
        init_db(&db).unwrap();
        (dir, KeyValueStore::new(db))
    }

    #[test]
    fn missing_key_reads_as_none() {
        let (_dir, kv) = store();
        assert_eq!(kv.get("nope").unwrap(), None);
    }

    #[test]
    fn set_overwrites_and_remove_deletes() {
        let (_dir, kv) = store();
        kv.set("a", "1").unwrap();
        kv.set("a", "2").unwrap();
        assert_eq!(kv.get("a").unwrap().as_deref(), Some("2"));

        kv.remove("a").unwrap();
        assert_eq!(kv.get("a").unwrap(), None);

        // removing again is fine
        kv.remove("a").unwrap();
    }

    #[test]
    fn list_keys_returns_everything_sorted() {
        let (_dir, kv) = store();
        kv.set("b", "x").unwrap();
        kv.set("a", "y").unwrap();
        assert_eq!(kv.list_keys().unwrap(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn update_keep_does_not_create_key() {
        let (_dir, kv) = store();
        let seen = kv.update("k", |cur| Ok((Write::Keep, cur))).unwrap();
        assert_eq!(seen, None);
        assert_eq!(kv.get("k").unwrap(), None);
    }

    #[test]
    fn concurrent_updates_do_not_lose_writes() {
        let (_dir, kv) = store();
        kv.set("counter", "0").unwrap();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let kv = kv.clone();
                std::thread::spawn(move || {
                    for _ in 0..25 {
                        kv.update("counter", |cur| {
                            let n: i64 = cur.and_then(|s| s.parse().ok()).unwrap_or(0);
                            Ok((Write::Put((n + 1).to_string()), ()))
                        })
                        .unwrap();
                    }
                })
            })
            .collect();

        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(kv.get("counter").unwrap().as_deref(), Some("100"));
    }
}

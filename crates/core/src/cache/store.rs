//! Key-value operations.
//!
//! The store holds opaque string values under fixed keys; the typed
//! caches layer envelope parsing and expiry on top.

use super::connection::CacheDb;
use crate::Error;
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite;

impl CacheDb {
    /// Get the raw value stored under `key`.
    ///
    /// Returns None if the key doesn't exist.
    pub async fn get_value(&self, key: &str) -> Result<Option<String>, Error> {
        let key = key.to_string();
        self.conn
            .call(move |conn| -> Result<Option<String>, Error> {
                let result = conn.query_row("SELECT value FROM kv_store WHERE key = ?1", params![key], |row| row.get(0));

                match result {
                    Ok(value) => Ok(Some(value)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    /// Insert or overwrite the value stored under `key`.
    pub async fn put_value(&self, key: &str, value: &str) -> Result<(), Error> {
        let key = key.to_string();
        let value = value.to_string();
        let updated_at = chrono::Utc::now().to_rfc3339();
        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
                    ON CONFLICT(key) DO UPDATE SET
                        value = excluded.value,
                        updated_at = excluded.updated_at",
                    params![key, value, updated_at],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Delete the value stored under `key`.
    ///
    /// Returns whether an entry was removed.
    pub async fn delete_value(&self, key: &str) -> Result<bool, Error> {
        let key = key.to_string();
        self.conn
            .call(move |conn| -> Result<bool, Error> {
                let count = conn.execute("DELETE FROM kv_store WHERE key = ?1", params![key])?;
                Ok(count > 0)
            })
            .await
            .map_err(Error::from)
    }

    /// Number of stored keys.
    pub async fn count_values(&self) -> Result<u64, Error> {
        self.conn
            .call(|conn| -> Result<u64, Error> {
                let count: i64 = conn.query_row("SELECT COUNT(*) FROM kv_store", [], |row| row.get(0))?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_and_get() {
        let db = CacheDb::open_in_memory().await.unwrap();
        db.put_value("k", "v1").await.unwrap();
        assert_eq!(db.get_value("k").await.unwrap().as_deref(), Some("v1"));

        db.put_value("k", "v2").await.unwrap();
        assert_eq!(db.get_value("k").await.unwrap().as_deref(), Some("v2"));
        assert_eq!(db.count_values().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_get_missing() {
        let db = CacheDb::open_in_memory().await.unwrap();
        assert!(db.get_value("nonexistent").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete() {
        let db = CacheDb::open_in_memory().await.unwrap();
        db.put_value("k", "v").await.unwrap();

        assert!(db.delete_value("k").await.unwrap());
        assert!(!db.delete_value("k").await.unwrap());
        assert!(db.get_value("k").await.unwrap().is_none());
    }
}

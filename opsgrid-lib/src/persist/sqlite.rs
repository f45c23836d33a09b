//! SQLite store with in-memory cache.

use std::path::Path;

use async_sqlite::Client;
use async_trait::async_trait;
use dashmap::DashMap;

use super::PersistenceAdapter;
use crate::error::PersistError;

/// SQLite-backed layout storage with a DashMap read cache.
pub struct SqliteStore {
    client: Client,
    cache: DashMap<String, String>,
}

impl SqliteStore {
    /// Opens (or creates) the store at the given path.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, PersistError> {
        let client = async_sqlite::ClientBuilder::new().path(path).open().await?;

        client
            .conn(|conn| {
                conn.execute(
                    "CREATE TABLE IF NOT EXISTS table_layouts (
                        key TEXT PRIMARY KEY,
                        value TEXT NOT NULL
                    )",
                    [],
                )
            })
            .await?;

        Ok(Self {
            client,
            cache: DashMap::new(),
        })
    }
}

#[async_trait]
impl PersistenceAdapter for SqliteStore {
    async fn get(&self, key: &str) -> Result<Option<String>, PersistError> {
        if let Some(value) = self.cache.get(key) {
            return Ok(Some(value.clone()));
        }

        let key_owned = key.to_string();
        let result = self
            .client
            .conn(move |conn| {
                let mut stmt = conn.prepare("SELECT value FROM table_layouts WHERE key = ?")?;
                let mut rows = stmt.query([&key_owned])?;
                match rows.next()? {
                    Some(row) => Ok(Some(row.get::<_, String>(0)?)),
                    None => Ok(None),
                }
            })
            .await?;

        if let Some(ref value) = result {
            self.cache.insert(key.to_string(), value.clone());
        }

        Ok(result)
    }

    async fn set(&self, key: &str, value: String) -> Result<(), PersistError> {
        let key_owned = key.to_string();
        let value_clone = value.clone();

        self.client
            .conn(move |conn| {
                conn.execute(
                    "INSERT INTO table_layouts (key, value) VALUES (?1, ?2)
                     ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                    [&key_owned, &value_clone],
                )
            })
            .await?;

        self.cache.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), PersistError> {
        let key_owned = key.to_string();

        self.client
            .conn(move |conn| conn.execute("DELETE FROM table_layouts WHERE key = ?", [&key_owned]))
            .await?;

        self.cache.remove(key);
        Ok(())
    }
}

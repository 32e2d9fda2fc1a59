use crate::{
    models::{
        database::persistence_adapter::PersistenceAdapter, log_entry::LogEntry, trade::Trade,
    },
    utils::{
        constants::{LOGS_KEY, TRADES_KEY},
        error::PersistenceError,
    },
};
use async_trait::async_trait;
use log::debug;
use serde::{de::DeserializeOwned, Serialize};
use sqlx::{
    query, query_scalar,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Sqlite,
};
use std::{path::Path, str::FromStr};

/// Local backend: a SQLite file used as a key-value store. Each collection is
/// kept as one JSON array under a fixed key.
pub struct LocalDb {
    pool: Pool<Sqlite>,
}

impl LocalDb {
    pub async fn open(path: &Path) -> Result<Self, PersistenceError> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);

        Self::connect(options).await
    }

    /// Nothing survives the process. Handy for tests and dry runs.
    pub async fn in_memory() -> Result<Self, PersistenceError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        Self::connect(options).await
    }

    async fn connect(options: SqliteConnectOptions) -> Result<Self, PersistenceError> {
        // A single connection that never expires, otherwise an in-memory
        // database would vanish with its connection.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        query(
            r#"
            create table if not exists kv_store (
                key     text primary key,
                value   text not null
            )
            "#,
        )
        .execute(&pool)
        .await?;

        Ok(Self { pool })
    }

    async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>, PersistenceError> {
        let value: Option<String> = query_scalar("select value from kv_store where key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        match value {
            Some(json) if !json.trim().is_empty() => Ok(serde_json::from_str(&json)?),
            _ => Ok(Vec::new()),
        }
    }

    async fn set<T: Serialize>(&self, key: &str, items: &[T]) -> Result<(), PersistenceError> {
        let json = serde_json::to_string(items)?;

        query(
            r#"
            insert into kv_store (key, value) values (?, ?)
            on conflict(key) do update set value = excluded.value
            "#,
        )
        .bind(key)
        .bind(json)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl PersistenceAdapter for LocalDb {
    async fn load_all(&self) -> Result<(Vec<Trade>, Vec<LogEntry>), PersistenceError> {
        let trades: Vec<Trade> = self.get(TRADES_KEY).await?;
        let logs: Vec<LogEntry> = self.get(LOGS_KEY).await?;

        debug!(
            "Loaded {} trades and {} log entries from local store.",
            trades.len(),
            logs.len()
        );

        Ok((trades, logs))
    }

    async fn save_all(&self, trades: &[Trade], logs: &[LogEntry]) -> Result<(), PersistenceError> {
        self.set(TRADES_KEY, trades).await?;
        self.set(LOGS_KEY, logs).await?;

        debug!(
            "Saved {} trades and {} log entries to local store.",
            trades.len(),
            logs.len()
        );

        Ok(())
    }
}

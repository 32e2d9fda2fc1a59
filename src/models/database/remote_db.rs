use crate::{
    data_sources::baas::table_client::{Session, TableClient},
    models::{
        database::{
            db_log_entry::DBLogEntry, db_trade::DBTrade, persistence_adapter::PersistenceAdapter,
        },
        log_entry::{LogEntry, LogId},
        trade::{Trade, TradeId},
    },
    utils::{
        constants::{REMOTE_LOGS_TABLE, REMOTE_TRADES_TABLE},
        error::PersistenceError,
    },
};
use async_trait::async_trait;
use log::{debug, info};
use serde_json::Value;
use std::{
    collections::HashSet,
    sync::{Arc, Mutex, MutexGuard},
};

/// Remote backend: one row per trade and per log entry, owned by the
/// authenticated user.
///
/// `save_all` upserts every trade, deletes rows of trades that are gone and
/// inserts only log entries not yet sent, since the log table is append-only.
pub struct RemoteDb {
    client: Arc<dyn TableClient>,
    session: Session,
    synced: Mutex<SyncedIds>,
}

#[derive(Debug, Default)]
struct SyncedIds {
    trades: HashSet<TradeId>,
    logs: HashSet<LogId>,
}

impl RemoteDb {
    pub async fn connect(
        client: Arc<dyn TableClient>,
        email: &str,
        password: &str,
    ) -> Result<Self, PersistenceError> {
        let session = client.authenticate(email, password).await?;
        info!("Authenticated against remote store as user {}.", session.user_id);

        Ok(Self::with_session(client, session))
    }

    pub fn with_session(client: Arc<dyn TableClient>, session: Session) -> Self {
        Self {
            client,
            session,
            synced: Mutex::new(SyncedIds::default()),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.session.user_id
    }

    fn synced(&self) -> Result<MutexGuard<'_, SyncedIds>, PersistenceError> {
        self.synced.lock().map_err(|_| PersistenceError::SyncState)
    }

    fn rows<T: serde::Serialize>(items: &[T]) -> Result<Vec<Value>, PersistenceError> {
        items
            .iter()
            .map(|item| serde_json::to_value(item).map_err(PersistenceError::from))
            .collect()
    }
}

#[async_trait]
impl PersistenceAdapter for RemoteDb {
    async fn load_all(&self) -> Result<(Vec<Trade>, Vec<LogEntry>), PersistenceError> {
        let trade_rows = self
            .client
            .select_all(&self.session, REMOTE_TRADES_TABLE)
            .await?;
        let log_rows = self
            .client
            .select_all(&self.session, REMOTE_LOGS_TABLE)
            .await?;

        let trades = trade_rows
            .into_iter()
            .map(|row| serde_json::from_value::<DBTrade>(row).map(Trade::from))
            .collect::<Result<Vec<Trade>, _>>()?;
        let mut logs = log_rows
            .into_iter()
            .map(|row| serde_json::from_value::<DBLogEntry>(row).map(LogEntry::from))
            .collect::<Result<Vec<LogEntry>, _>>()?;

        // Row order is not guaranteed by the service.
        logs.sort_by_key(|entry| entry.timestamp);

        {
            let mut synced = self.synced()?;
            synced.trades = trades.iter().map(|t| t.id).collect();
            synced.logs = logs.iter().map(|e| e.id).collect();
        }

        debug!(
            "Loaded {} trades and {} log entries from remote store.",
            trades.len(),
            logs.len()
        );

        Ok((trades, logs))
    }

    async fn save_all(&self, trades: &[Trade], logs: &[LogEntry]) -> Result<(), PersistenceError> {
        let user_id = self.session.user_id.as_str();
        let current: HashSet<TradeId> = trades.iter().map(|t| t.id).collect();

        let (removed, new_logs) = {
            let synced = self.synced()?;

            let removed: Vec<TradeId> = synced.trades.difference(&current).copied().collect();
            let new_logs: Vec<DBLogEntry> = logs
                .iter()
                .filter(|entry| !synced.logs.contains(&entry.id))
                .map(|entry| DBLogEntry::from_entry(entry, user_id))
                .collect();

            (removed, new_logs)
        };

        let trade_rows: Vec<DBTrade> = trades
            .iter()
            .map(|trade| DBTrade::from_trade(trade, user_id))
            .collect();

        // Each step is recorded as soon as it lands, so rows written by a save
        // that fails later on are still known and get removed by the next one.
        self.client
            .upsert(&self.session, REMOTE_TRADES_TABLE, Self::rows(&trade_rows)?)
            .await?;
        self.synced()?.trades.extend(current.iter().copied());

        let removed_ids: Vec<String> = removed.iter().map(|id| id.to_string()).collect();
        self.client
            .delete(&self.session, REMOTE_TRADES_TABLE, &removed_ids)
            .await?;
        {
            let mut synced = self.synced()?;
            for id in &removed {
                synced.trades.remove(id);
            }
        }

        self.client
            .upsert(&self.session, REMOTE_LOGS_TABLE, Self::rows(&new_logs)?)
            .await?;
        self.synced()?
            .logs
            .extend(new_logs.iter().map(|entry| entry.id));

        debug!(
            "Synced {} trades ({} removed) and {} new log entries to remote store.",
            trade_rows.len(),
            removed.len(),
            new_logs.len()
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        data_sources::baas::memory_client::MemoryTableClient,
        models::{trade::Direction, trade_builder::TradeBuilder},
    };
    use chrono::NaiveDate;

    fn trade(instrument: &str) -> Trade {
        let fields = TradeBuilder::new()
            .date(NaiveDate::from_ymd_opt(2024, 6, 3).unwrap())
            .instrument(instrument)
            .direction(Direction::Short)
            .entry_price(100.0)
            .exit_price(95.0)
            .profit_loss(5.0)
            .build()
            .unwrap();
        Trade::new(TradeId::new(), fields)
    }

    async fn remote(client: Arc<MemoryTableClient>) -> RemoteDb {
        RemoteDb::connect(client, "me@example.com", "secret")
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn connect_fails_with_bad_credentials() {
        let client = Arc::new(MemoryTableClient::new().with_user("me@example.com", "secret"));
        let result = RemoteDb::connect(client, "me@example.com", "wrong").await;
        assert!(matches!(result, Err(PersistenceError::Auth(_))));
    }

    #[tokio::test]
    async fn rows_carry_the_session_owner() {
        let client = Arc::new(MemoryTableClient::new().with_user("me@example.com", "secret"));
        let db = remote(client.clone()).await;

        db.save_all(&[trade("TSLA")], &[]).await.unwrap();

        let rows = client.rows(REMOTE_TRADES_TABLE);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["user_id"], Value::String(db.user_id().to_string()));
    }

    #[tokio::test]
    async fn removed_trades_are_deleted_remotely() {
        let client = Arc::new(MemoryTableClient::new().with_user("me@example.com", "secret"));
        let db = remote(client.clone()).await;
        let kept = trade("AMD");
        let dropped = trade("INTC");

        db.save_all(&[kept.clone(), dropped], &[]).await.unwrap();
        db.save_all(&[kept.clone()], &[]).await.unwrap();

        let (trades, _) = db.load_all().await.unwrap();
        assert_eq!(trades, vec![kept]);
    }

    #[tokio::test]
    async fn poisoned_sync_state_is_an_error() {
        let client = Arc::new(MemoryTableClient::new().with_user("me@example.com", "secret"));
        let db = remote(client).await;

        let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = db.synced.lock().unwrap();
            panic!("poison the lock");
        }));

        let result = db.save_all(&[trade("META")], &[]).await;
        assert!(matches!(result, Err(PersistenceError::SyncState)));
    }
}

mod common;

use async_trait::async_trait;
use common::{fields, local_store, remote_store, EMAIL, PASSWORD};
use serde_json::Value;
use std::{
    collections::HashSet,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};
use trade_journal::{
    data_sources::baas::{
        memory_client::MemoryTableClient,
        table_client::{Session, TableClient},
    },
    models::{
        database::remote_db::RemoteDb,
        log_entry::LogAction,
        trade::{Direction, TradeId},
        trade_store::TradeStore,
    },
    utils::{
        constants::REMOTE_LOGS_TABLE,
        error::{JournalError, PersistenceError},
    },
};

/// Passes everything through except log-table writes while `fail_logs` is set,
/// so a save can land its trade rows and then fail.
struct FlakyLogTable {
    inner: Arc<MemoryTableClient>,
    fail_logs: AtomicBool,
}

#[async_trait]
impl TableClient for FlakyLogTable {
    async fn authenticate(&self, email: &str, password: &str) -> Result<Session, PersistenceError> {
        self.inner.authenticate(email, password).await
    }

    async fn select_all(&self, session: &Session, table: &str) -> Result<Vec<Value>, PersistenceError> {
        self.inner.select_all(session, table).await
    }

    async fn upsert(
        &self,
        session: &Session,
        table: &str,
        rows: Vec<Value>,
    ) -> Result<(), PersistenceError> {
        if table == REMOTE_LOGS_TABLE && self.fail_logs.load(Ordering::SeqCst) {
            return Err(PersistenceError::Remote {
                status: 500,
                body: "log insert failed".to_string(),
            });
        }
        self.inner.upsert(session, table, rows).await
    }

    async fn delete(&self, session: &Session, table: &str, ids: &[String]) -> Result<(), PersistenceError> {
        self.inner.delete(session, table, ids).await
    }
}

async fn flaky_store() -> (TradeStore, Arc<FlakyLogTable>, Arc<MemoryTableClient>) {
    let inner = Arc::new(MemoryTableClient::new().with_user(EMAIL, PASSWORD));
    let flaky = Arc::new(FlakyLogTable {
        inner: inner.clone(),
        fail_logs: AtomicBool::new(false),
    });
    let db = RemoteDb::connect(flaky.clone(), EMAIL, PASSWORD).await.unwrap();

    (TradeStore::new(Arc::new(db)), flaky, inner)
}

async fn reload(client: Arc<MemoryTableClient>) -> TradeStore {
    let db = RemoteDb::connect(client, EMAIL, PASSWORD).await.unwrap();
    TradeStore::load(Arc::new(db)).await.unwrap()
}

fn instruments(store: &TradeStore) -> Vec<String> {
    store
        .list()
        .iter()
        .map(|t| t.fields.instrument.clone())
        .collect()
}

#[tokio::test]
async fn back_to_back_creates_get_distinct_ids() {
    let mut store = local_store().await;
    let mut ids = HashSet::new();

    for i in 0..200 {
        let trade = store.create(fields(&format!("SYM{}", i), 1.0)).await.unwrap();
        ids.insert(trade.id);
    }

    assert_eq!(ids.len(), 200);
    assert_eq!(store.len(), 200);
}

#[tokio::test]
async fn create_logs_an_add_entry() {
    let mut store = local_store().await;
    let trade = store.create(fields("EURUSD", 12.0)).await.unwrap();

    assert_eq!(store.get(trade.id), Some(&trade));
    assert_eq!(store.logs().len(), 1);

    let entry = &store.logs()[0];
    assert_eq!(entry.action, LogAction::Add);
    assert_eq!(entry.trade_id, trade.id);
    assert_eq!(entry.instrument, "EURUSD");
    assert_eq!(entry.details, "Added LONG EURUSD @ 100");
}

#[tokio::test]
async fn update_replaces_the_whole_record() {
    let mut store = local_store().await;
    let mut original = fields("BTCUSDT", 50.0);
    original.stop_loss = Some(95.0);
    original.notes = "first take".to_string();
    let trade = store.create(original).await.unwrap();

    let mut replacement = fields("BTCUSDT", -20.0);
    replacement.direction = Direction::Short;
    let updated = store.update(trade.id, replacement.clone()).await.unwrap();

    assert_eq!(updated.id, trade.id);
    assert_eq!(store.get(trade.id).unwrap().fields, replacement);
    assert_eq!(store.get(trade.id).unwrap().fields.stop_loss, None);
    assert_eq!(store.get(trade.id).unwrap().fields.notes, "");

    let last = store.logs().last().unwrap();
    assert_eq!(last.action, LogAction::Edit);
    assert_eq!(last.details, "Edited SHORT BTCUSDT");
}

#[tokio::test]
async fn update_of_unknown_id_is_not_found_and_changes_nothing() {
    let mut store = local_store().await;
    let existing = store.create(fields("AAPL", 5.0)).await.unwrap();
    let missing = TradeId::new();

    let err = store.update(missing, fields("MSFT", 1.0)).await.unwrap_err();

    assert!(matches!(err, JournalError::NotFound(id) if id == missing));
    assert_eq!(store.list(), vec![&existing]);
    assert_eq!(store.logs().len(), 1);
}

#[tokio::test]
async fn delete_of_unknown_id_is_a_silent_no_op() {
    let mut store = local_store().await;
    store.create(fields("AAPL", 5.0)).await.unwrap();

    let removed = store.delete(TradeId::new()).await.unwrap();

    assert_eq!(removed, None);
    assert_eq!(store.len(), 1);
    assert_eq!(store.logs().len(), 1);
}

#[tokio::test]
async fn delete_logs_the_trade_before_removal() {
    let mut store = local_store().await;
    let trade = store.create(fields("NVDA", 80.0)).await.unwrap();

    let removed = store.delete(trade.id).await.unwrap();

    assert_eq!(removed, Some(trade.clone()));
    assert!(store.is_empty());

    let last = store.logs().last().unwrap();
    assert_eq!(last.action, LogAction::Delete);
    assert_eq!(last.trade_id, trade.id);
    assert_eq!(last.instrument, "NVDA");
    assert_eq!(last.details, "Deleted LONG NVDA");
}

#[tokio::test]
async fn every_mutation_appends_one_entry_with_a_later_timestamp() {
    let mut store = local_store().await;

    let trade = store.create(fields("ES", 10.0)).await.unwrap();
    store.update(trade.id, fields("NQ", 10.0)).await.unwrap();
    store.delete(trade.id).await.unwrap();

    let logs = store.logs();
    let actions: Vec<LogAction> = logs.iter().map(|e| e.action).collect();
    assert_eq!(
        actions,
        vec![LogAction::Add, LogAction::Edit, LogAction::Delete]
    );
    assert!(logs.windows(2).all(|pair| pair[1].timestamp >= pair[0].timestamp));

    let ids: HashSet<_> = logs.iter().map(|e| e.id).collect();
    assert_eq!(ids.len(), 3);
}

#[tokio::test]
async fn statistics_follow_the_journal() {
    let mut store = local_store().await;

    let empty = store.statistics();
    assert_eq!(empty.total, 0);
    assert_eq!(empty.win_rate, 0.0);

    for pnl in [10.0, -5.0, 0.0] {
        store.create(fields("CL", pnl)).await.unwrap();
    }

    let stats = store.statistics();
    assert_eq!(stats.total, 3);
    assert_eq!(stats.winning, 1);
    assert_eq!(stats.losing, 2);
    assert_eq!(stats.win_rate, 33.3);
    assert_eq!(stats.total_pnl, 5.0);
}

#[tokio::test]
async fn failed_save_rolls_the_mutation_back() {
    let (mut store, client) = remote_store().await;
    let kept = store.create(fields("SOLUSDT", 3.0)).await.unwrap();

    client.set_fail_writes(true);

    let err = store.create(fields("DOGEUSDT", 1.0)).await.unwrap_err();
    assert!(matches!(
        err,
        JournalError::Persistence(PersistenceError::Remote { status: 503, .. })
    ));
    assert_eq!(store.list(), vec![&kept]);
    assert_eq!(store.logs().len(), 1);

    let err = store.delete(kept.id).await.unwrap_err();
    assert!(matches!(err, JournalError::Persistence(_)));
    assert_eq!(store.list(), vec![&kept]);
    assert_eq!(store.logs().len(), 1);

    client.set_fail_writes(false);
    store.delete(kept.id).await.unwrap();
    assert!(store.is_empty());
    assert_eq!(store.logs().len(), 2);
}

#[tokio::test]
async fn rolled_back_create_does_not_come_back_after_reload() {
    let (mut store, flaky, inner) = flaky_store().await;
    store.create(fields("KEEP", 1.0)).await.unwrap();

    flaky.fail_logs.store(true, Ordering::SeqCst);
    store.create(fields("GHOST", 1.0)).await.unwrap_err();
    assert_eq!(instruments(&store), vec!["KEEP"]);

    flaky.fail_logs.store(false, Ordering::SeqCst);
    store.create(fields("NEXT", 1.0)).await.unwrap();

    let reloaded = reload(inner).await;
    let details: Vec<&str> = reloaded.logs().iter().map(|e| e.details.as_str()).collect();

    assert_eq!(instruments(&reloaded), vec!["KEEP", "NEXT"]);
    assert_eq!(details, vec!["Added LONG KEEP @ 100", "Added LONG NEXT @ 100"]);
}

#[tokio::test]
async fn rolled_back_delete_restores_the_remote_row() {
    let (mut store, flaky, inner) = flaky_store().await;
    let kept = store.create(fields("KEEP", 1.0)).await.unwrap();

    flaky.fail_logs.store(true, Ordering::SeqCst);
    store.delete(kept.id).await.unwrap_err();
    assert_eq!(store.list(), vec![&kept]);

    flaky.fail_logs.store(false, Ordering::SeqCst);
    store.create(fields("NEXT", 1.0)).await.unwrap();

    let reloaded = reload(inner).await;
    let actions: Vec<LogAction> = reloaded.logs().iter().map(|e| e.action).collect();

    assert_eq!(instruments(&reloaded), vec!["KEEP", "NEXT"]);
    assert_eq!(actions, vec![LogAction::Add, LogAction::Add]);
}

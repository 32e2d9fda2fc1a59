#![allow(dead_code)]

use chrono::NaiveDate;
use std::sync::Arc;
use trade_journal::{
    data_sources::baas::memory_client::MemoryTableClient,
    models::{
        database::{local_db::LocalDb, remote_db::RemoteDb},
        trade::{Direction, TradeFields},
        trade_builder::TradeBuilder,
        trade_store::TradeStore,
    },
};

pub const EMAIL: &str = "trader@example.com";
pub const PASSWORD: &str = "hunter2";

pub fn fields(instrument: &str, profit_loss: f64) -> TradeFields {
    TradeBuilder::new()
        .date(NaiveDate::from_ymd_opt(2024, 4, 12).unwrap())
        .instrument(instrument)
        .direction(Direction::Long)
        .entry_price(100.0)
        .exit_price(101.5)
        .profit_loss(profit_loss)
        .build()
        .unwrap()
}

pub async fn local_store() -> TradeStore {
    TradeStore::new(Arc::new(LocalDb::in_memory().await.unwrap()))
}

pub async fn remote_store() -> (TradeStore, Arc<MemoryTableClient>) {
    let client = Arc::new(MemoryTableClient::new().with_user(EMAIL, PASSWORD));
    let db = RemoteDb::connect(client.clone(), EMAIL, PASSWORD)
        .await
        .unwrap();

    (TradeStore::new(Arc::new(db)), client)
}

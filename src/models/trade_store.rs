use crate::{
    models::{
        database::persistence_adapter::PersistenceAdapter,
        log_entry::{LogAction, LogEntry},
        log_recorder::LogRecorder,
        statistics::Statistics,
        trade::{Trade, TradeFields, TradeId},
    },
    utils::{
        constants::MIN_ID_PREFIX_LEN,
        error::{JournalError, JournalResult},
    },
};
use indexmap::IndexMap;
use log::{error, info, warn};
use std::sync::Arc;

/// In-memory trades for the session plus the activity log. Every mutation
/// records exactly one log entry and saves both collections; a failed save
/// restores the state from before the mutation.
pub struct TradeStore {
    trades: IndexMap<TradeId, Trade>,
    recorder: LogRecorder,
    adapter: Arc<dyn PersistenceAdapter>,
}

struct Checkpoint {
    trades: IndexMap<TradeId, Trade>,
    log_len: usize,
}

impl TradeStore {
    pub fn new(adapter: Arc<dyn PersistenceAdapter>) -> Self {
        Self {
            trades: IndexMap::new(),
            recorder: LogRecorder::default(),
            adapter,
        }
    }

    pub async fn load(adapter: Arc<dyn PersistenceAdapter>) -> JournalResult<Self> {
        let (trades, logs) = adapter.load_all().await?;

        info!(
            "Journal loaded with {} trades and {} log entries.",
            trades.len(),
            logs.len()
        );

        Ok(Self {
            trades: trades.into_iter().map(|t| (t.id, t)).collect(),
            recorder: LogRecorder::new(logs),
            adapter,
        })
    }

    pub async fn create(&mut self, fields: TradeFields) -> JournalResult<Trade> {
        let checkpoint = self.checkpoint();
        let trade = Trade::new(TradeId::new(), fields);

        self.trades.insert(trade.id, trade.clone());
        self.recorder.record(
            LogAction::Add,
            trade.id,
            &trade.fields.instrument,
            format!(
                "Added {} {} @ {}",
                trade.fields.direction, trade.fields.instrument, trade.fields.entry_price
            ),
        );
        self.persist(checkpoint).await?;

        info!("Added trade {} ({}).", trade.id, trade.fields.instrument);

        Ok(trade)
    }

    /// Replaces the whole record, keeping its id.
    pub async fn update(&mut self, id: TradeId, fields: TradeFields) -> JournalResult<Trade> {
        if !self.trades.contains_key(&id) {
            warn!("Refusing to update unknown trade {}.", id);
            return Err(JournalError::NotFound(id));
        }

        let checkpoint = self.checkpoint();
        let trade = Trade::new(id, fields);

        self.trades.insert(id, trade.clone());
        self.recorder.record(
            LogAction::Edit,
            id,
            &trade.fields.instrument,
            format!(
                "Edited {} {}",
                trade.fields.direction, trade.fields.instrument
            ),
        );
        self.persist(checkpoint).await?;

        info!("Edited trade {} ({}).", id, trade.fields.instrument);

        Ok(trade)
    }

    /// Unknown ids are ignored: nothing is logged or saved and `None` is
    /// returned.
    pub async fn delete(&mut self, id: TradeId) -> JournalResult<Option<Trade>> {
        let checkpoint = self.checkpoint();
        let trade = match self.trades.shift_remove(&id) {
            Some(trade) => trade,
            None => return Ok(None),
        };

        self.recorder.record(
            LogAction::Delete,
            id,
            &trade.fields.instrument,
            format!(
                "Deleted {} {}",
                trade.fields.direction, trade.fields.instrument
            ),
        );
        self.persist(checkpoint).await?;

        info!("Deleted trade {} ({}).", id, trade.fields.instrument);

        Ok(Some(trade))
    }

    /// Trades in insertion order. Views decide their own ordering.
    pub fn list(&self) -> Vec<&Trade> {
        self.trades.values().collect()
    }

    pub fn get(&self, id: TradeId) -> Option<&Trade> {
        self.trades.get(&id)
    }

    pub fn contains(&self, id: TradeId) -> bool {
        self.trades.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.trades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }

    pub fn logs(&self) -> &[LogEntry] {
        self.recorder.entries()
    }

    pub fn statistics(&self) -> Statistics {
        Statistics::from_trades(self.trades.values())
    }

    /// Resolves a full id or a unique leading fragment of one.
    pub fn find_by_prefix(&self, prefix: &str) -> Option<TradeId> {
        let prefix = prefix.trim().to_lowercase();

        if let Ok(id) = prefix.parse::<TradeId>() {
            return self.contains(id).then_some(id);
        }

        if prefix.len() < MIN_ID_PREFIX_LEN {
            return None;
        }

        let mut matches = self
            .trades
            .keys()
            .filter(|id| id.to_string().starts_with(&prefix));

        match (matches.next(), matches.next()) {
            (Some(id), None) => Some(*id),
            _ => None,
        }
    }

    fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            trades: self.trades.clone(),
            log_len: self.recorder.len(),
        }
    }

    async fn persist(&mut self, checkpoint: Checkpoint) -> JournalResult<()> {
        let trades: Vec<Trade> = self.trades.values().cloned().collect();
        let result = self.adapter.save_all(&trades, self.recorder.entries()).await;

        if let Err(e) = result {
            error!("Saving journal failed, mutation rolled back: {}", e);
            self.trades = checkpoint.trades;
            self.recorder.truncate(checkpoint.log_len);
            return Err(e.into());
        }

        Ok(())
    }
}

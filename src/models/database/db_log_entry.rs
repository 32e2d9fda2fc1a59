use crate::models::{
    log_entry::{LogAction, LogEntry, LogId},
    trade::TradeId,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Row shape of the remote `trade_logs` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DBLogEntry {
    pub id: LogId,
    pub user_id: String,
    pub timestamp: DateTime<Utc>,
    pub action: LogAction,
    pub trade_id: TradeId,
    pub instrument: String,
    pub details: String,
}

impl DBLogEntry {
    pub fn from_entry(entry: &LogEntry, user_id: &str) -> Self {
        Self {
            id: entry.id,
            user_id: user_id.to_string(),
            timestamp: entry.timestamp,
            action: entry.action,
            trade_id: entry.trade_id,
            instrument: entry.instrument.clone(),
            details: entry.details.clone(),
        }
    }
}

impl From<DBLogEntry> for LogEntry {
    fn from(row: DBLogEntry) -> Self {
        LogEntry {
            id: row.id,
            timestamp: row.timestamp,
            action: row.action,
            trade_id: row.trade_id,
            instrument: row.instrument,
            details: row.details,
        }
    }
}

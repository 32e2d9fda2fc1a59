use crate::models::{
    log_entry::{LogAction, LogEntry, LogId},
    trade::TradeId,
};
use chrono::Utc;

/// Append-only activity log. The owning `TradeStore` persists both
/// collections right after each `record` call.
#[derive(Debug, Clone, Default)]
pub struct LogRecorder {
    entries: Vec<LogEntry>,
}

impl LogRecorder {
    pub fn new(entries: Vec<LogEntry>) -> Self {
        Self { entries }
    }

    pub fn record(
        &mut self,
        action: LogAction,
        trade_id: TradeId,
        instrument: &str,
        details: String,
    ) -> &LogEntry {
        // Clamp so entries stay ordered even if the wall clock steps back.
        let now = Utc::now();
        let timestamp = match self.entries.iter().map(|e| e.timestamp).max() {
            Some(latest) if latest > now => latest,
            _ => now,
        };

        self.entries.push(LogEntry {
            id: LogId::new(),
            timestamp,
            action,
            trade_id,
            instrument: instrument.to_string(),
            details,
        });

        &self.entries[self.entries.len() - 1]
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops entries recorded after `len`. Only used to undo a mutation whose
    /// save failed, so the log never holds an entry that was not persisted.
    pub(crate) fn truncate(&mut self, len: usize) {
        self.entries.truncate(len);
    }
}

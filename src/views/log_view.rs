use crate::models::{
    log_entry::{LogAction, LogEntry},
    trade::TradeId,
};
use std::fmt::{Display, Formatter};

pub const REMOVED_PLACEHOLDER: &str = "(removed)";

#[derive(Debug, Clone, PartialEq)]
pub struct LogRow {
    pub timestamp: String,
    pub action: LogAction,
    pub trade_id: TradeId,
    /// False once the referenced trade has been deleted.
    pub trade_exists: bool,
    pub instrument: String,
    pub details: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogView {
    /// Newest entry first.
    pub rows: Vec<LogRow>,
}

pub fn render<F>(entries: &[LogEntry], trade_exists: F) -> LogView
where
    F: Fn(TradeId) -> bool,
{
    let mut entries: Vec<&LogEntry> = entries.iter().collect();
    entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    let rows = entries
        .into_iter()
        .map(|entry| LogRow {
            timestamp: entry.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            action: entry.action,
            trade_id: entry.trade_id,
            trade_exists: trade_exists(entry.trade_id),
            instrument: entry.instrument.clone(),
            details: entry.details.clone(),
        })
        .collect();

    LogView { rows }
}

impl Display for LogView {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "== Activity Log ==")?;

        if self.rows.is_empty() {
            return writeln!(f, "No logs yet.");
        }

        writeln!(
            f,
            "{:<20} {:<7} {:<20} {:<12} {}",
            "Timestamp", "Action", "Trade ID", "Instrument", "Details"
        )?;

        for row in &self.rows {
            let id = row.trade_id.to_string();
            let trade = if row.trade_exists {
                id[..8].to_string()
            } else {
                format!("{} {}", &id[..8], REMOVED_PLACEHOLDER)
            };
            let instrument = if row.instrument.is_empty() {
                "-"
            } else {
                row.instrument.as_str()
            };

            writeln!(
                f,
                "{:<20} {:<7} {:<20} {:<12} {}",
                row.timestamp,
                row.action.to_string(),
                trade,
                instrument,
                row.details
            )?;
        }

        Ok(())
    }
}

/// Key holding the JSON array of trades in the local key-value store.
pub const TRADES_KEY: &str = "trading_journal_trades";

/// Key holding the JSON array of log entries in the local key-value store.
pub const LOGS_KEY: &str = "trading_journal_logs";

pub const REMOTE_TRADES_TABLE: &str = "trades";
pub const REMOTE_LOGS_TABLE: &str = "trade_logs";

/// Column every remote row is owned by.
pub const OWNER_COLUMN: &str = "user_id";

/// Characters of notes shown on the dashboard before truncation.
pub const NOTES_PREVIEW_LEN: usize = 30;

pub const DEFAULT_DB_PATH: &str = "trading_journal.db";

/// Shortest id prefix accepted from the terminal.
pub const MIN_ID_PREFIX_LEN: usize = 4;

/// Rows requested per page when reading a remote table.
pub const REMOTE_PAGE_SIZE: usize = 1000;

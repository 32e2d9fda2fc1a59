use crate::models::trade::TradeId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum JournalError {
    #[error("Trade {0} not found.")]
    NotFound(TradeId),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// Rejected form input. Never reaches the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required.")]
    Missing(&'static str),

    #[error("{field} must be {expected}, got '{value}'.")]
    Invalid {
        field: &'static str,
        expected: &'static str,
        value: String,
    },
}

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("Unable to (de)serialize journal data: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Request to remote store failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Remote store responded with {status}: {body}")]
    Remote { status: u16, body: String },

    #[error("Remote sync state is unusable after a panic.")]
    SyncState,
}

pub type JournalResult<T> = Result<T, JournalError>;

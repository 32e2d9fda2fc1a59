use crate::{
    models::{log_entry::LogEntry, trade::Trade},
    utils::error::PersistenceError,
};
use async_trait::async_trait;

/// Durable storage for the journal. The store and the recorder only ever
/// talk to this trait, so the local and remote backends are interchangeable.
#[async_trait]
pub trait PersistenceAdapter: Send + Sync {
    /// An empty or never written backend yields two empty collections.
    async fn load_all(&self) -> Result<(Vec<Trade>, Vec<LogEntry>), PersistenceError>;

    async fn save_all(&self, trades: &[Trade], logs: &[LogEntry]) -> Result<(), PersistenceError>;
}

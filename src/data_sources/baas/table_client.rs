use crate::utils::error::PersistenceError;
use async_trait::async_trait;
use serde_json::Value;

/// Authenticated identity against the hosted table store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub access_token: String,
    pub user_id: String,
}

/// Request/response calls against a per-user table store. Every read and
/// delete is scoped to `session.user_id`; rows written must already carry it
/// in their owner column.
#[async_trait]
pub trait TableClient: Send + Sync {
    async fn authenticate(&self, email: &str, password: &str) -> Result<Session, PersistenceError>;

    async fn select_all(&self, session: &Session, table: &str) -> Result<Vec<Value>, PersistenceError>;

    /// Inserts new rows and replaces rows whose `id` already exists.
    async fn upsert(
        &self,
        session: &Session,
        table: &str,
        rows: Vec<Value>,
    ) -> Result<(), PersistenceError>;

    async fn delete(&self, session: &Session, table: &str, ids: &[String]) -> Result<(), PersistenceError>;
}

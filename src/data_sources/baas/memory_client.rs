use crate::{
    data_sources::baas::table_client::{Session, TableClient},
    utils::{constants::OWNER_COLUMN, error::PersistenceError},
};
use async_trait::async_trait;
use serde_json::Value;
use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, Ordering},
        Mutex,
    },
};
use uuid::Uuid;

/// In-process stand-in for the hosted table store. Enforces the same owner
/// scoping the hosted store applies through row level security.
#[derive(Default)]
pub struct MemoryTableClient {
    users: Mutex<HashMap<String, (String, String)>>,
    tables: Mutex<HashMap<String, Vec<Value>>>,
    fail_writes: AtomicBool,
}

impl MemoryTableClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers credentials and returns the user id they authenticate as.
    pub fn with_user(self, email: &str, password: &str) -> Self {
        self.add_user(email, password);
        self
    }

    pub fn add_user(&self, email: &str, password: &str) -> String {
        let user_id = Uuid::new_v4().to_string();
        self.users
            .lock()
            .expect("users lock poisoned")
            .insert(email.to_string(), (password.to_string(), user_id.clone()));
        user_id
    }

    /// Makes every following upsert/delete fail like an unreachable service.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Raw rows of a table regardless of owner.
    pub fn rows(&self, table: &str) -> Vec<Value> {
        self.tables
            .lock()
            .expect("tables lock poisoned")
            .get(table)
            .cloned()
            .unwrap_or_default()
    }

    fn check_writable(&self) -> Result<(), PersistenceError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(PersistenceError::Remote {
                status: 503,
                body: "service unavailable".to_string(),
            });
        }
        Ok(())
    }

    fn check_session(&self, session: &Session) -> Result<(), PersistenceError> {
        let users = self.users.lock().expect("users lock poisoned");
        let known = users.values().any(|(_, user_id)| *user_id == session.user_id);

        if known && session.access_token == format!("token-{}", session.user_id) {
            Ok(())
        } else {
            Err(PersistenceError::Auth("invalid session".to_string()))
        }
    }
}

fn owner_of(row: &Value) -> Option<&str> {
    row.get(OWNER_COLUMN).and_then(Value::as_str)
}

fn id_of(row: &Value) -> Option<String> {
    row.get("id").map(|id| match id {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    })
}

#[async_trait]
impl TableClient for MemoryTableClient {
    async fn authenticate(&self, email: &str, password: &str) -> Result<Session, PersistenceError> {
        let users = self.users.lock().expect("users lock poisoned");

        match users.get(email) {
            Some((expected, user_id)) if expected == password => Ok(Session {
                access_token: format!("token-{}", user_id),
                user_id: user_id.clone(),
            }),
            _ => Err(PersistenceError::Auth(
                "Invalid login credentials".to_string(),
            )),
        }
    }

    async fn select_all(&self, session: &Session, table: &str) -> Result<Vec<Value>, PersistenceError> {
        self.check_session(session)?;

        Ok(self
            .rows(table)
            .into_iter()
            .filter(|row| owner_of(row) == Some(session.user_id.as_str()))
            .collect())
    }

    async fn upsert(
        &self,
        session: &Session,
        table: &str,
        rows: Vec<Value>,
    ) -> Result<(), PersistenceError> {
        self.check_session(session)?;
        self.check_writable()?;

        if rows
            .iter()
            .any(|row| owner_of(row) != Some(session.user_id.as_str()))
        {
            return Err(PersistenceError::Auth(
                "row owner does not match session".to_string(),
            ));
        }

        let mut tables = self.tables.lock().expect("tables lock poisoned");
        let stored = tables.entry(table.to_string()).or_default();

        for row in rows {
            let id = id_of(&row);
            match stored
                .iter()
                .position(|existing| id.is_some() && id_of(existing) == id)
            {
                Some(index) => stored[index] = row,
                None => stored.push(row),
            }
        }

        Ok(())
    }

    async fn delete(&self, session: &Session, table: &str, ids: &[String]) -> Result<(), PersistenceError> {
        self.check_session(session)?;
        self.check_writable()?;

        let mut tables = self.tables.lock().expect("tables lock poisoned");
        if let Some(stored) = tables.get_mut(table) {
            stored.retain(|row| {
                let owned = owner_of(row) == Some(session.user_id.as_str());
                let targeted = id_of(row).map_or(false, |id| ids.contains(&id));
                !(owned && targeted)
            });
        }

        Ok(())
    }
}

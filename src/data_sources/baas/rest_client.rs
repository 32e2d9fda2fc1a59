use crate::{
    data_sources::baas::table_client::{Session, TableClient},
    utils::{
        constants::{OWNER_COLUMN, REMOTE_PAGE_SIZE},
        error::PersistenceError,
    },
};
use async_trait::async_trait;
use log::debug;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};

/// Hosted backend reached over its REST API: password grant for auth,
/// PostgREST style table endpoints for rows.
pub struct RestTableClient {
    http: Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct AuthResponse {
    access_token: String,
    user: AuthUser,
}

#[derive(Debug, Deserialize)]
struct AuthUser {
    id: String,
}

impl RestTableClient {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn authorized(&self, request: RequestBuilder, session: &Session) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .bearer_auth(&session.access_token)
    }

    async fn check(response: Response) -> Result<Response, PersistenceError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(PersistenceError::Auth(body)),
            _ => Err(PersistenceError::Remote {
                status: status.as_u16(),
                body,
            }),
        }
    }
}

#[async_trait]
impl TableClient for RestTableClient {
    async fn authenticate(&self, email: &str, password: &str) -> Result<Session, PersistenceError> {
        let url = format!("{}/auth/v1/token?grant_type=password", self.base_url);

        let response = self
            .http
            .post(url)
            .header("apikey", &self.api_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PersistenceError::Auth(format!("{}: {}", status, body)));
        }

        let auth: AuthResponse = response.json().await?;

        Ok(Session {
            access_token: auth.access_token,
            user_id: auth.user.id,
        })
    }

    /// Pages through the owner's rows until the service returns an empty
    /// page. The service may cap a page below the requested size.
    async fn select_all(&self, session: &Session, table: &str) -> Result<Vec<Value>, PersistenceError> {
        let owner_filter = format!("eq.{}", session.user_id);
        let limit = REMOTE_PAGE_SIZE.to_string();
        let mut rows: Vec<Value> = Vec::new();

        loop {
            let offset = rows.len().to_string();
            let request = self.http.get(self.table_url(table)).query(&[
                ("select", "*"),
                (OWNER_COLUMN, owner_filter.as_str()),
                ("order", "id.asc"),
                ("limit", limit.as_str()),
                ("offset", offset.as_str()),
            ]);

            let response = Self::check(self.authorized(request, session).send().await?).await?;
            let page: Vec<Value> = response.json().await?;

            if page.is_empty() {
                break;
            }
            rows.extend(page);
        }

        debug!("Fetched {} rows from {}.", rows.len(), table);

        Ok(rows)
    }

    async fn upsert(
        &self,
        session: &Session,
        table: &str,
        rows: Vec<Value>,
    ) -> Result<(), PersistenceError> {
        if rows.is_empty() {
            return Ok(());
        }

        let count = rows.len();
        let request = self
            .http
            .post(self.table_url(table))
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(&rows);

        Self::check(self.authorized(request, session).send().await?).await?;

        debug!("Upserted {} rows into {}.", count, table);

        Ok(())
    }

    async fn delete(&self, session: &Session, table: &str, ids: &[String]) -> Result<(), PersistenceError> {
        if ids.is_empty() {
            return Ok(());
        }

        let owner_filter = format!("eq.{}", session.user_id);
        let id_filter = format!("in.({})", ids.join(","));
        let request = self
            .http
            .delete(self.table_url(table))
            .query(&[(OWNER_COLUMN, owner_filter.as_str()), ("id", id_filter.as_str())]);

        Self::check(self.authorized(request, session).send().await?).await?;

        debug!("Deleted {} rows from {}.", ids.len(), table);

        Ok(())
    }
}

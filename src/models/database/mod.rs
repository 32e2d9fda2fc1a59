pub mod db_log_entry;
pub mod db_trade;
pub mod local_db;
pub mod persistence_adapter;
pub mod remote_db;

use crate::{
    data_sources::baas::{memory_client::MemoryTableClient, rest_client::RestTableClient},
    models::database::{
        local_db::LocalDb, persistence_adapter::PersistenceAdapter, remote_db::RemoteDb,
    },
    utils::config::{Backend, Config},
};
use anyhow::Result;
use log::info;
use std::sync::Arc;

const MEMORY_EMAIL: &str = "journal@memory.local";
const MEMORY_PASSWORD: &str = "memory";

/// Opens the backend selected in the config. Only one is ever active.
pub async fn connect(config: &Config) -> Result<Arc<dyn PersistenceAdapter>> {
    let adapter: Arc<dyn PersistenceAdapter> = match &config.backend {
        Backend::Local { db_path } => {
            info!("Using local store at {}.", db_path.display());
            Arc::new(LocalDb::open(db_path).await?)
        }
        Backend::Remote(settings) => {
            info!("Using remote store at {}.", settings.url);
            let client = Arc::new(RestTableClient::new(&settings.url, &settings.api_key));
            Arc::new(RemoteDb::connect(client, &settings.email, &settings.password).await?)
        }
        Backend::Memory => {
            info!("Using in-memory store, nothing will be kept on exit.");
            let client = Arc::new(MemoryTableClient::new().with_user(MEMORY_EMAIL, MEMORY_PASSWORD));
            Arc::new(RemoteDb::connect(client, MEMORY_EMAIL, MEMORY_PASSWORD).await?)
        }
    };

    Ok(adapter)
}

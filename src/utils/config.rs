use crate::utils::constants::DEFAULT_DB_PATH;
use anyhow::{anyhow, Result};
use std::{env, path::PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteSettings {
    pub url: String,
    pub api_key: String,
    pub email: String,
    pub password: String,
}

/// Storage strategy picked once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backend {
    Local { db_path: PathBuf },
    Remote(RemoteSettings),
    Memory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub backend: Backend,
}

impl Config {
    /// Reads settings from the process environment. Call `dotenv` first to
    /// pick up a `.env` file.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .ok_or(anyhow!("{} is required for the remote backend.", key))
        };

        let backend_name = lookup("JOURNAL_BACKEND").unwrap_or_else(|| "local".to_string());

        let backend = match backend_name.trim().to_lowercase().as_str() {
            "local" => Backend::Local {
                db_path: lookup("JOURNAL_DB_PATH")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH)),
            },
            "remote" => Backend::Remote(RemoteSettings {
                url: required("JOURNAL_REMOTE_URL")?
                    .trim_end_matches('/')
                    .to_string(),
                api_key: required("JOURNAL_REMOTE_KEY")?,
                email: required("JOURNAL_EMAIL")?,
                password: required("JOURNAL_PASSWORD")?,
            }),
            "memory" => Backend::Memory,
            other => {
                return Err(anyhow!(
                    "Unknown JOURNAL_BACKEND '{}', expected local, remote or memory.",
                    other
                ))
            }
        };

        Ok(Self { backend })
    }
}

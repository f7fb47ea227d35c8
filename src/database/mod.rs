pub mod json_store;
#[cfg(test)]
pub mod memory;
pub mod migrations;
pub mod models;
pub mod sqlite_store;

pub use json_store::JsonFileStore;
pub use sqlite_store::SqliteStore;

use crate::config::Config;
use crate::ledger::LedgerState;
use std::future::Future;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed data in {path}: {source}")]
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to encode ledger: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("corrupt row: {0}")]
    Corrupt(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error("background write task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[cfg(test)]
    #[error("simulated write failure")]
    Simulated,
}

/// Durable home of the ledger and roster. `persist` replaces everything
/// stored with `state`; partial writes must never be visible to `load`.
pub trait LedgerStore: Send + Sync {
    fn load(&self) -> impl Future<Output = Result<LedgerState, StoreError>> + Send;

    fn persist(&self, state: &LedgerState) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// Backend chosen from configuration at startup.
pub enum StoreBackend {
    Json(JsonFileStore),
    Sqlite(SqliteStore),
}

impl LedgerStore for StoreBackend {
    fn load(&self) -> impl Future<Output = Result<LedgerState, StoreError>> + Send {
        async move {
            match self {
                StoreBackend::Json(store) => store.load().await,
                StoreBackend::Sqlite(store) => store.load().await,
            }
        }
    }

    fn persist(&self, state: &LedgerState) -> impl Future<Output = Result<(), StoreError>> + Send {
        async move {
            match self {
                StoreBackend::Json(store) => store.persist(state).await,
                StoreBackend::Sqlite(store) => store.persist(state).await,
            }
        }
    }
}

pub async fn open_store(config: &Config) -> Result<StoreBackend, StoreError> {
    match &config.database_url {
        Some(url) => {
            tracing::info!("Using SQLite ledger store at {}", url);
            Ok(StoreBackend::Sqlite(SqliteStore::connect(url).await?))
        }
        None => {
            tracing::info!(
                "Using JSON ledger store at {} and {}",
                config.ledger_path.display(),
                config.roster_path.display()
            );
            Ok(StoreBackend::Json(JsonFileStore::new(
                config.ledger_path.clone(),
                config.roster_path.clone(),
            )))
        }
    }
}

//! Persistence capability consumed by the account workflows.
//!
//! Workflows only ever see `Arc<dyn Storage>`; the process wires one long-lived
//! backend at startup and hands it to every request.

mod memory;
mod postgres;

pub use self::memory::MemoryStorage;
pub use self::postgres::PgStorage;

use super::{Account, AccountField};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    /// A unique constraint on `field` rejected the write.
    #[error("unique constraint violated on {0}")]
    Conflict(AccountField),
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

#[async_trait]
pub trait Storage: Send + Sync {
    /// Single-document lookup; `Ok(None)` when nothing matches.
    async fn find_one(
        &self,
        field: AccountField,
        value: &str,
    ) -> Result<Option<Account>, StorageError>;

    /// Persist a new account. Duplicate `id`, `username` or `mail` values are
    /// rejected with [`StorageError::Conflict`].
    async fn insert_one(&self, account: &Account) -> Result<(), StorageError>;

    /// Cheap liveness probe used by the health endpoint.
    async fn ping(&self) -> Result<(), StorageError>;
}

/// Pick a backend from the connection string: `memory://` keeps everything in
/// process, anything else is handed to Postgres.
///
/// # Errors
/// Returns an error if the database cannot be reached or the schema cannot be applied.
pub async fn connect(dsn: &str, max_connections: u32) -> anyhow::Result<Arc<dyn Storage>> {
    if dsn.starts_with("memory:") {
        return Ok(Arc::new(MemoryStorage::new()));
    }

    let storage = PgStorage::connect(dsn, max_connections).await?;
    storage.apply_schema().await?;

    Ok(Arc::new(storage))
}

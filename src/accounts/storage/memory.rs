use super::{Storage, StorageError};
use crate::accounts::{Account, AccountField};
use async_trait::async_trait;
use tokio::sync::RwLock;

/// In-process backend. The uniqueness check and the insert run under one write
/// lock, so concurrent creations cannot both win.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    accounts: RwLock<Vec<Account>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.accounts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.accounts.read().await.is_empty()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn find_one(
        &self,
        field: AccountField,
        value: &str,
    ) -> Result<Option<Account>, StorageError> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .iter()
            .find(|account| field.value_of(account) == value)
            .cloned())
    }

    async fn insert_one(&self, account: &Account) -> Result<(), StorageError> {
        let mut accounts = self.accounts.write().await;

        for field in [AccountField::Id, AccountField::Username, AccountField::Mail] {
            let value = field.value_of(account);
            if accounts.iter().any(|stored| field.value_of(stored) == value) {
                return Err(StorageError::Conflict(field));
            }
        }

        accounts.push(account.clone());

        Ok(())
    }

    async fn ping(&self) -> Result<(), StorageError> {
        Ok(())
    }
}

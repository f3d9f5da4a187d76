use super::{
    storage::{Storage, StorageError},
    AccountField,
};
use tracing::{debug, instrument};

/// Whether any stored account already holds `value` in `field`.
///
/// Always asks storage; nothing is cached between calls.
///
/// # Errors
/// Propagates storage failures; "not found" is `Ok(false)`.
#[instrument(skip(storage, value))]
pub async fn exists_by_field(
    storage: &dyn Storage,
    field: AccountField,
    value: &str,
) -> Result<bool, StorageError> {
    let exists = storage.find_one(field, value).await?.is_some();

    debug!(exists, "uniqueness check on {field}");

    Ok(exists)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::{
        storage::MemoryStorage,
        tests::{sample_account, FailingStorage},
    };

    #[tokio::test]
    async fn reports_existing_and_missing_values() -> Result<(), StorageError> {
        let storage = MemoryStorage::new();
        storage.insert_one(&sample_account()).await?;

        assert!(exists_by_field(&storage, AccountField::Username, "alice123").await?);
        assert!(exists_by_field(&storage, AccountField::Mail, "alice@example.com").await?);
        assert!(!exists_by_field(&storage, AccountField::Username, "bob12345").await?);
        assert!(!exists_by_field(&storage, AccountField::Mail, "bob@example.com").await?);
        Ok(())
    }

    #[tokio::test]
    async fn storage_failure_is_not_false() {
        let result = exists_by_field(
            &FailingStorage { fail_lookups: true },
            AccountField::Username,
            "alice123",
        )
        .await;
        assert!(matches!(result, Err(StorageError::Backend(_))));
    }
}

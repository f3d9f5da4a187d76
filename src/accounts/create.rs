//! Account creation.
//!
//! Flow Overview:
//! 1) Require all five input fields.
//! 2) Validate fields, checking username and mail uniqueness as they come up.
//! 3) Mint the token and id.
//! 4) Insert; a unique-constraint conflict from storage is a duplicate too.

use super::{
    storage::Storage,
    token::{self, ID_BYTES, TOKEN_BYTES},
    uniqueness::exists_by_field,
    validate::{self, NewAccount},
    Account, AccountError, AccountField,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use tracing::{debug, info, instrument, warn};
use utoipa::ToSchema;

/// Where a creation request currently stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CreationState {
    Received,
    Validated,
    UniquenessChecked,
    TokenIssued,
    Persisted,
    Completed,
    Rejected,
    Failed,
}

/// The only response that ever carries the token.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CreatedAccount {
    pub token: String,
    pub id: String,
}

impl fmt::Debug for CreatedAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreatedAccount")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

/// Create an account from a raw JSON body.
///
/// # Errors
/// `MissingField`/`ValidationFailed`/`DuplicateField` reject the request;
/// `StorageFailure`/`Entropy` mean it could not be completed.
#[instrument(skip_all)]
pub async fn create_account(
    storage: &dyn Storage,
    body: &Map<String, Value>,
) -> Result<CreatedAccount, AccountError> {
    let mut state = CreationState::Received;
    debug!(?state);

    let result = run(storage, body, &mut state).await;

    match &result {
        Ok(created) => {
            state = CreationState::Completed;
            info!(id = %created.id, ?state, "account created");
        }
        Err(err) if err.is_internal() => {
            state = CreationState::Failed;
            warn!(?state, "account creation failed: {err}");
        }
        Err(err) => {
            state = CreationState::Rejected;
            debug!(?state, "account creation rejected: {err}");
        }
    }

    result
}

async fn run(
    storage: &dyn Storage,
    body: &Map<String, Value>,
    state: &mut CreationState,
) -> Result<CreatedAccount, AccountError> {
    let input = validate::require_fields(body)?;
    *state = CreationState::Validated;
    debug!(?state);

    check(storage, &input).await?;
    *state = CreationState::UniquenessChecked;
    debug!(?state);

    let account = Account {
        token: token::generate(TOKEN_BYTES).map_err(AccountError::Entropy)?,
        id: token::generate(ID_BYTES).map_err(AccountError::Entropy)?,
        name: input.name,
        username: input.username,
        mail: input.mail,
        password: input.password,
    };
    *state = CreationState::TokenIssued;
    debug!(?state);

    storage.insert_one(&account).await?;
    *state = CreationState::Persisted;
    debug!(?state);

    Ok(CreatedAccount {
        token: account.token,
        id: account.id,
    })
}

/// Field rules and uniqueness checks, in the order their errors are reported.
async fn check(storage: &dyn Storage, input: &NewAccount) -> Result<(), AccountError> {
    validate::username(&input.username)?;

    if exists_by_field(storage, AccountField::Username, &input.username).await? {
        return Err(AccountError::DuplicateField(AccountField::Username));
    }

    validate::name(&input.name)?;
    validate::mail(&input.mail)?;

    if exists_by_field(storage, AccountField::Mail, &input.mail).await? {
        return Err(AccountError::DuplicateField(AccountField::Mail));
    }

    validate::password(&input.password, &input.confirm_password)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::{storage::MemoryStorage, tests::FailingStorage};
    use serde_json::json;

    fn body(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    fn alice() -> Map<String, Value> {
        body(json!({
            "username": "alice123",
            "name": "Alice",
            "mail": "alice@example.com",
            "password": "longenoughpw",
            "confirm_password": "longenoughpw",
        }))
    }

    fn is_hex(value: &str) -> bool {
        value.chars().all(|c| c.is_ascii_hexdigit())
    }

    #[tokio::test]
    async fn creates_account_with_fresh_credentials() -> Result<(), AccountError> {
        let storage = MemoryStorage::new();
        let created = create_account(&storage, &alice()).await?;

        assert_eq!(created.id.len(), 40);
        assert_eq!(created.token.len(), 200);
        assert!(is_hex(&created.id));
        assert!(is_hex(&created.token));

        let stored = storage
            .find_one(AccountField::Id, &created.id)
            .await?
            .ok_or(AccountError::NotFound)?;
        assert_eq!(stored.token, created.token);
        assert_eq!(stored.username, "alice123");
        assert_eq!(stored.name, "Alice");
        assert_eq!(stored.mail, "alice@example.com");
        assert_eq!(stored.password, "longenoughpw");
        Ok(())
    }

    #[tokio::test]
    async fn rejects_duplicate_username() -> Result<(), AccountError> {
        let storage = MemoryStorage::new();
        create_account(&storage, &alice()).await?;

        let mut second = alice();
        second.insert("mail".to_string(), json!("other@example.com"));
        let result = create_account(&storage, &second).await;

        assert!(matches!(
            result,
            Err(AccountError::DuplicateField(AccountField::Username))
        ));
        assert_eq!(storage.len().await, 1);
        Ok(())
    }

    #[tokio::test]
    async fn rejects_duplicate_mail() -> Result<(), AccountError> {
        let storage = MemoryStorage::new();
        create_account(&storage, &alice()).await?;

        let mut second = alice();
        second.insert("username".to_string(), json!("alice456"));
        let result = create_account(&storage, &second).await;

        assert!(matches!(
            result,
            Err(AccountError::DuplicateField(AccountField::Mail))
        ));
        Ok(())
    }

    #[tokio::test]
    async fn username_uniqueness_is_reported_before_name_length() -> Result<(), AccountError> {
        let storage = MemoryStorage::new();
        create_account(&storage, &alice()).await?;

        let mut second = alice();
        second.insert("name".to_string(), json!("A"));
        let result = create_account(&storage, &second).await;

        assert!(matches!(
            result,
            Err(AccountError::DuplicateField(AccountField::Username))
        ));
        Ok(())
    }

    #[tokio::test]
    async fn first_failing_rule_wins() {
        let storage = MemoryStorage::new();
        let mut input = alice();
        input.insert("username".to_string(), json!("abc"));
        input.insert("mail".to_string(), json!("broken"));

        let Err(err) = create_account(&storage, &input).await else {
            panic!("invalid input accepted");
        };
        assert!(err.to_string().contains("username"));
    }

    #[tokio::test]
    async fn missing_field_is_rejected_before_storage() {
        let mut input = alice();
        input.remove("password");

        // lookups would fail if they were reached
        let storage = FailingStorage { fail_lookups: true };
        let result = create_account(&storage, &input).await;

        assert!(matches!(result, Err(AccountError::MissingField(_))));
    }

    #[tokio::test]
    async fn password_mismatch_is_rejected() {
        let storage = MemoryStorage::new();
        let mut input = alice();
        input.insert("confirm_password".to_string(), json!("longenoughpX"));

        let result = create_account(&storage, &input).await;

        assert!(matches!(result, Err(AccountError::ValidationFailed(_))));
        assert!(storage.is_empty().await);
    }

    #[tokio::test]
    async fn lookup_failure_is_storage_failure() {
        let storage = FailingStorage { fail_lookups: true };
        let result = create_account(&storage, &alice()).await;
        assert!(matches!(result, Err(AccountError::StorageFailure(_))));
    }

    #[tokio::test]
    async fn insert_failure_is_storage_failure() {
        let storage = FailingStorage {
            fail_lookups: false,
        };
        let result = create_account(&storage, &alice()).await;
        assert!(matches!(result, Err(AccountError::StorageFailure(_))));
    }

    #[tokio::test]
    async fn concurrent_creations_yield_one_account() {
        let storage = std::sync::Arc::new(MemoryStorage::new());
        let mut handles = Vec::new();

        for _ in 0..8 {
            let storage = storage.clone();
            handles.push(tokio::spawn(async move {
                create_account(storage.as_ref(), &alice()).await
            }));
        }

        let mut created = 0;
        for handle in handles {
            match handle.await {
                Ok(Ok(_)) => created += 1,
                Ok(Err(err)) => assert!(matches!(err, AccountError::DuplicateField(_))),
                Err(err) => panic!("task failed: {err}"),
            }
        }

        assert_eq!(created, 1);
        assert_eq!(storage.len().await, 1);
    }

    #[test]
    fn created_account_debug_hides_token() {
        let created = CreatedAccount {
            token: "secret-token".to_string(),
            id: "public-id".to_string(),
        };
        let rendered = format!("{created:?}");
        assert!(rendered.contains("public-id"));
        assert!(!rendered.contains("secret-token"));
    }
}

//! Account model and the workflows that create and read accounts.
//!
//! Accounts are created once through [`create::create_account`] and read back
//! either publicly (credentials stripped) or by their owner, who proves
//! ownership with the bearer token minted at creation time.

pub mod create;
pub mod error;
pub mod identity;
pub mod storage;
pub mod token;
pub mod uniqueness;
pub mod validate;

pub use self::error::AccountError;

use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Persisted identity record.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Account {
    pub token: String,
    pub id: String,
    pub name: String,
    pub username: String,
    pub mail: String,
    pub password: String,
}

// Credentials must never end up in logs.
impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Account as returned by the public lookup: `mail`, `password` and `token`
/// are always null.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PublicAccount {
    pub token: Option<String>,
    pub id: String,
    pub name: String,
    pub username: String,
    pub mail: Option<String>,
    pub password: Option<String>,
}

impl From<Account> for PublicAccount {
    fn from(account: Account) -> Self {
        Self {
            token: None,
            id: account.id,
            name: account.name,
            username: account.username,
            mail: None,
            password: None,
        }
    }
}

/// Fields an account can be looked up by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AccountField {
    Id,
    Username,
    Mail,
}

impl AccountField {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Username => "username",
            Self::Mail => "mail",
        }
    }

    /// Value of this field on the given account.
    #[must_use]
    pub fn value_of(self, account: &Account) -> &str {
        match self {
            Self::Id => &account.id,
            Self::Username => &account.username,
            Self::Mail => &account.mail,
        }
    }
}

impl fmt::Display for AccountField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use storage::{Storage, StorageError};

    /// Backend whose writes always fail; lookups fail too when `fail_lookups` is set.
    pub(crate) struct FailingStorage {
        pub(crate) fail_lookups: bool,
    }

    #[async_trait]
    impl Storage for FailingStorage {
        async fn find_one(
            &self,
            _field: AccountField,
            _value: &str,
        ) -> Result<Option<Account>, StorageError> {
            if self.fail_lookups {
                Err(StorageError::Backend(anyhow::anyhow!("connection reset by 10.0.0.7")))
            } else {
                Ok(None)
            }
        }

        async fn insert_one(&self, _account: &Account) -> Result<(), StorageError> {
            Err(StorageError::Backend(anyhow::anyhow!("connection reset by 10.0.0.7")))
        }

        async fn ping(&self) -> Result<(), StorageError> {
            Err(StorageError::Backend(anyhow::anyhow!("connection reset by 10.0.0.7")))
        }
    }

    pub(crate) fn sample_account() -> Account {
        Account {
            token: "ab".repeat(100),
            id: "cd".repeat(20),
            name: "Alice".to_string(),
            username: "alice123".to_string(),
            mail: "alice@example.com".to_string(),
            password: "longenoughpw".to_string(),
        }
    }

    #[test]
    fn public_account_strips_credentials() {
        let public = PublicAccount::from(sample_account());
        assert_eq!(public.id, "cd".repeat(20));
        assert_eq!(public.username, "alice123");
        assert_eq!(public.name, "Alice");
        assert!(public.mail.is_none());
        assert!(public.password.is_none());
        assert!(public.token.is_none());
    }

    #[test]
    fn public_account_serializes_nulls() -> anyhow::Result<()> {
        let value = serde_json::to_value(PublicAccount::from(sample_account()))?;
        assert_eq!(value.get("mail"), Some(&serde_json::Value::Null));
        assert_eq!(value.get("password"), Some(&serde_json::Value::Null));
        assert_eq!(value.get("token"), Some(&serde_json::Value::Null));
        Ok(())
    }

    #[test]
    fn debug_hides_credentials() {
        let rendered = format!("{:?}", sample_account());
        assert!(rendered.contains("alice123"));
        assert!(!rendered.contains("longenoughpw"));
        assert!(!rendered.contains("alice@example.com"));
        assert!(!rendered.contains(&"ab".repeat(100)));
    }

    #[test]
    fn field_value_of() {
        let account = sample_account();
        assert_eq!(AccountField::Username.value_of(&account), "alice123");
        assert_eq!(AccountField::Mail.value_of(&account), "alice@example.com");
        assert_eq!(AccountField::Id.value_of(&account), "cd".repeat(20));
        assert_eq!(AccountField::Mail.to_string(), "mail");
    }
}

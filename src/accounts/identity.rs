//! Reading accounts back: public profiles and token-authenticated self lookup.

use super::{storage::Storage, Account, AccountError, AccountField, PublicAccount};
use tracing::{debug, instrument};

/// Fetch an account for anyone to see, with `mail`, `password` and `token` removed.
///
/// # Errors
/// `NotFound` when no account has this id, `StorageFailure` when the lookup fails.
#[instrument(skip(storage))]
pub async fn public_profile(storage: &dyn Storage, id: &str) -> Result<PublicAccount, AccountError> {
    let account = fetch(storage, id).await?;

    Ok(PublicAccount::from(account))
}

/// Return the full account when `token` is the one minted for it.
///
/// # Errors
/// `NotFound`/`StorageFailure` from the lookup, `AuthenticationFailed` when the
/// stored record has no token or the tokens differ.
#[instrument(skip(storage, token))]
pub async fn authenticate(
    storage: &dyn Storage,
    id: &str,
    token: &str,
) -> Result<Account, AccountError> {
    let account = fetch(storage, id).await?;

    if account.token.is_empty() {
        return Err(AccountError::AuthenticationFailed(
            "user document doesn't have a token".to_string(),
        ));
    }

    if !constant_time_eq(account.token.as_bytes(), token.as_bytes()) {
        debug!("token mismatch");
        return Err(AccountError::AuthenticationFailed(
            "invalid token".to_string(),
        ));
    }

    Ok(account)
}

async fn fetch(storage: &dyn Storage, id: &str) -> Result<Account, AccountError> {
    storage
        .find_one(AccountField::Id, id)
        .await?
        .ok_or(AccountError::NotFound)
}

// Time depends only on the lengths, never on where the bytes differ.
fn constant_time_eq(left: &[u8], right: &[u8]) -> bool {
    if left.len() != right.len() {
        return false;
    }

    left.iter()
        .zip(right)
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}

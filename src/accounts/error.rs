use super::{storage::StorageError, AccountField};
use axum::http::StatusCode;
use thiserror::Error;

/// Every way an account operation can end without a result.
#[derive(Debug, Error)]
pub enum AccountError {
    #[error("invalid request body: {0}")]
    MalformedInput(String),
    #[error("the request body needs to have: {0}")]
    MissingField(String),
    #[error("{0}")]
    ValidationFailed(String),
    #[error("existing user with that {0}")]
    DuplicateField(AccountField),
    #[error("user not found")]
    NotFound,
    #[error("{0}")]
    AuthenticationFailed(String),
    #[error("storage failure")]
    StorageFailure(#[source] StorageError),
    #[error("could not generate credentials")]
    Entropy(#[source] anyhow::Error),
}

impl AccountError {
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::MalformedInput(_) | Self::MissingField(_) | Self::ValidationFailed(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::DuplicateField(_) => StatusCode::CONFLICT,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::AuthenticationFailed(_) => StatusCode::UNAUTHORIZED,
            Self::StorageFailure(_) | Self::Entropy(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Internal failures carry detail that must stay server side.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::StorageFailure(_) | Self::Entropy(_))
    }
}

impl From<StorageError> for AccountError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Conflict(field) => Self::DuplicateField(field),
            other => Self::StorageFailure(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes() {
        assert_eq!(
            AccountError::MissingField("token".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AccountError::DuplicateField(AccountField::Username).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(AccountError::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            AccountError::AuthenticationFailed("invalid token".to_string()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AccountError::StorageFailure(StorageError::Backend(anyhow::anyhow!("boom")))
                .status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn conflict_becomes_duplicate_field() {
        let err = AccountError::from(StorageError::Conflict(AccountField::Mail));
        assert!(matches!(err, AccountError::DuplicateField(AccountField::Mail)));
        assert_eq!(err.to_string(), "existing user with that mail");
    }

    #[test]
    fn storage_failure_message_is_generic() {
        let err = AccountError::from(StorageError::Backend(anyhow::anyhow!(
            "connection refused to 10.0.0.1"
        )));
        assert!(err.is_internal());
        assert_eq!(err.to_string(), "storage failure");
    }
}

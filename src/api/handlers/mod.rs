//! Route handlers and the response envelope they share.
//!
//! Every `/api/v1` response is `{status, message, data, exited_code}`. The
//! envelope `status` mirrors the HTTP status unless legacy mode is on, where
//! the HTTP status is always 200 and failures carry 500 in the body only.

pub mod health;
pub mod root;
pub mod users;

use crate::accounts::AccountError;
use axum::{
    body::Bytes,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::error;
use utoipa::ToSchema;

/// `exited_code` for successes and for failures on the creation path.
pub const EXIT_OK: u8 = 0;
/// `exited_code` for failures on the lookup paths and for unreadable bodies.
pub const EXIT_FAILURE: u8 = 1;

#[derive(Clone, Copy, Debug, Default)]
pub struct ApiConfig {
    legacy_status: bool,
}

impl ApiConfig {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            legacy_status: false,
        }
    }

    #[must_use]
    pub const fn with_legacy_status(mut self, legacy_status: bool) -> Self {
        self.legacy_status = legacy_status;
        self
    }

    #[must_use]
    pub const fn legacy_status(&self) -> bool {
        self.legacy_status
    }
}

/// Response envelope shared by every `/api/v1` route.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Envelope {
    pub status: u16,
    pub message: String,
    #[schema(value_type = Object)]
    pub data: Value,
    pub exited_code: u8,
}

/// Wire form of [`Envelope`]; `data` keeps its own type until serialization.
#[derive(Serialize)]
struct Reply<'a, T> {
    status: u16,
    message: &'a str,
    data: T,
    exited_code: u8,
}

/// Successful envelope with `data`.
pub fn success<T: Serialize>(message: &str, data: T) -> Response {
    let reply = Reply {
        status: StatusCode::OK.as_u16(),
        message,
        data,
        exited_code: EXIT_OK,
    };

    (StatusCode::OK, Json(reply)).into_response()
}

/// Failure envelope with null `data`. Internal errors are logged with full
/// detail here and answered with their generic message only.
pub fn failure(config: &ApiConfig, err: &AccountError, exited_code: u8) -> Response {
    if err.is_internal() {
        error!("{err}: {err:?}");
    }

    let (http_status, body_status) = if config.legacy_status() {
        (StatusCode::OK, StatusCode::INTERNAL_SERVER_ERROR)
    } else {
        (err.status_code(), err.status_code())
    };

    let message = err.to_string();
    let reply = Reply {
        status: body_status.as_u16(),
        message: &message,
        data: (),
        exited_code,
    };

    (http_status, Json(reply)).into_response()
}

/// Parse a request body as a JSON object.
///
/// # Errors
/// `MalformedInput` when the body is not a JSON object.
pub fn json_object(body: &Bytes) -> Result<Map<String, Value>, AccountError> {
    serde_json::from_slice::<Map<String, Value>>(body)
        .map_err(|err| AccountError::MalformedInput(err.to_string()))
}

//! User endpoints.
//!
//! Flow Overview:
//! 1) Parse the JSON body (when there is one) into an object.
//! 2) Hand it to the account workflow with the injected storage.
//! 3) Wrap the outcome in the response envelope.

use super::{failure, json_object, success, ApiConfig, Envelope, EXIT_FAILURE, EXIT_OK};
use crate::accounts::{
    create::{create_account, CreatedAccount},
    identity::{authenticate, public_profile},
    storage::Storage,
    Account, AccountError, PublicAccount,
};
use axum::{
    body::Bytes,
    extract::{Extension, Path},
    response::Response,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::instrument;
use utoipa::ToSchema;

/// Body of the authenticated self lookup.
#[derive(ToSchema, Serialize, Deserialize)]
pub struct MeRequest {
    pub token: String,
}

/// Body of the account creation request.
#[derive(ToSchema, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub name: String,
    pub mail: String,
    pub password: String,
    pub confirm_password: String,
}

#[utoipa::path(
    get,
    path = "/api/v1/get/public/user/{id}",
    params(
        ("id" = String, Path, description = "Public account id")
    ),
    responses(
        (status = 200, description = "Public profile; mail, password and token are null", body = Envelope),
        (status = 404, description = "No account with that id", body = Envelope),
        (status = 500, description = "Storage failure", body = Envelope),
    ),
    tag = "users"
)]
#[instrument(skip(storage, config))]
pub async fn get_public_user(
    Path(id): Path<String>,
    Extension(storage): Extension<Arc<dyn Storage>>,
    Extension(config): Extension<ApiConfig>,
) -> Response {
    let profile: PublicAccount = match public_profile(storage.as_ref(), &id).await {
        Ok(profile) => profile,
        Err(err) => return failure(&config, &err, EXIT_FAILURE),
    };

    success("obtained", profile)
}

#[utoipa::path(
    post,
    path = "/api/v1/get/me/user/{id}",
    params(
        ("id" = String, Path, description = "Public account id")
    ),
    request_body = MeRequest,
    responses(
        (status = 200, description = "Token matches; full account", body = Envelope),
        (status = 400, description = "Body missing or without token", body = Envelope),
        (status = 401, description = "Token does not match", body = Envelope),
        (status = 404, description = "No account with that id", body = Envelope),
        (status = 500, description = "Storage failure", body = Envelope),
    ),
    tag = "users"
)]
#[instrument(skip(storage, config, body))]
pub async fn get_me(
    Path(id): Path<String>,
    Extension(storage): Extension<Arc<dyn Storage>>,
    Extension(config): Extension<ApiConfig>,
    body: Bytes,
) -> Response {
    let body = match json_object(&body) {
        Ok(body) => body,
        Err(err) => return failure(&config, &err, EXIT_FAILURE),
    };

    let token = match body.get("token") {
        None | Some(Value::Null) => {
            return failure(
                &config,
                &AccountError::MissingField("token".to_string()),
                EXIT_FAILURE,
            )
        }
        Some(Value::String(token)) => token.as_str(),
        Some(_) => {
            return failure(
                &config,
                &AccountError::ValidationFailed("token must be a string".to_string()),
                EXIT_FAILURE,
            )
        }
    };

    let account: Account = match authenticate(storage.as_ref(), &id, token).await {
        Ok(account) => account,
        Err(err) => return failure(&config, &err, EXIT_FAILURE),
    };

    success("the id and token match, and the data has been sent", account)
}

#[utoipa::path(
    post,
    path = "/api/v1/post/user/create",
    request_body = CreateUserRequest,
    responses(
        (status = 200, description = "Account created; data holds token and id", body = Envelope),
        (status = 400, description = "Missing or invalid field", body = Envelope),
        (status = 409, description = "Username or mail already taken", body = Envelope),
        (status = 500, description = "Storage failure", body = Envelope),
    ),
    tag = "users"
)]
#[instrument(skip(storage, config, body))]
pub async fn create_user(
    Extension(storage): Extension<Arc<dyn Storage>>,
    Extension(config): Extension<ApiConfig>,
    body: Bytes,
) -> Response {
    let body = match json_object(&body) {
        Ok(body) => body,
        Err(err) => return failure(&config, &err, EXIT_FAILURE),
    };

    let created: CreatedAccount = match create_account(storage.as_ref(), &body).await {
        Ok(created) => created,
        Err(err) => return failure(&config, &err, EXIT_OK),
    };

    success("ok", created)
}

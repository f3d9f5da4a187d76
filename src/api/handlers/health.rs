use crate::{accounts::storage::Storage, GIT_COMMIT_HASH};
use axum::{
    body::Body,
    extract::Extension,
    http::{HeaderMap, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error};
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct Health {
    commit: String,
    name: String,
    version: String,
    storage: String,
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Storage is reachable", body = Health),
        (status = 503, description = "Storage is unreachable", body = Health)
    ),
    tag = "health"
)]
// axum handler for health
pub async fn health(method: Method, storage: Extension<Arc<dyn Storage>>) -> impl IntoResponse {
    let result = storage.ping().await;

    if let Err(err) = &result {
        error!("Storage health check failed: {:?}", err);
    }

    let health = Health {
        commit: GIT_COMMIT_HASH.to_string(),
        name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        storage: if result.is_ok() {
            "ok".to_string()
        } else {
            "error".to_string()
        },
    };

    let body = if method == Method::GET {
        Json(&health).into_response()
    } else {
        Body::empty().into_response()
    };

    let short_hash = if health.commit.len() > 7 {
        &health.commit[0..7]
    } else {
        ""
    };

    let headers = format!("{}:{}:{}", health.name, health.version, short_hash)
        .parse::<HeaderValue>()
        .map(|x_app_header_value| {
            debug!("X-App header: {:?}", x_app_header_value);

            let mut headers = HeaderMap::new();

            headers.insert("X-App", x_app_header_value);

            headers
        })
        .map_err(|err| {
            error!("Failed to parse X-App header: {}", err);
        });

    let headers = headers.unwrap_or_else(|()| HeaderMap::new());

    if result.is_ok() {
        (StatusCode::OK, headers, body)
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, headers, body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::{storage::MemoryStorage, tests::FailingStorage};
    use axum::{
        body::to_bytes,
        http::Request,
        routing::get,
        Router,
    };
    use tower::ServiceExt;

    fn app(storage: Arc<dyn Storage>) -> Router {
        Router::new()
            .route("/health", get(health).head(health))
            .layer(Extension(storage))
    }

    #[tokio::test]
    async fn healthy_storage() -> anyhow::Result<()> {
        let response = app(Arc::new(MemoryStorage::new()))
            .oneshot(Request::builder().uri("/health").body(Body::empty())?)
            .await?;

        assert_eq!(response.status(), StatusCode::OK);
        let x_app = response
            .headers()
            .get("X-App")
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        assert!(x_app.is_some_and(|value| value.starts_with(env!("CARGO_PKG_NAME"))));

        let body = to_bytes(response.into_body(), usize::MAX).await?;
        let health: Health = serde_json::from_slice(&body)?;
        assert_eq!(health.storage, "ok");
        assert_eq!(health.version, env!("CARGO_PKG_VERSION"));
        Ok(())
    }

    #[tokio::test]
    async fn unhealthy_storage() -> anyhow::Result<()> {
        let response = app(Arc::new(FailingStorage {
            fail_lookups: true,
        }))
        .oneshot(Request::builder().uri("/health").body(Body::empty())?)
        .await?;

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        Ok(())
    }

    #[tokio::test]
    async fn head_has_no_body() -> anyhow::Result<()> {
        let response = app(Arc::new(MemoryStorage::new()))
            .oneshot(
                Request::builder()
                    .method("HEAD")
                    .uri("/health")
                    .body(Body::empty())?,
            )
            .await?;

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await?;
        assert!(body.is_empty());
        Ok(())
    }
}

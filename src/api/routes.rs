//! API Routes
//!
//! Configures the Axum router with all KV server endpoints.

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    decr_handler, delete_handler, exists_handler, expire_handler, get_handler, hdel_handler,
    health_handler, hget_handler, hgetall_handler, hincrby_handler, hset_handler, incr_handler,
    keys_handler, lock_handler, mget_handler, mset_handler, set_handler, stats_handler,
    ttl_handler, unlock_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `PUT /set`, `GET /get/:key`, `DELETE /del/:key`, `GET /exists/:key`
/// - `GET /ttl/:key`, `POST /expire`
/// - `POST /incr`, `POST /decr`
/// - `POST /hset`, `GET /hget/:key/:field`, `GET /hgetall/:key`,
///   `POST /hdel`, `POST /hincrby`
/// - `POST /mset`, `POST /mget`
/// - `POST /lock`, `POST /unlock`
/// - `GET /keys?pattern=`
/// - `GET /stats`, `GET /health` (never gated by the enabled flag)
///
/// # Middleware
/// - CORS: allows any origin (configurable for production)
/// - Tracing: logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/set", put(set_handler))
        .route("/get/:key", get(get_handler))
        .route("/del/:key", delete(delete_handler))
        .route("/exists/:key", get(exists_handler))
        .route("/ttl/:key", get(ttl_handler))
        .route("/expire", post(expire_handler))
        .route("/incr", post(incr_handler))
        .route("/decr", post(decr_handler))
        .route("/hset", post(hset_handler))
        .route("/hget/:key/:field", get(hget_handler))
        .route("/hgetall/:key", get(hgetall_handler))
        .route("/hdel", post(hdel_handler))
        .route("/hincrby", post(hincrby_handler))
        .route("/mset", post(mset_handler))
        .route("/mget", post(mget_handler))
        .route("/lock", post(lock_handler))
        .route("/unlock", post(unlock_handler))
        .route("/keys", get(keys_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::util::ServiceExt;

    fn create_test_app() -> Router {
        create_router(AppState::from_config(&Config::default()))
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_stats_endpoint() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/stats")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_set_endpoint() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri("/set")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"key":"test","value":"hello"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_get_not_found() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/get/nonexistent")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

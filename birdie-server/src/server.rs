//! Axum server setup and router configuration.

use crate::api;
use crate::shutdown::shutdown_signal;
use crate::state::AppState;
use axum::{Json, Router, response::IntoResponse, routing::get};
use serde::Serialize;
use std::net::SocketAddr;
use tokio::net::TcpListener;

/// Build the main application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api::router())
        .with_state(state)
}

/// Health check response.
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// Simple health check - returns OK if the server is running.
async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Run the server with graceful shutdown support.
pub async fn run_server(router: Router, addr: SocketAddr) -> Result<(), std::io::Error> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use birdie_sdk::objects::ErrorBody;
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    /// A router whose pool never connects; only usable for requests that are
    /// answered before touching the database.
    fn router() -> Router {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://birdie@localhost/birdie")
            .unwrap();
        build_router(AppState::new(pool))
    }

    fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn error_body(response: axum::response::Response) -> ErrorBody {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = router()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_team_needs_two_players() {
        let response = router()
            .oneshot(json_request(
                "POST",
                "/api/v1/teams",
                r#"{"players":[{"name":"Solo"}]}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error_body(response).await.error, "VALIDATION_FAILED");
    }

    #[tokio::test]
    async fn test_unknown_team_token_is_rejected() {
        let uri = format!("/api/v1/matches/{}/points", uuid::Uuid::now_v7());
        let response = router()
            .oneshot(json_request("POST", &uri, r#"{"team":"C"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(error_body(response).await.error, "INVALID_REQUEST");
    }

    #[tokio::test]
    async fn test_lowercase_side_is_rejected() {
        let uri = format!("/api/v1/matches/{}/serve-side", uuid::Uuid::now_v7());
        let response = router()
            .oneshot(json_request("PUT", &uri, r#"{"side":"left"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_malformed_match_id() {
        let response = router()
            .oneshot(
                Request::get("/api/v1/matches/not-a-uuid")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error_body(response).await.error, "INVALID_REQUEST");
    }

    #[tokio::test]
    async fn test_missing_content_type() {
        let request = Request::post("/api/v1/teams")
            .body(Body::from(r#"{"players":[]}"#))
            .unwrap();
        let response = router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }
}

//! Mapping of service failures to HTTP responses.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use birdie_core::engine::EngineError;
use birdie_core::service::ServiceError;
use birdie_sdk::objects::ErrorBody;

/// Errors that can occur in API handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Service(#[from] ServiceError),
    /// The request could not be parsed into the expected shape.
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        ApiError::Service(err.into())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl ApiError {
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Service(ServiceError::NotFound(_)) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::Service(ServiceError::Validation(_)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_FAILED")
            }
            ApiError::Service(ServiceError::Engine(EngineError::InvalidState(_))) => {
                (StatusCode::CONFLICT, "INVALID_STATE")
            }
            ApiError::Service(ServiceError::Engine(EngineError::PlayerUnavailable(_))) => {
                (StatusCode::CONFLICT, "PLAYER_UNAVAILABLE")
            }
            ApiError::Service(ServiceError::Engine(EngineError::InvariantViolation(_))) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INVARIANT_VIOLATION")
            }
            ApiError::Service(ServiceError::Database(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR")
            }
            ApiError::Rejected { status, .. } => (*status, "INVALID_REQUEST"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let message = if status.is_server_error() {
            tracing::error!(error = %self, code, "Request failed");
            "internal server error".to_string()
        } else {
            self.to_string()
        };
        (
            status,
            Json(ErrorBody {
                error: code.to_string(),
                message,
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use birdie_core::engine::UnavailablePlayer;

    fn status(err: impl Into<ApiError>) -> StatusCode {
        err.into().status_and_code().0
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status(ServiceError::NotFound("match x".into())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status(ServiceError::Validation("bad".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status(EngineError::InvalidState("done".into())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status(EngineError::PlayerUnavailable(vec![])),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status(EngineError::InvariantViolation("no sets".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status(ServiceError::Database(sqlx::Error::RowNotFound)),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_error_body_names_busy_players() {
        let err = ApiError::from(EngineError::PlayerUnavailable(vec![UnavailablePlayer {
            id: 7,
            name: "Lee".to_string(),
        }]));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: ErrorBody = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.error, "PLAYER_UNAVAILABLE");
        assert!(body.message.contains("Lee (#7)"));
    }

    #[tokio::test]
    async fn test_server_errors_hide_details() {
        let err = ApiError::from(ServiceError::Database(sqlx::Error::PoolTimedOut));
        let response = err.into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: ErrorBody = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.error, "DATABASE_ERROR");
        assert_eq!(body.message, "internal server error");
    }
}

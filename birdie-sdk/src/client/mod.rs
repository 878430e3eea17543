//! HTTP clients for the Birdie API.
//!
//! Gated behind the `client` cargo feature so downstream crates that only
//! need the shared types do not pull in `reqwest`.

mod matches;
mod teams;

pub use matches::MatchClient;
pub use teams::TeamClient;

use reqwest::StatusCode;

use crate::objects::ErrorBody;

/// Errors produced by the SDK HTTP clients.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Transport-level failure (DNS, TLS, connection reset, …).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server returned a non-2xx status code.
    #[error("api error: status {status}, body: {body}")]
    Api { status: StatusCode, body: String },

    /// Response body could not be deserialized.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The base URL could not be joined with the endpoint path.
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
}

impl ClientError {
    /// The structured error body, if the server sent one.
    pub fn error_body(&self) -> Option<ErrorBody> {
        match self {
            ClientError::Api { body, .. } => serde_json::from_str(body).ok(),
            _ => None,
        }
    }

    /// HTTP status of an API error.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Http(e) => e.status(),
            _ => None,
        }
    }
}

async fn parse_response<T: serde::de::DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<T, ClientError> {
    let resp = check_status(resp).await?;
    let bytes = resp.bytes().await?;
    serde_json::from_slice(&bytes).map_err(ClientError::Json)
}

async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(ClientError::Api { status, body });
    }
    Ok(resp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_body_extraction() {
        let err = ClientError::Api {
            status: StatusCode::CONFLICT,
            body: r#"{"error":"PLAYER_UNAVAILABLE","message":"player 3 (Max) is busy"}"#
                .to_string(),
        };
        let body = err.error_body().unwrap();
        assert_eq!(body.error, "PLAYER_UNAVAILABLE");
        assert_eq!(err.status(), Some(StatusCode::CONFLICT));

        let plain = ClientError::Api {
            status: StatusCode::BAD_GATEWAY,
            body: "upstream down".to_string(),
        };
        assert!(plain.error_body().is_none());
    }
}

//! HTTP-level errors and their mapping onto [`store::ClientError`].

use store::ClientError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<ApiError> for ClientError {
    fn from(e: ApiError) -> Self {
        match e {
            ApiError::Request(e) if e.is_decode() => ClientError::Decode(e.to_string()),
            ApiError::Request(e) => ClientError::Transport(e.to_string()),
            ApiError::Status { status, message } => ClientError::Http { status, message },
            ApiError::Json(e) => ClientError::Decode(e.to_string()),
        }
    }
}

/// Pull a human-readable message out of an error body. Services answer either
/// with `{"message": ...}` / `{"error": ...}` JSON or with plain text.
pub fn error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["message", "error"] {
            if let Some(text) = value.get(key).and_then(|v| v.as_str()) {
                return text.to_string();
            }
        }
    }
    body.trim().to_string()
}

/// Fail on non-2xx, keeping the response for the caller otherwise.
pub(crate) async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = error_message(&body);
    Err(ApiError::Status {
        status: status.as_u16(),
        message: if message.is_empty() {
            status.canonical_reason().unwrap_or("request failed").to_string()
        } else {
            message
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_from_json() {
        assert_eq!(error_message(r#"{"message":"Record not found"}"#), "Record not found");
        assert_eq!(error_message(r#"{"error":"bad token"}"#), "bad token");
    }

    #[test]
    fn test_error_message_from_text() {
        assert_eq!(error_message("  upstream timeout\n"), "upstream timeout");
        assert_eq!(error_message(r#"{"code":3}"#), r#"{"code":3}"#);
    }

    #[test]
    fn test_status_maps_to_http_client_error() {
        let err: ClientError = ApiError::Status {
            status: 404,
            message: "gone".into(),
        }
        .into();
        assert_eq!(
            err,
            ClientError::Http {
                status: 404,
                message: "gone".into()
            }
        );
    }
}

/// Error handling for the API server
///
/// This module provides a unified error type that maps to HTTP responses.
/// Handlers return `Result<T, ApiError>`, which converts to the right status
/// code and a JSON body.
///
/// Validation and persistence failures use status 210, an application-level
/// failure code that existing clients of this API check for, with a body of
/// exactly `{"message"}`. Other failures carry `{"error", "message"}`.
///
/// # Example
///
/// ```
/// use drivers_api::error::{ApiError, ApiResult};
/// use axum::Json;
///
/// async fn handler(name: Option<String>) -> ApiResult<Json<String>> {
///     let name = name.ok_or_else(|| ApiError::Validation("name is missing".to_string()))?;
///     Ok(Json(name))
/// }
/// ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use drivers_shared::models::driver::DriverError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Status code returned for validation and persistence failures
pub const FAILURE_STATUS: u16 = 210;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Malformed request body (400)
    BadRequest(String),

    /// A required field is missing or too short (210)
    Validation(String),

    /// The record could not be stored, e.g. duplicate email (210)
    CreateFailed(String),

    /// Internal server error (500)
    InternalError(String),
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code (e.g., "bad_request"), absent on 210 responses
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Human-readable error message
    pub message: String,
}

/// Status used for validation and persistence failures
pub fn failure_status() -> StatusCode {
    StatusCode::from_u16(FAILURE_STATUS).unwrap_or(StatusCode::BAD_REQUEST)
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Validation(msg) => write!(f, "Validation failed: {}", msg),
            ApiError::CreateFailed(msg) => write!(f, "Create failed: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, Some("bad_request"), msg),
            ApiError::Validation(msg) | ApiError::CreateFailed(msg) => (failure_status(), None, msg),
            ApiError::InternalError(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Some("internal_error"),
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_code.map(str::to_string),
            message,
        });

        (status, body).into_response()
    }
}

/// Convert sqlx errors to API errors
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        ApiError::InternalError(format!("Database error: {}", err))
    }
}

/// Convert repository errors to API errors
impl From<DriverError> for ApiError {
    fn from(err: DriverError) -> Self {
        match err {
            DriverError::DuplicateEmail(email) => {
                ApiError::CreateFailed(format!("Email {} is already registered", email))
            }
            DriverError::Database(err) => err.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_error_display() {
        let err = ApiError::BadRequest("Invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: Invalid input");

        let err = ApiError::Validation("email is missing".to_string());
        assert_eq!(err.to_string(), "Validation failed: email is missing");
    }

    #[test]
    fn test_failure_status_is_210() {
        assert_eq!(failure_status().as_u16(), 210);
        assert_eq!(
            ApiError::Validation("x".to_string()).into_response().status().as_u16(),
            210
        );
        assert_eq!(
            ApiError::CreateFailed("x".to_string()).into_response().status().as_u16(),
            210
        );
    }

    #[tokio::test]
    async fn test_failure_body_is_message_only() {
        let body = body_json(ApiError::Validation("email is missing".to_string()).into_response()).await;
        assert_eq!(body, serde_json::json!({"message": "email is missing"}));

        let body = body_json(ApiError::CreateFailed("duplicate".to_string()).into_response()).await;
        assert_eq!(body, serde_json::json!({"message": "duplicate"}));
    }

    #[tokio::test]
    async fn test_bad_request_body_keeps_error_code() {
        let body = body_json(ApiError::BadRequest("bad json".to_string()).into_response()).await;
        assert_eq!(
            body,
            serde_json::json!({"error": "bad_request", "message": "bad json"})
        );
    }

    #[test]
    fn test_internal_error_is_500() {
        let response = ApiError::InternalError("disk full".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_duplicate_email_maps_to_create_failed() {
        let err: ApiError = DriverError::DuplicateEmail("a@x.com".to_string()).into();
        assert!(matches!(err, ApiError::CreateFailed(ref m) if m.contains("a@x.com")));
    }

    #[test]
    fn test_database_error_maps_to_internal() {
        let err: ApiError = DriverError::Database(sqlx::Error::RowNotFound).into();
        assert!(matches!(err, ApiError::InternalError(_)));
    }
}

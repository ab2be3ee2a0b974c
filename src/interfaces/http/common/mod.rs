//! Shared HTTP plumbing: response envelope, error mapping, extractors

pub mod datetime;
pub mod extract;
pub mod validated_json;

use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::DomainError;

pub use extract::{ApiPath, ApiQuery};
pub use validated_json::ValidatedJson;

/// Error envelope returned by every failing endpoint.
///
/// Failures look like `{"success": false, "data": null, "error": "..."}`.
/// Successful responses carry the bare resource instead.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Rejection type shared by all handlers
pub type ApiError = (StatusCode, Json<ApiResponse<()>>);

pub type ApiResult<T> = Result<T, ApiError>;

pub fn error_status(error: &DomainError) -> StatusCode {
    match error {
        DomainError::Validation(_) | DomainError::Conflict(_) | DomainError::InvalidState(_) => {
            StatusCode::BAD_REQUEST
        }
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::Forbidden(_) => StatusCode::FORBIDDEN,
        DomainError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        DomainError::AlreadyExists(_) => StatusCode::CONFLICT,
        DomainError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(ApiResponse::error(message)))
}

/// Convert a domain failure into its HTTP rejection.
pub fn domain_error_response(error: DomainError) -> ApiError {
    let status = error_status(&error);
    if status.is_server_error() {
        tracing::error!(error = %error, "Request failed");
    }
    api_error(status, error.message())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn booking_rule_violations_are_client_errors() {
        assert_eq!(
            error_status(&DomainError::Conflict("overlap".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            error_status(&DomainError::InvalidState("cancelled".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            error_status(&DomainError::not_found("Room", "id", 1)),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            error_status(&DomainError::AlreadyExists("user".into())),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn database_details_stay_out_of_the_body() {
        let (status, Json(body)) =
            domain_error_response(DomainError::Database("disk I/O error".into()));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body.success);
        assert_eq!(body.error.as_deref(), Some("Internal server error"));
    }
}

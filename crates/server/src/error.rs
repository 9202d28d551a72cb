use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use database::error::ServiceError;
use models::error::ValidationError;
use serde::Serialize;
use utoipa::ToSchema;

/// Error payload returned by every endpoint on failure
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Machine-readable error code. One of: `VALIDATION_ERROR`, `NOT_REGISTERED`,
    /// `PERMISSION_DENIED`, `NOT_FOUND`, `CONFLICT`, `PAYLOAD_TOO_LARGE`, `INTERNAL_ERROR`.
    #[schema(example = "CONFLICT")]
    pub code: &'static str,
    #[schema(example = "A course with code 'CS101' already exists in your account.")]
    pub message: String,
}

#[derive(Debug)]
pub enum AppError {
    Validation(String),
    NotRegistered(String),
    PermissionDenied(String),
    NotFound(String),
    Conflict(String),
    TooLarge(String),
    Internal(String),
}

impl AppError {
    fn status_and_body(self) -> (StatusCode, ErrorBody) {
        let (status, code, message) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg),
            AppError::NotRegistered(msg) => (StatusCode::FORBIDDEN, "NOT_REGISTERED", msg),
            AppError::PermissionDenied(msg) => (StatusCode::FORBIDDEN, "PERMISSION_DENIED", msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg),
            AppError::TooLarge(msg) => (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE", msg),
            AppError::Internal(detail) => {
                log::error!("Internal error: {detail}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An unexpected error occurred".to_owned(),
                )
            }
        };

        (status, ErrorBody { code, message })
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        if err.is_fatal() {
            return AppError::Internal(err.to_string());
        }

        let message = err.to_string();
        match err {
            ServiceError::Validation(_)
            | ServiceError::InvalidFormat(_)
            | ServiceError::PrerequisiteNotFound(_) => AppError::Validation(message),
            ServiceError::DuplicateCourseCode(_) | ServiceError::UsernameTaken(_) => {
                AppError::Conflict(message)
            }
            ServiceError::NotFoundOrForbidden(_) => AppError::NotFound(message),
            ServiceError::Forbidden(_) => AppError::PermissionDenied(message),
            ServiceError::OwnerNotFound(_) => AppError::NotRegistered(message),
            ServiceError::SystemOwnerMissing(_)
            | ServiceError::Export(_)
            | ServiceError::Database(_) => AppError::Internal(message),
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err.to_string())
    }
}

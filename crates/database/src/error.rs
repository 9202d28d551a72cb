use models::{error::ValidationError, transfer::TransferError};
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// Failures surfaced by the database services
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Invalid CSV format: {0}")]
    InvalidFormat(#[from] TransferError),

    #[error("Failed to write export: {0}")]
    Export(TransferError),

    #[error("A course with code '{0}' already exists in your account.")]
    DuplicateCourseCode(String),

    #[error("Prerequisite course '{0}' does not exist in your courses or system courses.")]
    PrerequisiteNotFound(String),

    #[error("Course '{0}' not found or you don't have permission to modify it.")]
    NotFoundOrForbidden(String),

    #[error("You do not have permission to modify course '{0}'.")]
    Forbidden(String),

    #[error("No account is registered for '{0}'.")]
    OwnerNotFound(String),

    #[error("Username '{0}' already exists.")]
    UsernameTaken(String),

    #[error("System owner '{0}' is not provisioned")]
    SystemOwnerMissing(String),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl ServiceError {
    /// Service-level failures that no retry of the same request can fix
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::SystemOwnerMissing(_) | Self::Export(_) | Self::Database(_)
        )
    }

    /// Translates a unique constraint violation into `on_conflict`, leaving
    /// every other database error as is
    pub(crate) fn from_insert(err: DbErr, on_conflict: impl FnOnce() -> Self) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => on_conflict(),
            _ => Self::Database(err),
        }
    }
}

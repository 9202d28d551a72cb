use thiserror::Error;

/// Failures raised while constructing domain records from user input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Credits must be a whole number of at least 1, got '{0}'")]
    InvalidCredits(String),

    #[error("Invalid department '{0}'")]
    InvalidDepartment(String),
}

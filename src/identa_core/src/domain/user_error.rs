use thiserror::Error;

use super::validation_error::ValidationError;

/// Failures raised by `User` mutators and the `Password` constructor.
#[derive(Debug, Error, PartialEq)]
pub enum UserError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Invalid or expired verification token")]
    TokenMismatch,
    #[error("User is already deactivated")]
    AlreadyDeactivated,
    #[error("User is not deactivated")]
    NotDeactivated,
    #[error("Failed to hash password: {0}")]
    PasswordHashing(String),
    #[error("Corrupt account record: {0}")]
    CorruptRecord(String),
}

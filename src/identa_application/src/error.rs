use std::fmt;

use identa_core::{AccountStoreError, AuditStoreError, UserError, ValidationError};

/// Coarse category of an `AccountError`, for callers that map failures to
/// transport status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Conflict,
    NotFound,
    Authorization,
    Authentication,
    Token,
    Internal,
}

/// Unique account attribute involved in a conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Identifier {
    Email,
    Phone,
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Email => f.write_str("Email"),
            Self::Phone => f.write_str("Phone number"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("{0}")]
    Validation(#[from] ValidationError),
    #[error("{0} already in use")]
    Conflict(Identifier),
    #[error("User is already deactivated")]
    AlreadyDeactivated,
    #[error("User is not deactivated")]
    NotDeactivated,
    #[error("User not found")]
    NotFound,
    #[error("Not authorized to access this account")]
    Unauthorized,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Account is deactivated")]
    AccountDeactivated,
    #[error("Invalid or expired verification token")]
    InvalidToken,
    #[error("Account store error: {0}")]
    AccountStore(String),
    #[error("Audit store error: {0}")]
    AuditStore(String),
    #[error("Failed to send notification: {0}")]
    Notification(String),
    #[error("Failed to sign access token: {0}")]
    TokenSigning(String),
    #[error("Failed to hash password: {0}")]
    PasswordHashing(String),
}

impl AccountError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Conflict(_) | Self::AlreadyDeactivated | Self::NotDeactivated => {
                ErrorKind::Conflict
            }
            Self::NotFound => ErrorKind::NotFound,
            Self::Unauthorized => ErrorKind::Authorization,
            Self::InvalidCredentials | Self::AccountDeactivated => ErrorKind::Authentication,
            Self::InvalidToken => ErrorKind::Token,
            Self::AccountStore(_)
            | Self::AuditStore(_)
            | Self::Notification(_)
            | Self::TokenSigning(_)
            | Self::PasswordHashing(_) => ErrorKind::Internal,
        }
    }
}

impl From<UserError> for AccountError {
    fn from(error: UserError) -> Self {
        match error {
            UserError::Validation(e) => Self::Validation(e),
            UserError::TokenMismatch => Self::InvalidToken,
            UserError::AlreadyDeactivated => Self::AlreadyDeactivated,
            UserError::NotDeactivated => Self::NotDeactivated,
            UserError::PasswordHashing(e) => Self::PasswordHashing(e),
            UserError::CorruptRecord(e) => Self::AccountStore(e),
        }
    }
}

// Unique-constraint violations reported by the store are conflicts, not
// internal failures.
impl From<AccountStoreError> for AccountError {
    fn from(error: AccountStoreError) -> Self {
        match error {
            AccountStoreError::DuplicateEmail => Self::Conflict(Identifier::Email),
            AccountStoreError::DuplicatePhone => Self::Conflict(Identifier::Phone),
            AccountStoreError::AccountNotFound => Self::NotFound,
            AccountStoreError::UnexpectedError(e) => Self::AccountStore(e),
        }
    }
}

impl From<AuditStoreError> for AccountError {
    fn from(error: AuditStoreError) -> Self {
        Self::AuditStore(error.to_string())
    }
}

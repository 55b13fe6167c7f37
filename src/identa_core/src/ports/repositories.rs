use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{
    audit_log::AuditLog, email::EmailAddress, phone_number::PhoneNumber, user::User,
    user_id::UserId,
};

// AccountStore port trait and errors
#[derive(Debug, Error)]
pub enum AccountStoreError {
    #[error("Email already exists")]
    DuplicateEmail,
    #[error("Phone number already exists")]
    DuplicatePhone,
    #[error("Account not found")]
    AccountNotFound,
    #[error("Unexpected error {0}")]
    UnexpectedError(String),
}

impl PartialEq for AccountStoreError {
    fn eq(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::DuplicateEmail, Self::DuplicateEmail)
                | (Self::DuplicatePhone, Self::DuplicatePhone)
                | (Self::AccountNotFound, Self::AccountNotFound)
                | (Self::UnexpectedError(_), Self::UnexpectedError(_))
        )
    }
}

/// Source of truth for accounts.
///
/// `save` is an upsert keyed by id. Implementations must enforce email and
/// phone uniqueness themselves and report violations as `DuplicateEmail` /
/// `DuplicatePhone`; callers' pre-checks are advisory only.
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn save(&self, user: &User) -> Result<(), AccountStoreError>;
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, AccountStoreError>;
    async fn find_by_email(&self, email: &EmailAddress)
    -> Result<Option<User>, AccountStoreError>;
    async fn find_by_phone(&self, phone: &PhoneNumber)
    -> Result<Option<User>, AccountStoreError>;
    async fn delete(&self, id: &UserId) -> Result<(), AccountStoreError>;
    async fn find_all(&self, limit: usize, offset: usize) -> Result<Vec<User>, AccountStoreError>;
}

// AuditStore port trait and errors
#[derive(Debug, Error)]
pub enum AuditStoreError {
    #[error("Database error: {0}")]
    DatabaseError(String),
}

#[async_trait]
pub trait AuditStore: Send + Sync {
    async fn save(&self, log: &AuditLog) -> Result<(), AuditStoreError>;
    /// Records targeting `target_id`, newest first.
    async fn find_by_target(&self, target_id: &UserId) -> Result<Vec<AuditLog>, AuditStoreError>;
}

pub mod domain;
pub mod ports;

// Re-export commonly used types for convenience
pub use domain::{
    audit_log::{AuditAction, AuditLog},
    email::EmailAddress,
    full_name::FullName,
    password::Password,
    phone_number::{Country, PhoneNumber},
    profile::AccountProfile,
    role::{Role, UserStatus},
    user::{NewUser, PendingVerification, User, UserRecord},
    user_error::UserError,
    user_id::UserId,
    validation_error::ValidationError,
    verification_token::VerificationToken,
};

pub use ports::{
    repositories::{AccountStore, AccountStoreError, AuditStore, AuditStoreError},
    services::{
        ACCESS_TOKEN_TTL_SECONDS, AccessClaims, EmailClient, Notifier, OutgoingEmail, TokenSigner,
    },
};

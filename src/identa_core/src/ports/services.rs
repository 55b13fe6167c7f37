use async_trait::async_trait;
use chrono::{DateTime, Utc};
use secrecy::Secret;
use serde::{Deserialize, Serialize};

use crate::domain::{
    email::EmailAddress, role::Role, user_id::UserId, verification_token::VerificationToken,
};

/// Lifetime of an issued bearer credential.
pub const ACCESS_TOKEN_TTL_SECONDS: i64 = 3600;

/// A rendered message. `tag` names the kind of notification so the
/// provider can group deliveries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub subject: String,
    pub html_body: String,
    pub text_body: String,
    pub tag: &'static str,
}

/// Port trait for email sending service
#[async_trait]
pub trait EmailClient: Send + Sync {
    async fn send_email(
        &self,
        recipient: &EmailAddress,
        email: &OutgoingEmail,
    ) -> Result<(), String>;
}

/// Port trait for account notifications
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_verification_email(
        &self,
        user_id: &UserId,
        to: &EmailAddress,
        token: &VerificationToken,
    ) -> Result<(), String>;
    async fn send_email_change_notification(
        &self,
        user_id: &UserId,
        to: &EmailAddress,
        token: &VerificationToken,
    ) -> Result<(), String>;
}

/// Claims carried by an access token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessClaims {
    pub id: UserId,
    pub roles: Vec<Role>,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Port trait for the bearer-token signer
#[async_trait]
pub trait TokenSigner: Send + Sync {
    async fn sign(&self, claims: &AccessClaims) -> Result<Secret<String>, String>;
}

use identa_core::{AccountStore, AuditAction, AuditLog, AuditStore, UserId};
use secrecy::{ExposeSecret, Secret};
use serde_json::json;

use crate::error::AccountError;

#[derive(Debug, Clone)]
pub struct VerifyEmailInput {
    pub user_id: String,
    pub token: Secret<String>,
}

/// Verify email use case - consumes a verification or email-change token
pub struct VerifyEmailUseCase<'a, A, L>
where
    A: AccountStore,
    L: AuditStore,
{
    account_store: &'a A,
    audit_store: &'a L,
}

impl<'a, A, L> VerifyEmailUseCase<'a, A, L>
where
    A: AccountStore,
    L: AuditStore,
{
    pub fn new(account_store: &'a A, audit_store: &'a L) -> Self {
        Self {
            account_store,
            audit_store,
        }
    }

    #[tracing::instrument(name = "VerifyEmailUseCase::execute", skip_all, fields(user_id = %input.user_id))]
    pub async fn execute(&self, input: VerifyEmailInput) -> Result<(), AccountError> {
        let user_id = UserId::parse(&input.user_id)?;

        let mut user = self
            .account_store
            .find_by_id(&user_id)
            .await?
            .ok_or(AccountError::NotFound)?;

        user.verify_email(input.token.expose_secret())?;

        self.account_store.save(&user).await?;

        let audit = AuditLog::new(
            user_id,
            AuditAction::EmailVerified,
            Some(user_id),
            json!({ "email": user.email().as_ref().expose_secret() }),
        );
        self.audit_store.save(&audit).await?;

        Ok(())
    }
}

use identa_core::{AccountStore, AuditAction, AuditLog, AuditStore, Role, UserId};
use secrecy::ExposeSecret;
use serde_json::json;

use crate::{authorization::authorize, error::AccountError};

#[derive(Debug, Clone)]
pub struct DeleteAccountInput {
    pub requesting_user_id: String,
    pub target_user_id: String,
    pub requesting_user_roles: Vec<Role>,
}

/// Delete account use case - hard-deletes an account through the store
pub struct DeleteAccountUseCase<'a, A, L>
where
    A: AccountStore,
    L: AuditStore,
{
    account_store: &'a A,
    audit_store: &'a L,
}

impl<'a, A, L> DeleteAccountUseCase<'a, A, L>
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

    #[tracing::instrument(name = "DeleteAccountUseCase::execute", skip_all)]
    pub async fn execute(&self, input: DeleteAccountInput) -> Result<(), AccountError> {
        let requesting_user_id = UserId::parse(&input.requesting_user_id)?;
        let target_user_id = UserId::parse(&input.target_user_id)?;
        authorize(
            &requesting_user_id,
            &target_user_id,
            &input.requesting_user_roles,
        )?;

        let user = self
            .account_store
            .find_by_id(&target_user_id)
            .await?
            .ok_or(AccountError::NotFound)?;

        self.account_store.delete(&target_user_id).await?;

        let audit = AuditLog::new(
            requesting_user_id,
            AuditAction::UserDeleted,
            Some(target_user_id),
            json!({ "email": user.email().as_ref().expose_secret() }),
        );
        self.audit_store.save(&audit).await?;

        Ok(())
    }
}

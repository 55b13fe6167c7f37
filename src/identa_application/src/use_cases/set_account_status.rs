use identa_core::{AccountProfile, AccountStore, AuditAction, AuditLog, AuditStore, Role, UserId};
use serde_json::json;

use crate::{authorization::authorize, error::AccountError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusChange {
    Activate,
    Deactivate,
}

#[derive(Debug, Clone)]
pub struct SetAccountStatusInput {
    pub requesting_user_id: String,
    pub target_user_id: String,
    pub requesting_user_roles: Vec<Role>,
    pub change: StatusChange,
}

/// Set account status use case - activates or deactivates an account
pub struct SetAccountStatusUseCase<'a, A, L>
where
    A: AccountStore,
    L: AuditStore,
{
    account_store: &'a A,
    audit_store: &'a L,
}

impl<'a, A, L> SetAccountStatusUseCase<'a, A, L>
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

    #[tracing::instrument(name = "SetAccountStatusUseCase::execute", skip_all, fields(change = ?input.change))]
    pub async fn execute(
        &self,
        input: SetAccountStatusInput,
    ) -> Result<AccountProfile, AccountError> {
        let requesting_user_id = UserId::parse(&input.requesting_user_id)?;
        let target_user_id = UserId::parse(&input.target_user_id)?;
        authorize(
            &requesting_user_id,
            &target_user_id,
            &input.requesting_user_roles,
        )?;

        let mut user = self
            .account_store
            .find_by_id(&target_user_id)
            .await?
            .ok_or(AccountError::NotFound)?;

        let previous = user.status();
        let action = match input.change {
            StatusChange::Activate => {
                user.activate()?;
                AuditAction::UserActivated
            }
            StatusChange::Deactivate => {
                user.deactivate()?;
                AuditAction::UserDeactivated
            }
        };

        self.account_store.save(&user).await?;

        let audit = AuditLog::new(
            requesting_user_id,
            action,
            Some(target_user_id),
            json!({ "previousStatus": previous, "status": user.status() }),
        );
        self.audit_store.save(&audit).await?;

        Ok(user.profile())
    }
}

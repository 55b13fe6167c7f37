use identa_core::{AccountProfile, AccountStore, Role, UserId};

use crate::{authorization::authorize, error::AccountError};

#[derive(Debug, Clone)]
pub struct UpdateProfileInput {
    pub requesting_user_id: String,
    pub target_user_id: String,
    pub requesting_user_roles: Vec<Role>,
    pub full_name: Option<String>,
}

/// Update profile use case - edits the account owner's display data
pub struct UpdateProfileUseCase<'a, A>
where
    A: AccountStore,
{
    account_store: &'a A,
}

impl<'a, A> UpdateProfileUseCase<'a, A>
where
    A: AccountStore,
{
    pub fn new(account_store: &'a A) -> Self {
        Self { account_store }
    }

    /// Execute the update profile use case
    ///
    /// Only the account owner or an admin may update; the check happens
    /// before the store is consulted.
    #[tracing::instrument(name = "UpdateProfileUseCase::execute", skip_all)]
    pub async fn execute(&self, input: UpdateProfileInput) -> Result<AccountProfile, AccountError> {
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

        if let Some(full_name) = input.full_name.as_deref() {
            user.update_profile(full_name)?;
        }

        self.account_store.save(&user).await?;

        Ok(user.profile())
    }
}

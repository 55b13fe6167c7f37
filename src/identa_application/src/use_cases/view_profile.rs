use identa_core::{AccountProfile, AccountStore, Role, UserId};

use crate::{authorization::authorize, error::AccountError};

#[derive(Debug, Clone)]
pub struct ViewProfileInput {
    pub requesting_user_id: String,
    pub target_user_id: String,
    pub requesting_user_roles: Vec<Role>,
}

/// View profile use case - returns the public projection of an account
pub struct ViewProfileUseCase<'a, A>
where
    A: AccountStore,
{
    account_store: &'a A,
}

impl<'a, A> ViewProfileUseCase<'a, A>
where
    A: AccountStore,
{
    pub fn new(account_store: &'a A) -> Self {
        Self { account_store }
    }

    /// Execute the view profile use case
    ///
    /// Admins looking at someone else's account get masked email and phone;
    /// a self-view is never masked.
    #[tracing::instrument(name = "ViewProfileUseCase::execute", skip_all)]
    pub async fn execute(&self, input: ViewProfileInput) -> Result<AccountProfile, AccountError> {
        let requesting_user_id = UserId::parse(&input.requesting_user_id)?;
        let target_user_id = UserId::parse(&input.target_user_id)?;
        let access = authorize(
            &requesting_user_id,
            &target_user_id,
            &input.requesting_user_roles,
        )?;

        let user = self
            .account_store
            .find_by_id(&target_user_id)
            .await?
            .ok_or(AccountError::NotFound)?;

        let profile = user.profile();
        if access.is_admin && !access.is_self {
            return Ok(profile.masked());
        }
        Ok(profile)
    }
}

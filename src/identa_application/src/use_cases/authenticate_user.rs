use chrono::{Duration, Utc};
use identa_core::{
    ACCESS_TOKEN_TTL_SECONDS, AccessClaims, AccountProfile, AccountStore, EmailAddress,
    TokenSigner, UserStatus,
};
use secrecy::Secret;

use crate::error::AccountError;

#[derive(Debug, Clone)]
pub struct AuthenticateUserInput {
    pub email: String,
    pub password: Secret<String>,
}

/// Response from authenticate user use case
#[derive(Debug)]
pub struct AuthenticatedUser {
    /// Signed bearer credential, valid for one hour
    pub token: Secret<String>,
    pub profile: AccountProfile,
}

/// Authenticate user use case - checks credentials and issues an access token
pub struct AuthenticateUserUseCase<'a, A, S>
where
    A: AccountStore,
    S: TokenSigner,
{
    account_store: &'a A,
    token_signer: &'a S,
}

impl<'a, A, S> AuthenticateUserUseCase<'a, A, S>
where
    A: AccountStore,
    S: TokenSigner,
{
    pub fn new(account_store: &'a A, token_signer: &'a S) -> Self {
        Self {
            account_store,
            token_signer,
        }
    }

    /// Execute the authenticate user use case
    ///
    /// Unknown email and wrong password produce the same
    /// `InvalidCredentials` error.
    #[tracing::instrument(name = "AuthenticateUserUseCase::execute", skip_all)]
    pub async fn execute(
        &self,
        input: AuthenticateUserInput,
    ) -> Result<AuthenticatedUser, AccountError> {
        let email = EmailAddress::create(&input.email)?;

        let Some(user) = self.account_store.find_by_email(&email).await? else {
            return Err(AccountError::InvalidCredentials);
        };

        if !user.password().compare(&input.password).await {
            return Err(AccountError::InvalidCredentials);
        }

        if user.status() == UserStatus::Deactivated {
            return Err(AccountError::AccountDeactivated);
        }

        let issued_at = Utc::now();
        let claims = AccessClaims {
            id: *user.id(),
            roles: user.roles().iter().copied().collect(),
            issued_at,
            expires_at: issued_at + Duration::seconds(ACCESS_TOKEN_TTL_SECONDS),
        };

        let token = self
            .token_signer
            .sign(&claims)
            .await
            .map_err(AccountError::TokenSigning)?;

        tracing::info!(user_id = %user.id(), "user authenticated");

        Ok(AuthenticatedUser {
            token,
            profile: user.profile(),
        })
    }
}

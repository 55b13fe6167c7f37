use identa_core::{
    AccountProfile, AccountStore, AuditAction, AuditLog, AuditStore, Country, EmailAddress,
    FullName, NewUser, Notifier, Password, PhoneNumber, User, VerificationToken,
};
use secrecy::{ExposeSecret, Secret};
use serde_json::json;

use crate::error::{AccountError, Identifier};

#[derive(Debug, Clone)]
pub struct RegisterUserInput {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub password: Secret<String>,
    pub terms_version: String,
    pub privacy_version: String,
}

/// Register user use case - creates an account awaiting email verification
pub struct RegisterUserUseCase<'a, A, L, N>
where
    A: AccountStore,
    L: AuditStore,
    N: Notifier,
{
    account_store: &'a A,
    audit_store: &'a L,
    notifier: &'a N,
}

impl<'a, A, L, N> RegisterUserUseCase<'a, A, L, N>
where
    A: AccountStore,
    L: AuditStore,
    N: Notifier,
{
    pub fn new(account_store: &'a A, audit_store: &'a L, notifier: &'a N) -> Self {
        Self {
            account_store,
            audit_store,
            notifier,
        }
    }

    /// Execute the register user use case
    ///
    /// The account is persisted before the verification email is sent. If
    /// the notifier fails the account stays registered and the error is
    /// returned as `AccountError::Notification`; nothing is rolled back.
    ///
    /// # Returns
    /// The public profile of the new account
    #[tracing::instrument(name = "RegisterUserUseCase::execute", skip_all)]
    pub async fn execute(&self, input: RegisterUserInput) -> Result<AccountProfile, AccountError> {
        let email = EmailAddress::create(&input.email)?;
        let phone = PhoneNumber::create(&input.phone, Country::default())?;
        let full_name = FullName::parse(&input.full_name)?;

        // Advisory only; the store's unique constraints decide races.
        if self.account_store.find_by_email(&email).await?.is_some() {
            return Err(AccountError::Conflict(Identifier::Email));
        }
        if self.account_store.find_by_phone(&phone).await?.is_some() {
            return Err(AccountError::Conflict(Identifier::Phone));
        }

        let password = Password::create(input.password).await?;

        let user = User::register(
            NewUser {
                full_name,
                email,
                phone,
                password,
                terms_version: input.terms_version,
                privacy_version: input.privacy_version,
            },
            VerificationToken::generate(),
        );

        self.account_store.save(&user).await?;
        tracing::info!(user_id = %user.id(), "account registered");

        if let Some(token) = user.verification_token() {
            self.notifier
                .send_verification_email(user.id(), user.email(), token)
                .await
                .map_err(AccountError::Notification)?;
        }

        let audit = AuditLog::new(
            *user.id(),
            AuditAction::UserRegistered,
            Some(*user.id()),
            json!({
                "email": user.email().as_ref().expose_secret(),
                "termsVersion": user.terms_version(),
                "privacyVersion": user.privacy_version(),
            }),
        );
        self.audit_store.save(&audit).await?;

        Ok(user.profile())
    }
}

use identa_adapters::{
    EmailNotifier, IdentaSettings, JwtTokenSigner, PostgresAccountStore, PostgresAuditStore,
    PostmarkEmailClient,
};
use identa_application::{
    AccountError, AuthenticateUserInput, AuthenticateUserUseCase, AuthenticatedUser,
    ChangeEmailInput, ChangeEmailUseCase, DeleteAccountInput, DeleteAccountUseCase,
    RegisterUserInput, RegisterUserUseCase, SetAccountStatusInput, SetAccountStatusUseCase,
    UpdateProfileInput, UpdateProfileUseCase, VerifyEmailInput, VerifyEmailUseCase,
    ViewProfileInput, ViewProfileUseCase,
};
use identa_core::{
    AccountProfile, AccountStore, AuditLog, AuditStore, EmailAddress, Notifier, TokenSigner,
    UserId,
};
use secrecy::Secret;

use crate::helpers::{ServiceSetupError, configure_postgresql};

/// Production wiring: PostgreSQL stores, Postmark email and HS256 tokens.
pub type PostgresAccountService = AccountService<
    PostgresAccountStore,
    PostgresAuditStore,
    EmailNotifier<PostmarkEmailClient>,
    JwtTokenSigner,
>;

/// Account service owning its collaborators and exposing every workflow
///
/// Each method builds the matching use case over borrowed collaborators
/// and runs it, so the service can be shared behind an `Arc` by any
/// transport layer.
pub struct AccountService<A, L, N, S> {
    account_store: A,
    audit_store: L,
    notifier: N,
    token_signer: S,
}

impl<A, L, N, S> AccountService<A, L, N, S>
where
    A: AccountStore,
    L: AuditStore,
    N: Notifier,
    S: TokenSigner,
{
    /// Create a new AccountService with the provided collaborators
    ///
    /// # Arguments
    /// * `account_store` - Source of truth for accounts
    /// * `audit_store` - Append-only audit log
    /// * `notifier` - Sends verification and email-change messages
    /// * `token_signer` - Signs access tokens issued on authentication
    pub fn new(account_store: A, audit_store: L, notifier: N, token_signer: S) -> Self {
        Self {
            account_store,
            audit_store,
            notifier,
            token_signer,
        }
    }

    pub fn account_store(&self) -> &A {
        &self.account_store
    }

    pub fn audit_store(&self) -> &L {
        &self.audit_store
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub async fn register(&self, input: RegisterUserInput) -> Result<AccountProfile, AccountError> {
        RegisterUserUseCase::new(&self.account_store, &self.audit_store, &self.notifier)
            .execute(input)
            .await
    }

    pub async fn authenticate(
        &self,
        input: AuthenticateUserInput,
    ) -> Result<AuthenticatedUser, AccountError> {
        AuthenticateUserUseCase::new(&self.account_store, &self.token_signer)
            .execute(input)
            .await
    }

    pub async fn verify_email(&self, input: VerifyEmailInput) -> Result<(), AccountError> {
        VerifyEmailUseCase::new(&self.account_store, &self.audit_store)
            .execute(input)
            .await
    }

    pub async fn change_email(&self, input: ChangeEmailInput) -> Result<(), AccountError> {
        ChangeEmailUseCase::new(&self.account_store, &self.audit_store, &self.notifier)
            .execute(input)
            .await
    }

    pub async fn update_profile(
        &self,
        input: UpdateProfileInput,
    ) -> Result<AccountProfile, AccountError> {
        UpdateProfileUseCase::new(&self.account_store)
            .execute(input)
            .await
    }

    pub async fn view_profile(
        &self,
        input: ViewProfileInput,
    ) -> Result<AccountProfile, AccountError> {
        ViewProfileUseCase::new(&self.account_store)
            .execute(input)
            .await
    }

    pub async fn set_account_status(
        &self,
        input: SetAccountStatusInput,
    ) -> Result<AccountProfile, AccountError> {
        SetAccountStatusUseCase::new(&self.account_store, &self.audit_store)
            .execute(input)
            .await
    }

    pub async fn delete_account(&self, input: DeleteAccountInput) -> Result<(), AccountError> {
        DeleteAccountUseCase::new(&self.account_store, &self.audit_store)
            .execute(input)
            .await
    }

    /// Audit records targeting the account, newest first.
    #[tracing::instrument(name = "AccountService::audit_trail", skip_all)]
    pub async fn audit_trail(&self, target_user_id: &str) -> Result<Vec<AuditLog>, AccountError> {
        let target_user_id = UserId::parse(target_user_id)?;
        Ok(self.audit_store.find_by_target(&target_user_id).await?)
    }

    #[tracing::instrument(name = "AccountService::list_accounts", skip_all)]
    pub async fn list_accounts(
        &self,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<AccountProfile>, AccountError> {
        let users = self.account_store.find_all(limit, offset).await?;
        Ok(users.iter().map(AccountProfile::from).collect())
    }
}

impl PostgresAccountService {
    /// Wire the production collaborators from settings
    ///
    /// Connects to PostgreSQL and runs migrations, then builds the Postmark
    /// client with the configured timeout.
    pub async fn from_settings(settings: &IdentaSettings) -> Result<Self, ServiceSetupError> {
        let pg_pool = configure_postgresql(settings).await?;

        let http_client = reqwest::Client::builder()
            .timeout(settings.email_client.timeout())
            .build()?;
        let email_client = PostmarkEmailClient::new(
            settings.email_client.base_url.clone(),
            EmailAddress::create(&settings.email_client.sender)?,
            settings.email_client.auth_token.clone(),
            http_client,
        );

        Ok(Self::new(
            PostgresAccountStore::new(pg_pool.clone()),
            PostgresAuditStore::new(pg_pool),
            EmailNotifier::new(email_client, settings.app.base_url.clone()),
            JwtTokenSigner::new(Secret::clone(&settings.jwt.secret)),
        ))
    }
}

use identa_core::{
    AccountStore, AuditAction, AuditLog, AuditStore, EmailAddress, Notifier, UserId,
    VerificationToken,
};
use secrecy::ExposeSecret;
use serde_json::json;

use crate::error::{AccountError, Identifier};

#[derive(Debug, Clone)]
pub struct ChangeEmailInput {
    pub user_id: String,
    pub new_email: String,
}

/// Change email use case - parks a new address until it is confirmed
pub struct ChangeEmailUseCase<'a, A, L, N>
where
    A: AccountStore,
    L: AuditStore,
    N: Notifier,
{
    account_store: &'a A,
    audit_store: &'a L,
    notifier: &'a N,
}

impl<'a, A, L, N> ChangeEmailUseCase<'a, A, L, N>
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

    /// Execute the change email use case
    ///
    /// The active email and status are left alone; `VerifyEmailUseCase`
    /// promotes the new address once the emailed token comes back. The
    /// pending change is committed before the confirmation email is sent,
    /// so a notifier failure leaves it in place.
    #[tracing::instrument(name = "ChangeEmailUseCase::execute", skip_all, fields(user_id = %input.user_id))]
    pub async fn execute(&self, input: ChangeEmailInput) -> Result<(), AccountError> {
        let user_id = UserId::parse(&input.user_id)?;
        let new_email = EmailAddress::create(&input.new_email)?;

        let mut user = self
            .account_store
            .find_by_id(&user_id)
            .await?
            .ok_or(AccountError::NotFound)?;

        if self
            .account_store
            .find_by_email(&new_email)
            .await?
            .is_some()
        {
            return Err(AccountError::Conflict(Identifier::Email));
        }

        let token = VerificationToken::generate();
        let old_email = user.email().clone();
        user.initiate_email_change(new_email.clone(), token.clone());

        self.account_store.save(&user).await?;

        let audit = AuditLog::new(
            user_id,
            AuditAction::EmailChangeInitiated,
            Some(user_id),
            json!({
                "oldEmail": old_email.as_ref().expose_secret(),
                "newEmail": new_email.as_ref().expose_secret(),
            }),
        );
        self.audit_store.save(&audit).await?;

        self.notifier
            .send_email_change_notification(&user_id, &new_email, &token)
            .await
            .map_err(AccountError::Notification)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use identa_core::{AccountStoreError, UserStatus};

    use super::*;
    use crate::test_support::{
        MockAccountStore, MockAuditStore, MockNotifier, Sent, token_of, user,
    };

    fn input(user_id: &UserId, new_email: &str) -> ChangeEmailInput {
        ChangeEmailInput {
            user_id: user_id.to_string(),
            new_email: new_email.to_owned(),
        }
    }

    #[tokio::test]
    async fn test_change_email_parks_new_address() {
        let mut existing = user("Jane Doe", "jane@example.com", "01712345678").await;
        let first = token_of(&existing);
        existing.verify_email(&first).unwrap();
        let id = *existing.id();

        let account_store = MockAccountStore::with_users([existing]).await;
        let audit_store = MockAuditStore::default();
        let notifier = MockNotifier::default();
        let use_case = ChangeEmailUseCase::new(&account_store, &audit_store, &notifier);

        use_case
            .execute(input(&id, "Jane.New@Example.com"))
            .await
            .unwrap();

        let stored = account_store.get(&id).await.unwrap();
        assert_eq!(stored.status(), UserStatus::Active);
        assert_eq!(stored.email().as_ref().expose_secret(), "jane@example.com");
        assert_eq!(
            stored.pending_email().unwrap().as_ref().expose_secret(),
            "jane.new@example.com"
        );

        let token = token_of(&stored);
        assert_eq!(
            notifier.sent().await,
            vec![Sent::EmailChange {
                user_id: id,
                to: "jane.new@example.com".to_owned(),
                token,
            }]
        );

        let logs = audit_store.entries().await;
        assert_eq!(logs[0].action, AuditAction::EmailChangeInitiated);
        assert_eq!(logs[0].metadata["oldEmail"], "jane@example.com");
        assert_eq!(logs[0].metadata["newEmail"], "jane.new@example.com");
    }

    #[tokio::test]
    async fn test_change_email_to_taken_address() {
        let existing = user("Jane Doe", "jane@example.com", "01712345678").await;
        let other = user("John Doe", "john@example.com", "01812345678").await;
        let id = *existing.id();

        let account_store = MockAccountStore::with_users([existing, other]).await;
        let audit_store = MockAuditStore::default();
        let notifier = MockNotifier::default();
        let use_case = ChangeEmailUseCase::new(&account_store, &audit_store, &notifier);

        let result = use_case.execute(input(&id, "JOHN@example.com")).await;

        assert!(matches!(
            result,
            Err(AccountError::Conflict(Identifier::Email))
        ));
        assert_eq!(account_store.save_count(), 0);
        assert!(notifier.sent().await.is_empty());
    }

    #[tokio::test]
    async fn test_change_email_write_time_constraint_is_a_conflict() {
        let existing = user("Jane Doe", "jane@example.com", "01712345678").await;
        let id = *existing.id();
        let account_store = MockAccountStore {
            reject_saves_with: Some(|| AccountStoreError::DuplicateEmail),
            ..MockAccountStore::with_users([existing]).await
        };
        let audit_store = MockAuditStore::default();
        let notifier = MockNotifier::default();
        let use_case = ChangeEmailUseCase::new(&account_store, &audit_store, &notifier);

        let result = use_case.execute(input(&id, "new@example.com")).await;

        assert!(matches!(
            result,
            Err(AccountError::Conflict(Identifier::Email))
        ));
        assert!(audit_store.entries().await.is_empty());
        assert!(notifier.sent().await.is_empty());
        let stored = account_store.get(&id).await.unwrap();
        assert!(stored.pending_email().is_none());
    }

    #[tokio::test]
    async fn test_change_email_unknown_user() {
        let account_store = MockAccountStore::default();
        let audit_store = MockAuditStore::default();
        let notifier = MockNotifier::default();
        let use_case = ChangeEmailUseCase::new(&account_store, &audit_store, &notifier);

        let result = use_case
            .execute(input(&UserId::new(), "new@example.com"))
            .await;
        assert!(matches!(result, Err(AccountError::NotFound)));
    }

    #[tokio::test]
    async fn test_change_email_notification_failure_keeps_pending_change() {
        let existing = user("Jane Doe", "jane@example.com", "01712345678").await;
        let id = *existing.id();
        let account_store = MockAccountStore::with_users([existing]).await;
        let audit_store = MockAuditStore::default();
        let notifier = MockNotifier::failing();
        let use_case = ChangeEmailUseCase::new(&account_store, &audit_store, &notifier);

        let result = use_case.execute(input(&id, "new@example.com")).await;

        assert!(matches!(result, Err(AccountError::Notification(_))));
        let stored = account_store.get(&id).await.unwrap();
        assert!(stored.pending_email().is_some());
        assert_eq!(audit_store.entries().await.len(), 1);
    }
}

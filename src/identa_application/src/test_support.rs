//! In-memory collaborators shared by the use case tests.

use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use identa_core::{
    AccessClaims, AccountStore, AccountStoreError, AuditLog, AuditStore, AuditStoreError,
    Country, EmailAddress, FullName, NewUser, Notifier, Password, PhoneNumber, Role, TokenSigner,
    User, UserId, VerificationToken,
};
use secrecy::{ExposeSecret, Secret};
use tokio::sync::RwLock;

#[derive(Default, Clone)]
pub struct MockAccountStore {
    pub users: Arc<RwLock<HashMap<UserId, User>>>,
    pub saves: Arc<AtomicUsize>,
    /// Simulates a concurrent writer winning the unique constraint.
    pub reject_saves_with: Option<fn() -> AccountStoreError>,
}

impl MockAccountStore {
    pub async fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        let store = Self::default();
        {
            let mut map = store.users.write().await;
            for user in users {
                map.insert(*user.id(), user);
            }
        }
        store
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub async fn get(&self, id: &UserId) -> Option<User> {
        self.users.read().await.get(id).cloned()
    }
}

#[async_trait::async_trait]
impl AccountStore for MockAccountStore {
    async fn save(&self, user: &User) -> Result<(), AccountStoreError> {
        if let Some(error) = self.reject_saves_with {
            return Err(error());
        }
        let mut users = self.users.write().await;
        for other in users.values().filter(|other| other.id() != user.id()) {
            if other.email() == user.email() {
                return Err(AccountStoreError::DuplicateEmail);
            }
            if other.phone() == user.phone() {
                return Err(AccountStoreError::DuplicatePhone);
            }
        }
        self.saves.fetch_add(1, Ordering::SeqCst);
        users.insert(*user.id(), user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, AccountStoreError> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, AccountStoreError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email() == email).cloned())
    }

    async fn find_by_phone(
        &self,
        phone: &PhoneNumber,
    ) -> Result<Option<User>, AccountStoreError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.phone() == phone).cloned())
    }

    async fn delete(&self, id: &UserId) -> Result<(), AccountStoreError> {
        self.users
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or(AccountStoreError::AccountNotFound)
    }

    async fn find_all(&self, limit: usize, offset: usize) -> Result<Vec<User>, AccountStoreError> {
        let users = self.users.read().await;
        Ok(users.values().skip(offset).take(limit).cloned().collect())
    }
}

#[derive(Default, Clone)]
pub struct MockAuditStore {
    pub logs: Arc<RwLock<Vec<AuditLog>>>,
}

impl MockAuditStore {
    pub async fn entries(&self) -> Vec<AuditLog> {
        self.logs.read().await.clone()
    }
}

#[async_trait::async_trait]
impl AuditStore for MockAuditStore {
    async fn save(&self, log: &AuditLog) -> Result<(), AuditStoreError> {
        self.logs.write().await.push(log.clone());
        Ok(())
    }

    async fn find_by_target(&self, target_id: &UserId) -> Result<Vec<AuditLog>, AuditStoreError> {
        let logs = self.logs.read().await;
        Ok(logs
            .iter()
            .rev()
            .filter(|log| log.target_id.as_ref() == Some(target_id))
            .cloned()
            .collect())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Sent {
    Verification {
        user_id: UserId,
        to: String,
        token: String,
    },
    EmailChange {
        user_id: UserId,
        to: String,
        token: String,
    },
}

#[derive(Default, Clone)]
pub struct MockNotifier {
    pub sent: Arc<RwLock<Vec<Sent>>>,
    pub fail: bool,
}

impl MockNotifier {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub async fn sent(&self) -> Vec<Sent> {
        self.sent.read().await.clone()
    }
}

#[async_trait::async_trait]
impl Notifier for MockNotifier {
    async fn send_verification_email(
        &self,
        user_id: &UserId,
        to: &EmailAddress,
        token: &VerificationToken,
    ) -> Result<(), String> {
        if self.fail {
            return Err("smtp unavailable".to_owned());
        }
        self.sent.write().await.push(Sent::Verification {
            user_id: *user_id,
            to: to.as_ref().expose_secret().clone(),
            token: token.as_ref().expose_secret().clone(),
        });
        Ok(())
    }

    async fn send_email_change_notification(
        &self,
        user_id: &UserId,
        to: &EmailAddress,
        token: &VerificationToken,
    ) -> Result<(), String> {
        if self.fail {
            return Err("smtp unavailable".to_owned());
        }
        self.sent.write().await.push(Sent::EmailChange {
            user_id: *user_id,
            to: to.as_ref().expose_secret().clone(),
            token: token.as_ref().expose_secret().clone(),
        });
        Ok(())
    }
}

#[derive(Default, Clone)]
pub struct MockTokenSigner {
    pub issued: Arc<RwLock<Vec<AccessClaims>>>,
}

#[async_trait::async_trait]
impl TokenSigner for MockTokenSigner {
    async fn sign(&self, claims: &AccessClaims) -> Result<Secret<String>, String> {
        self.issued.write().await.push(claims.clone());
        Ok(Secret::new(format!("signed.{}.token", claims.id)))
    }
}

pub const PASSWORD: &str = "Abcdefgh123!";

/// An account with a real Argon2 hash of `PASSWORD`.
pub async fn user(full_name: &str, email: &str, phone: &str) -> User {
    let password = Password::create(Secret::new(PASSWORD.to_owned()))
        .await
        .unwrap();
    User::register(
        NewUser {
            full_name: FullName::parse(full_name).unwrap(),
            email: EmailAddress::create(email).unwrap(),
            phone: PhoneNumber::create(phone, Country::Bd).unwrap(),
            password,
            terms_version: "2024-01".to_owned(),
            privacy_version: "2024-01".to_owned(),
        },
        VerificationToken::generate(),
    )
}

pub async fn admin(full_name: &str, email: &str, phone: &str) -> User {
    let mut admin = user(full_name, email, phone).await;
    admin.grant_role(Role::Admin);
    admin
}

pub fn token_of(user: &User) -> String {
    user.verification_token()
        .map(|token| token.as_ref().expose_secret().clone())
        .unwrap_or_default()
}

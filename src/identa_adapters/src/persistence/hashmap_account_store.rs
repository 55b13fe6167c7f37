use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use identa_core::{AccountStore, AccountStoreError, EmailAddress, PhoneNumber, User, UserId};

#[derive(Default, Clone)]
pub struct HashMapAccountStore {
    users: Arc<RwLock<HashMap<UserId, User>>>,
}

impl HashMapAccountStore {
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait::async_trait]
impl AccountStore for HashMapAccountStore {
    async fn save(&self, user: &User) -> Result<(), AccountStoreError> {
        let mut users = self.users.write().await;

        let others = users.values().filter(|other| other.id() != user.id());
        for other in others {
            if other.email() == user.email() {
                return Err(AccountStoreError::DuplicateEmail);
            }
            if other.phone() == user.phone() {
                return Err(AccountStoreError::DuplicatePhone);
            }
        }

        users.insert(*user.id(), user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, AccountStoreError> {
        let users = self.users.read().await;
        Ok(users.get(id).cloned())
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, AccountStoreError> {
        let users = self.users.read().await;
        Ok(users.values().find(|user| user.email() == email).cloned())
    }

    async fn find_by_phone(
        &self,
        phone: &PhoneNumber,
    ) -> Result<Option<User>, AccountStoreError> {
        let users = self.users.read().await;
        Ok(users.values().find(|user| user.phone() == phone).cloned())
    }

    async fn delete(&self, id: &UserId) -> Result<(), AccountStoreError> {
        let mut users = self.users.write().await;
        users.remove(id).ok_or(AccountStoreError::AccountNotFound)?;
        Ok(())
    }

    async fn find_all(&self, limit: usize, offset: usize) -> Result<Vec<User>, AccountStoreError> {
        let users = self.users.read().await;
        let mut all: Vec<User> = users.values().cloned().collect();
        all.sort_by(|a, b| {
            a.created_at()
                .cmp(&b.created_at())
                .then_with(|| a.id().cmp(b.id()))
        });
        Ok(all.into_iter().skip(offset).take(limit).collect())
    }
}

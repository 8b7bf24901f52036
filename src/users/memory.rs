use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};

use axum::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::directory::{DirectoryError, UserDirectory};
use super::model::{NewUser, User};

/// In-memory directory keyed by email. Backs tests; uniqueness is enforced
/// atomically under the write lock, mirroring the store's constraint.
#[derive(Default)]
pub struct MemoryDirectory {
    users: RwLock<HashMap<String, User>>,
    next_id: AtomicI64,
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Test hook: drop a user, as if the account had been deleted out from
    /// under an outstanding token.
    pub async fn remove(&self, email: &str) -> bool {
        self.users.write().await.remove(email).is_some()
    }
}

#[async_trait]
impl UserDirectory for MemoryDirectory {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DirectoryError> {
        Ok(self.users.read().await.get(email).cloned())
    }

    async fn exists(&self, email: &str) -> Result<bool, DirectoryError> {
        Ok(self.users.read().await.contains_key(email))
    }

    async fn create(&self, new_user: NewUser) -> Result<User, DirectoryError> {
        let mut users = self.users.write().await;
        if users.contains_key(&new_user.email) {
            return Err(DirectoryError::DuplicateEmail);
        }
        let user = User {
            id: self.next_id.fetch_add(1, Ordering::Relaxed) + 1,
            uuid: Uuid::new_v4(),
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            email: new_user.email.clone(),
            password_hash: new_user.password_hash,
            role: "GENERAL".into(),
            password_verified: false,
            last_login: None,
            date_created: OffsetDateTime::now_utc(),
        };
        users.insert(new_user.email, user.clone());
        Ok(user)
    }

    async fn record_login(&self, uuid: Uuid, when: OffsetDateTime) -> Result<(), DirectoryError> {
        let mut users = self.users.write().await;
        if let Some(user) = users.values_mut().find(|u| u.uuid == uuid) {
            user.last_login = Some(when);
        }
        Ok(())
    }
}

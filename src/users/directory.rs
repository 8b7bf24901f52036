use axum::async_trait;
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

use super::model::{NewUser, User};

#[derive(Debug, Error)]
pub enum DirectoryError {
    /// The store's unique constraint rejected the email. Can occur even
    /// after an `exists` check returned false; the constraint is the
    /// authority, not the check.
    #[error("email already exists")]
    DuplicateEmail,

    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// Contract over the persistent user store. A missing record is data
/// (`Ok(None)` / `Ok(false)`), a failed lookup is an error.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DirectoryError>;

    async fn exists(&self, email: &str) -> Result<bool, DirectoryError>;

    async fn create(&self, new_user: NewUser) -> Result<User, DirectoryError>;

    /// Explicit last-login write, kept out of the read path.
    async fn record_login(&self, uuid: Uuid, when: OffsetDateTime) -> Result<(), DirectoryError>;
}

use axum::async_trait;
use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use super::directory::{DirectoryError, UserDirectory};
use super::model::{NewUser, User};

const USER_COLUMNS: &str =
    "id, uuid, first_name, last_name, email, password_hash, role, password_verified, last_login, date_created";

#[derive(Clone)]
pub struct PgDirectory {
    pool: PgPool,
}

impl PgDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_sqlx_error(err: sqlx::Error) -> DirectoryError {
    if let sqlx::Error::Database(db) = &err {
        if db.kind() == sqlx::error::ErrorKind::UniqueViolation {
            return DirectoryError::DuplicateEmail;
        }
    }
    DirectoryError::Backend(err.into())
}

#[async_trait]
impl UserDirectory for PgDirectory {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DirectoryError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;
        Ok(user)
    }

    async fn exists(&self, email: &str) -> Result<bool, DirectoryError> {
        let present: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
                .bind(email)
                .fetch_one(&self.pool)
                .await
                .map_err(map_sqlx_error)?;
        Ok(present)
    }

    async fn create(&self, new_user: NewUser) -> Result<User, DirectoryError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (uuid, first_name, last_name, email, password_hash) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(&new_user.first_name)
        .bind(&new_user.last_name)
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;
        Ok(user)
    }

    async fn record_login(&self, uuid: Uuid, when: OffsetDateTime) -> Result<(), DirectoryError> {
        sqlx::query("UPDATE users SET last_login = $2 WHERE uuid = $1")
            .bind(uuid)
            .bind(when)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }
}

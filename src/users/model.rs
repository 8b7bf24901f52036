use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// User record as persisted in the store.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,                           // internal ID, never exposed
    pub uuid: Uuid,                        // public identifier, immutable
    pub first_name: String,
    pub last_name: String,
    pub email: String,                     // unique, stored lowercased
    #[serde(skip_serializing)]
    pub password_hash: String,             // Argon2 hash, not exposed in JSON
    pub role: String,
    pub password_verified: bool,
    pub last_login: Option<OffsetDateTime>,
    pub date_created: OffsetDateTime,
}

impl User {
    /// The subset of the record that is safe to embed in a token or return
    /// to a client.
    pub fn public_profile(&self) -> PublicProfile {
        PublicProfile {
            uuid: self.uuid,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            role: self.role.clone(),
            password_verified: self.password_verified,
            last_login: self.last_login,
            date_created: self.date_created,
        }
    }
}

/// Validated registration payload handed to the directory. Carries the hash,
/// never the plaintext password.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
}

/// Public part of a user. Excludes the internal ID and the password hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicProfile {
    pub uuid: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: String,
    pub password_verified: bool,
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_login: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub date_created: OffsetDateTime,
}

use time::OffsetDateTime;
use tracing::{info, warn};

use crate::auth::dto::{LoginRequest, RegisterRequest, RegisteredUser, TokenPair};
use crate::auth::password::{hash_password, verify_password};
use crate::auth::tokens::TokenKeys;
use crate::auth::validate;
use crate::error::AppError;
use crate::users::{NewUser, UserDirectory};

/// Registration: body shape, email format, uniqueness, password policy,
/// hash, persist. The store's unique constraint remains the authority; a
/// race past the `exists` check surfaces as the same conflict.
pub async fn register(
    directory: &dyn UserDirectory,
    body: RegisterRequest,
) -> Result<RegisteredUser, AppError> {
    let payload = validate::validate_register_body(body)?;

    if directory.exists(&payload.email).await? {
        warn!(email = %payload.email, "registration for existing email");
        return Err(AppError::Conflict("Email already exists".into()));
    }

    if !validate::is_strong_password(&payload.password) {
        return Err(AppError::Validation(validate::PASSWORD_REQUIREMENTS.into()));
    }

    let password_hash = hash_password(&payload.password)?;
    let user = directory
        .create(NewUser {
            first_name: payload.first_name,
            last_name: payload.last_name,
            email: payload.email,
            password_hash,
        })
        .await?;

    info!(user = %user.uuid, email = %user.email, "user registered");
    Ok(RegisteredUser {
        email: user.email,
        uuid: user.uuid,
    })
}

/// Login: body shape, email format, lookup, password check, token pair.
/// Unknown email and wrong password are indistinguishable to the caller;
/// the logs keep them apart.
pub async fn login(
    directory: &dyn UserDirectory,
    keys: &TokenKeys,
    body: LoginRequest,
) -> Result<TokenPair, AppError> {
    let payload = validate::validate_login_body(body)?;

    let user = match directory.find_by_email(&payload.email).await? {
        Some(user) => user,
        None => {
            warn!(email = %payload.email, "login for unknown email");
            return Err(AppError::Unauthorized("Invalid login"));
        }
    };

    if !verify_password(&payload.password, &user.password_hash) {
        warn!(user = %user.uuid, "login with invalid password");
        return Err(AppError::Unauthorized("Invalid login"));
    }

    // Separate write, after verification. Its failure downgrades to a log
    // line; the login still succeeds.
    if let Err(e) = directory
        .record_login(user.uuid, OffsetDateTime::now_utc())
        .await
    {
        warn!(user = %user.uuid, error = %e, "failed to record last login");
    }

    let profile = user.public_profile();
    let tokens = TokenPair {
        access_token: keys.sign_access(profile.clone())?,
        refresh_token: keys.sign_refresh(profile)?,
    };

    info!(user = %user.uuid, "user logged in");
    Ok(tokens)
}

/// Refresh: validate the presented refresh token and rotate the pair. Every
/// failure collapses into the uniform unauthorized outcome.
pub fn refresh(keys: &TokenKeys, refresh_token: &str) -> Result<TokenPair, AppError> {
    keys.refresh_pair(refresh_token).map_err(|e| {
        warn!(error = %e, "refresh token rejected");
        AppError::Unauthorized("Unauthorized")
    })
}

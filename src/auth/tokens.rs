use std::time::Duration;

use axum::extract::FromRef;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::debug;
use uuid::Uuid;

use crate::auth::dto::TokenPair;
use crate::config::TokenConfig;
use crate::state::AppState;
use crate::users::PublicProfile;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// JWT payload: the public profile plus standard claims. `jti` makes every
/// issued token unique and leaves room for a revocation list later.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub jti: Uuid,
    pub iat: usize,
    pub exp: usize,
    pub iss: String,
    pub aud: String,
    pub kind: TokenKind,
    pub user: PublicProfile,
}

/// Signing and verification keys, built once from config. Access and
/// refresh tokens use distinct secrets.
#[derive(Clone)]
pub struct TokenKeys {
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
    issuer: String,
    audience: String,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl FromRef<AppState> for TokenKeys {
    fn from_ref(state: &AppState) -> Self {
        Self::from_config(&state.config.tokens)
    }
}

impl TokenKeys {
    pub fn from_config(config: &TokenConfig) -> Self {
        Self {
            access_encoding: EncodingKey::from_secret(config.access_secret.as_bytes()),
            access_decoding: DecodingKey::from_secret(config.access_secret.as_bytes()),
            refresh_encoding: EncodingKey::from_secret(config.refresh_secret.as_bytes()),
            refresh_decoding: DecodingKey::from_secret(config.refresh_secret.as_bytes()),
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            access_ttl: Duration::from_secs((config.access_ttl_minutes as u64) * 60),
            refresh_ttl: Duration::from_secs((config.refresh_ttl_minutes as u64) * 60),
        }
    }

    fn sign_with_kind(&self, profile: PublicProfile, kind: TokenKind) -> anyhow::Result<String> {
        let (key, ttl) = match kind {
            TokenKind::Access => (&self.access_encoding, self.access_ttl),
            TokenKind::Refresh => (&self.refresh_encoding, self.refresh_ttl),
        };
        let now = OffsetDateTime::now_utc();
        let exp = now + TimeDuration::seconds(ttl.as_secs() as i64);
        let claims = Claims {
            sub: profile.uuid,
            jti: Uuid::new_v4(),
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            kind,
            user: profile,
        };
        let token = encode(&Header::default(), &claims, key)?;
        debug!(user = %claims.sub, kind = ?kind, "token signed");
        Ok(token)
    }

    pub fn sign_access(&self, profile: PublicProfile) -> anyhow::Result<String> {
        self.sign_with_kind(profile, TokenKind::Access)
    }

    pub fn sign_refresh(&self, profile: PublicProfile) -> anyhow::Result<String> {
        self.sign_with_kind(profile, TokenKind::Refresh)
    }

    /// Verify signature, expiry, issuer and audience with the key matching
    /// `kind`, then require the embedded kind claim to match as well. A
    /// token signed with the other key never validates here.
    pub fn verify(&self, token: &str, kind: TokenKind) -> anyhow::Result<Claims> {
        let key = match kind {
            TokenKind::Access => &self.access_decoding,
            TokenKind::Refresh => &self.refresh_decoding,
        };
        let mut validation = Validation::default();
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        validation.set_audience(std::slice::from_ref(&self.audience));
        let data = decode::<Claims>(token, key, &validation)?;
        if data.claims.kind != kind {
            anyhow::bail!("token kind mismatch");
        }
        debug!(user = %data.claims.sub, kind = ?kind, "token verified");
        Ok(data.claims)
    }

    /// Validate a refresh token and mint a fresh access/refresh pair from
    /// the profile it carries. The old refresh token is not revoked; the
    /// design is stateless and the predecessor stays valid until expiry.
    pub fn refresh_pair(&self, refresh_token: &str) -> anyhow::Result<TokenPair> {
        let claims = self.verify(refresh_token, TokenKind::Refresh)?;
        Ok(TokenPair {
            access_token: self.sign_access(claims.user.clone())?,
            refresh_token: self.sign_refresh(claims.user)?,
        })
    }
}

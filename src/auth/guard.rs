use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use tracing::warn;

use crate::auth::tokens::{TokenKeys, TokenKind};
use crate::error::AppError;
use crate::state::AppState;
use crate::users::PublicProfile;

const DENIED: AppError = AppError::Unauthorized("Unauthorized");

/// Decoded profile attached to the request by the guard, available to
/// downstream handlers via extension.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub PublicProfile);

/// Gate configured protected paths. Everything else passes through
/// untouched. Every failure branch resolves to the same 401; the cause only
/// reaches the logs.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = request.uri().path();
    if !state.config.protected_routes.iter().any(|p| p == path) {
        return Ok(next.run(request).await);
    }

    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(DENIED)?;
    let token = parse_bearer(header).ok_or(DENIED)?;

    let keys = TokenKeys::from_ref(&state);
    let claims = keys.verify(token, TokenKind::Access).map_err(|e| {
        warn!(error = %e, "guard rejected token");
        DENIED
    })?;

    if claims.user.email.is_empty() {
        warn!(user = %claims.sub, "token carries no email claim");
        return Err(DENIED);
    }

    // Tokens can outlive account deletion; re-confirm the user. A directory
    // failure here also denies.
    match state.directory.exists(&claims.user.email).await {
        Ok(true) => {}
        Ok(false) => {
            warn!(user = %claims.sub, "token for deleted user");
            return Err(DENIED);
        }
        Err(e) => {
            warn!(error = %e, "directory check failed during guard");
            return Err(DENIED);
        }
    }

    request.extensions_mut().insert(CurrentUser(claims.user));
    Ok(next.run(request).await)
}

/// Split an Authorization header value into scheme and token. The scheme
/// word must be exactly `Bearer` and the token segment must be present.
fn parse_bearer(header: &str) -> Option<&str> {
    let mut parts = header.split(' ');
    if parts.next()? != "Bearer" {
        return None;
    }
    match parts.next() {
        Some(token) if !token.is_empty() => Some(token),
        _ => None,
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<CurrentUser>().cloned().ok_or(DENIED)
    }
}

/// Raw bearer token for the refresh endpoint, which validates it against
/// the refresh key rather than the access key.
pub struct BearerToken(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(DENIED)?;
        let token = parse_bearer(header).ok_or(DENIED)?;
        Ok(BearerToken(token.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::service;
    use crate::auth::dto::RegisterRequest;
    use crate::config::{AppConfig, TokenConfig};
    use crate::state::AppState;
    use crate::users::MemoryDirectory;
    use crate::users::UserDirectory;
    use axum::{
        body::Body,
        http::{Request as HttpRequest, StatusCode},
        middleware,
        routing::get,
        Json, Router,
    };
    use std::sync::Arc;
    use tower::ServiceExt;

    #[test]
    fn parse_bearer_requires_the_exact_scheme_word() {
        assert_eq!(parse_bearer("Bearer abc"), Some("abc"));
        assert_eq!(parse_bearer("Token abc"), None);
        assert_eq!(parse_bearer("bearer abc"), None);
        assert_eq!(parse_bearer("Bearer"), None);
        assert_eq!(parse_bearer("Bearer "), None);
        assert_eq!(parse_bearer(""), None);
    }

    fn test_config() -> AppConfig {
        AppConfig {
            database_url: "postgres://unused".into(),
            tokens: TokenConfig {
                access_secret: "test-access-secret".into(),
                refresh_secret: "test-refresh-secret".into(),
                issuer: "test-issuer".into(),
                audience: "test-aud".into(),
                access_ttl_minutes: 5,
                refresh_ttl_minutes: 60,
            },
            protected_routes: vec!["/me".into()],
        }
    }

    async fn me(CurrentUser(profile): CurrentUser) -> Json<PublicProfile> {
        Json(profile)
    }

    fn app(state: AppState) -> Router {
        Router::new()
            .route("/me", get(me))
            .route("/open", get(|| async { "open" }))
            .layer(middleware::from_fn_with_state(state.clone(), require_auth))
            .with_state(state)
    }

    async fn seeded_state() -> (AppState, Arc<MemoryDirectory>, String) {
        let dir = Arc::new(MemoryDirectory::new());
        let state = AppState::from_parts(dir.clone(), Arc::new(test_config()));
        service::register(
            dir.as_ref(),
            RegisterRequest {
                first_name: Some("Ada".into()),
                last_name: Some("Lovelace".into()),
                email: Some("ada@example.com".into()),
                password: Some("Abcdef1!".into()),
            },
        )
        .await
        .unwrap();
        let user = dir
            .find_by_email("ada@example.com")
            .await
            .unwrap()
            .unwrap();
        let keys = TokenKeys::from_ref(&state);
        let token = keys.sign_access(user.public_profile()).unwrap();
        (state, dir, token)
    }

    async fn get_status(app: Router, path: &str, auth: Option<&str>) -> StatusCode {
        let mut builder = HttpRequest::builder().uri(path);
        if let Some(value) = auth {
            builder = builder.header(AUTHORIZATION, value);
        }
        let response = app
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap();
        response.status()
    }

    #[tokio::test]
    async fn unprotected_path_passes_through() {
        let (state, _, _) = seeded_state().await;
        assert_eq!(get_status(app(state), "/open", None).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn missing_header_is_unauthorized() {
        let (state, _, _) = seeded_state().await;
        assert_eq!(
            get_status(app(state), "/me", None).await,
            StatusCode::UNAUTHORIZED
        );
    }

    #[tokio::test]
    async fn wrong_scheme_is_unauthorized() {
        let (state, _, token) = seeded_state().await;
        assert_eq!(
            get_status(app(state), "/me", Some(&format!("Token {token}"))).await,
            StatusCode::UNAUTHORIZED
        );
    }

    #[tokio::test]
    async fn missing_token_segment_is_unauthorized() {
        let (state, _, _) = seeded_state().await;
        assert_eq!(
            get_status(app(state), "/me", Some("Bearer")).await,
            StatusCode::UNAUTHORIZED
        );
    }

    #[tokio::test]
    async fn wrongly_signed_token_is_unauthorized() {
        let (state, dir, _) = seeded_state().await;
        let mut foreign = test_config();
        foreign.tokens.access_secret = "some-other-secret".into();
        let foreign_keys = TokenKeys::from_config(&foreign.tokens);
        let user = dir
            .find_by_email("ada@example.com")
            .await
            .unwrap()
            .unwrap();
        let token = foreign_keys.sign_access(user.public_profile()).unwrap();
        assert_eq!(
            get_status(app(state), "/me", Some(&format!("Bearer {token}"))).await,
            StatusCode::UNAUTHORIZED
        );
    }

    #[tokio::test]
    async fn refresh_token_is_rejected_by_the_access_guard() {
        let (state, dir, _) = seeded_state().await;
        let keys = TokenKeys::from_ref(&state);
        let user = dir
            .find_by_email("ada@example.com")
            .await
            .unwrap()
            .unwrap();
        let refresh = keys.sign_refresh(user.public_profile()).unwrap();
        assert_eq!(
            get_status(app(state), "/me", Some(&format!("Bearer {refresh}"))).await,
            StatusCode::UNAUTHORIZED
        );
    }

    #[tokio::test]
    async fn deleted_user_is_unauthorized() {
        let (state, dir, token) = seeded_state().await;
        assert!(dir.remove("ada@example.com").await);
        assert_eq!(
            get_status(app(state), "/me", Some(&format!("Bearer {token}"))).await,
            StatusCode::UNAUTHORIZED
        );
    }

    #[tokio::test]
    async fn valid_token_attaches_the_profile() {
        let (state, _, token) = seeded_state().await;
        let response = app(state)
            .oneshot(
                HttpRequest::builder()
                    .uri("/me")
                    .header(AUTHORIZATION, format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        use http_body_util::BodyExt;
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let profile: PublicProfile = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(profile.email, "ada@example.com");
    }
}

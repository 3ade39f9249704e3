//! Static-token auth gate.
//!
//! Accepted `Authorization` values, with or without a `Bearer ` prefix:
//! `<token>` or `<token>:<user-id>:<status>` where status is `active`,
//! `premium` or `admin`.

use crate::error::AuthFailure;
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// User id given to callers presenting the bare token.
pub const STATIC_USER_ID: &str = "static";

#[derive(Clone, Debug)]
pub struct AuthConfig {
    token: String,
}

impl AuthConfig {
    pub fn new(token: impl Into<String>) -> Self {
        AuthConfig { token: token.into() }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UserStatus {
    Active,
    Premium,
    Admin,
}

impl UserStatus {
    fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "active" => Some(UserStatus::Active),
            "premium" => Some(UserStatus::Premium),
            "admin" => Some(UserStatus::Admin),
            _ => None,
        }
    }
}

/// Caller identity attached to the request by [`require_auth`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthUser {
    pub id: String,
    pub status: UserStatus,
    pub is_admin: bool,
    pub is_premium: bool,
}

impl AuthUser {
    fn new(id: String, status: UserStatus) -> Self {
        AuthUser {
            id,
            status,
            is_admin: status == UserStatus::Admin,
            is_premium: matches!(status, UserStatus::Premium | UserStatus::Admin),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthResult {
    Accepted(AuthUser),
    Rejected(AuthFailure),
}

pub fn authenticate(headers: &HeaderMap, config: &AuthConfig) -> AuthResult {
    match check(headers, config) {
        Ok(user) => AuthResult::Accepted(user),
        Err(failure) => AuthResult::Rejected(failure),
    }
}

fn check(headers: &HeaderMap, config: &AuthConfig) -> Result<AuthUser, AuthFailure> {
    let raw = headers.get(AUTHORIZATION).ok_or(AuthFailure::MissingHeader)?;
    let value = raw.to_str().map_err(|_| AuthFailure::Malformed)?.trim();
    if value.is_empty() {
        return Err(AuthFailure::MissingHeader);
    }
    let token = match value.split_once(' ') {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("bearer") => rest.trim(),
        Some(_) => return Err(AuthFailure::Malformed),
        None if value.eq_ignore_ascii_case("bearer") => return Err(AuthFailure::Malformed),
        None => value,
    };
    let segments: Vec<&str> = token.split(':').collect();
    if segments.iter().any(|s| s.is_empty()) {
        return Err(AuthFailure::Malformed);
    }
    match segments.as_slice() {
        [secret] => {
            verify_secret(secret, config)?;
            Ok(AuthUser::new(STATIC_USER_ID.to_string(), UserStatus::Active))
        }
        [secret, user_id, status] => {
            verify_secret(secret, config)?;
            let status = UserStatus::parse(status).ok_or_else(|| AuthFailure::InvalidStatus(status.to_string()))?;
            Ok(AuthUser::new(user_id.to_string(), status))
        }
        _ => Err(AuthFailure::Malformed),
    }
}

fn verify_secret(secret: &str, config: &AuthConfig) -> Result<(), AuthFailure> {
    if secret != config.token {
        return Err(AuthFailure::InvalidToken);
    }
    Ok(())
}

/// Middleware: reject unauthenticated requests, otherwise attach [`AuthUser`].
pub async fn require_auth(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    match authenticate(request.headers(), &state.auth) {
        AuthResult::Accepted(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        AuthResult::Rejected(failure) => {
            tracing::debug!(code = failure.code(), "request rejected by auth gate");
            failure.into_response()
        }
    }
}

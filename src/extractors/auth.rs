//! Extract the caller attached by the auth gate.

use crate::auth::AuthUser;
use crate::error::AuthFailure;
use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};

/// Rejects with `MISSING_AUTH_HEADER` when the route is not behind the auth gate.
#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthFailure;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or(AuthFailure::MissingHeader)
    }
}

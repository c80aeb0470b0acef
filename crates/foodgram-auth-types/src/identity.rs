//! `Authorization` header extractors.

use std::sync::Arc;

use axum::Json;
use axum::extract::{FromRef, FromRequestParts};
use axum::response::{IntoResponse, Response};
use http::request::Parts;
use http::{HeaderMap, StatusCode, header::AUTHORIZATION};

use foodgram_domain::user::UserRole;

use crate::token::validate_token;

/// HMAC secret used to validate auth tokens. Expose it from the app state via `FromRef`.
#[derive(Clone)]
pub struct TokenSecret(pub Arc<str>);

/// Why a request could not be authenticated. Always a 401.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthRejection {
    #[error("authentication credentials were not provided")]
    MissingCredentials,
    #[error("invalid authentication token")]
    InvalidToken,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "kind": "UNAUTHORIZED",
            "message": self.to_string(),
        });
        (StatusCode::UNAUTHORIZED, Json(body)).into_response()
    }
}

/// Authenticated caller, resolved from `Authorization: Token <jwt>` (or `Bearer <jwt>`).
///
/// Returns 401 if the header is absent, malformed, or the token fails validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub user_id: i32,
    pub role: UserRole,
}

impl Identity {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Caller that may be anonymous.
///
/// A missing header yields `MaybeIdentity(None)`; a present but invalid token is still 401.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaybeIdentity(pub Option<Identity>);

impl MaybeIdentity {
    pub fn user_id(&self) -> Option<i32> {
        self.0.map(|identity| identity.user_id)
    }
}

fn authenticate(headers: &HeaderMap, secret: &str) -> Result<Option<Identity>, AuthRejection> {
    let Some(value) = headers.get(AUTHORIZATION) else {
        return Ok(None);
    };
    let value = value.to_str().map_err(|_| AuthRejection::InvalidToken)?;
    let token = value
        .strip_prefix("Token ")
        .or_else(|| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AuthRejection::InvalidToken)?;
    let info = validate_token(token, secret).map_err(|e| {
        tracing::debug!(error = %e, "rejected auth token");
        AuthRejection::InvalidToken
    })?;
    Ok(Some(Identity {
        user_id: info.user_id,
        role: info.role,
    }))
}

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
    TokenSecret: FromRef<S>,
{
    type Rejection = AuthRejection;

    // axum-core 0.5 defines this as `fn -> impl Future + Send` (not `async fn`).
    // Resolve synchronously and return a 'static async move block.
    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let secret = TokenSecret::from_ref(state);
        let result = authenticate(&parts.headers, &secret.0);
        async move { result?.ok_or(AuthRejection::MissingCredentials) }
    }
}

impl<S> FromRequestParts<S> for MaybeIdentity
where
    S: Send + Sync,
    TokenSecret: FromRef<S>,
{
    type Rejection = AuthRejection;

    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let secret = TokenSecret::from_ref(state);
        let result = authenticate(&parts.headers, &secret.0).map(MaybeIdentity);
        async move { result }
    }
}

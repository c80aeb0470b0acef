use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use foodgram_auth_types::identity::Identity;

use crate::error::ApiError;
use crate::handlers::extract::ApiJson;
use crate::state::AppState;
use crate::usecase::user::LoginUseCase;

// ── POST /api/auth/token/login/ ──────────────────────────────────────────────

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub auth_token: String,
}

pub async fn login(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let usecase = LoginUseCase {
        users: state.user_repo(),
        token_secret: state.config.jwt_secret.clone(),
        token_ttl_secs: state.config.token_ttl_secs,
    };
    let auth_token = usecase.execute(&body.email, &body.password).await?;
    Ok(Json(LoginResponse { auth_token }))
}

// ── POST /api/auth/token/logout/ ─────────────────────────────────────────────

/// Tokens are stateless; logout only confirms the caller held a valid one.
pub async fn logout(identity: Identity) -> StatusCode {
    tracing::debug!(user_id = identity.user_id, "user logged out");
    StatusCode::NO_CONTENT
}

//! Login endpoint.

use axum::{extract::State, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::auth::{self, TOKEN_TTL_SECS};
use crate::errors::AppError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct AuthRequest {
    /// Missing password falls through to the mismatch path, like an empty one.
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub success: bool,
    pub token: String,
    pub expires_in: i64,
}

/// POST /api/auth - Verify the shared password and mint a bearer token.
pub async fn authenticate(
    State(state): State<AppState>,
    Json(request): Json<AuthRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let Some(expected) = state.config.admin_password.as_deref() else {
        return Err(AppError::ServerMisconfigured(
            "No admin password configured".to_string(),
        ));
    };

    if !auth::constant_time_compare(&request.password, expected) {
        return Err(AppError::Unauthorized("Wrong password".to_string()));
    }

    let now_ms = Utc::now().timestamp_millis();
    let token = auth::mint_token(now_ms);

    // Store-level expiry: drop what is already dead, then persist the new
    // token with its own deadline. Earlier tokens stay valid until theirs.
    if let Err(e) = state.repo.purge_expired_tokens(now_ms).await {
        tracing::warn!("Failed to purge expired tokens: {}", e);
    }

    state
        .repo
        .insert_token(&token, now_ms, now_ms + TOKEN_TTL_SECS * 1000)
        .await?;

    tracing::info!("Owner logged in, token minted");

    Ok(Json(AuthResponse {
        success: true,
        token,
        expires_in: TOKEN_TTL_SECS,
    }))
}

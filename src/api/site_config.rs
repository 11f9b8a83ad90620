//! Config document endpoints.
//!
//! GET is public and cache-friendly; POST replaces the whole document and
//! requires a valid bearer token.

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Serialize;

use crate::errors::AppError;
use crate::models::{default_document, ProfileDocument};
use crate::AppState;

/// Cache directive for config responses.
const CONFIG_CACHE_CONTROL: &str = "public, max-age=60";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveResponse {
    pub success: bool,
    pub message: String,
    pub updated_at: i64,
}

/// GET /api/config - Serve the stored document, or the default when absent.
pub async fn get_config(State(state): State<AppState>, headers: HeaderMap) -> Response {
    // Read failures degrade to the default document; the page must always
    // render something.
    let document = match state.repo.get_config().await {
        Ok(Some(doc)) => doc,
        Ok(None) => default_document(),
        Err(e) => {
            tracing::warn!("Config read failed, serving default document: {}", e);
            default_document()
        }
    };

    let etag = document.freshness_tag();

    let if_none_match = headers
        .get(header::IF_NONE_MATCH)
        .and_then(|v| v.to_str().ok());

    if if_none_match == Some(etag.as_str()) {
        return (
            StatusCode::NOT_MODIFIED,
            [
                (header::ETAG, etag),
                (header::CACHE_CONTROL, CONFIG_CACHE_CONTROL.to_string()),
            ],
        )
            .into_response();
    }

    (
        [
            (header::ETAG, etag),
            (header::CACHE_CONTROL, CONFIG_CACHE_CONTROL.to_string()),
        ],
        Json(document),
    )
        .into_response()
}

/// POST /api/config - Replace the document wholesale. Requires a bearer token.
pub async fn save_config(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(mut document): Json<ProfileDocument>,
) -> Result<Json<SaveResponse>, AppError> {
    crate::auth::require_token(&state, &headers).await?;

    // The timestamp is never taken from the client.
    let updated_at = Utc::now().timestamp_millis();
    document.updated_at = Some(updated_at);

    state
        .repo
        .put_config(&document)
        .await
        .map_err(|e| AppError::SaveFailed(format!("Save failed: {}", e)))?;

    tracing::info!(updated_at, "Configuration saved");

    Ok(Json(SaveResponse {
        success: true,
        message: "Configuration saved".to_string(),
        updated_at,
    }))
}

//! Image retrieval endpoint.

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};

use crate::errors::AppError;
use crate::AppState;

/// Uploaded images never change under a given filename; cache for a year.
const IMAGE_CACHE_CONTROL: &str = "public, max-age=31536000";

/// GET /api/images/{filename} - Stream a stored image.
pub async fn get_image(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, AppError> {
    if filename.is_empty() {
        return Err(AppError::NotFound("Image not found".to_string()));
    }

    let image = state
        .repo
        .get_image(&filename)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Image {} not found", filename)))?;

    Ok((
        [
            (header::CONTENT_TYPE, image.content_type.clone()),
            (header::ETAG, format!("\"{}\"", image.checksum)),
            (header::CACHE_CONTROL, IMAGE_CACHE_CONTROL.to_string()),
        ],
        image.data,
    )
        .into_response())
}

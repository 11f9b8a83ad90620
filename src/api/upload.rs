//! Image upload endpoint.

use axum::{
    extract::{Multipart, State},
    http::HeaderMap,
    Json,
};
use chrono::Utc;
use serde::Serialize;

use crate::db::StoredImage;
use crate::errors::AppError;
use crate::AppState;

/// Content types accepted for upload. The declared type is trusted as-is;
/// there is no sniffing and no size limit.
const ALLOWED_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/webp", "image/gif"];

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub filename: String,
    pub url: String,
    #[serde(rename = "type")]
    pub slot_type: String,
}

/// POST /api/upload - Validate and store an uploaded image. Requires a bearer token.
pub async fn upload_image(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    crate::auth::require_token(&state, &headers).await?;

    let mut file: Option<(String, String, Vec<u8>)> = None;
    let mut slot_type: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Malformed multipart body: {}", e)))?
    {
        let name = field.name().map(|s| s.to_string());
        match name.as_deref() {
            Some("file") => {
                let original_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().unwrap_or_default().to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Malformed multipart body: {}", e)))?
                    .to_vec();
                file = Some((original_name, content_type, data));
            }
            Some("type") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Malformed multipart body: {}", e)))?;
                slot_type = Some(value);
            }
            _ => {}
        }
    }

    let (original_name, content_type, data) =
        file.ok_or_else(|| AppError::BadRequest("Missing file or type field".to_string()))?;
    let slot_type = slot_type
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::BadRequest("Missing file or type field".to_string()))?;

    if !ALLOWED_TYPES.contains(&content_type.as_str()) {
        return Err(AppError::UnsupportedFormat(format!(
            "Unsupported image format: {}",
            content_type
        )));
    }

    let now_ms = Utc::now().timestamp_millis();
    let extension = extension_for(&original_name, &content_type);
    let filename = format!("{}_{}.{}", slot_type, now_ms, extension);

    let image = StoredImage::new(filename.clone(), content_type, data);
    state
        .repo
        .store_image(&image)
        .await
        .map_err(|e| AppError::UploadFailed(format!("Upload failed: {}", e)))?;

    tracing::info!(%filename, "Image stored");

    Ok(Json(UploadResponse {
        success: true,
        url: format!("/api/images/{}", filename),
        filename,
        slot_type,
    }))
}

/// Extension from the original filename, else from the declared subtype.
fn extension_for(original_name: &str, content_type: &str) -> String {
    original_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_string())
        .filter(|ext| !ext.is_empty())
        .unwrap_or_else(|| {
            content_type
                .split('/')
                .nth(1)
                .unwrap_or("bin")
                .to_string()
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_from_filename() {
        assert_eq!(extension_for("photo.PNG", "image/png"), "PNG");
        assert_eq!(extension_for("archive.tar.gz", "image/png"), "gz");
    }

    #[test]
    fn test_extension_falls_back_to_subtype() {
        assert_eq!(extension_for("noext", "image/webp"), "webp");
        assert_eq!(extension_for("trailingdot.", "image/gif"), "gif");
        assert_eq!(extension_for("", "image/jpeg"), "jpeg");
    }

    #[test]
    fn test_allow_list() {
        assert!(ALLOWED_TYPES.contains(&"image/png"));
        assert!(!ALLOWED_TYPES.contains(&"text/plain"));
        assert!(!ALLOWED_TYPES.contains(&"image/svg+xml"));
    }
}

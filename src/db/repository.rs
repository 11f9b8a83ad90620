//! Database repository for the keyed stores.
//!
//! Uses prepared statements throughout. The config document lives as one JSON
//! value under a fixed key; tokens and images are keyed by their own value.

use chrono::Utc;
use sha2::{Digest, Sha256};
use sqlx::{Row, SqlitePool};

use crate::errors::AppError;
use crate::models::ProfileDocument;

/// Fixed key the configuration document is stored under.
pub const CONFIG_KEY: &str = "homepage_config";

/// An uploaded image blob with its serving metadata.
#[derive(Debug, Clone)]
pub struct StoredImage {
    pub filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
    /// SHA-256 of the blob, hex encoded; serves as the integrity tag.
    pub checksum: String,
    pub created_at: String,
}

impl StoredImage {
    /// Build a record from an accepted upload, computing the checksum.
    pub fn new(filename: String, content_type: String, data: Vec<u8>) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(&data);
        let checksum = format!("{:x}", hasher.finalize());

        Self {
            filename,
            content_type,
            data,
            checksum,
            created_at: Utc::now().to_rfc3339(),
        }
    }
}

/// Database repository for all data operations.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ==================== CONFIG DOCUMENT ====================

    /// Get the stored configuration document, if one was ever saved.
    pub async fn get_config(&self) -> Result<Option<ProfileDocument>, AppError> {
        let row = sqlx::query("SELECT document FROM site_config WHERE key = ?")
            .bind(CONFIG_KEY)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let raw: String = row.get("document");
                Ok(Some(serde_json::from_str(&raw)?))
            }
            None => Ok(None),
        }
    }

    /// Replace the configuration document wholesale.
    pub async fn put_config(&self, document: &ProfileDocument) -> Result<(), AppError> {
        let raw = serde_json::to_string(document)?;

        sqlx::query(
            "INSERT INTO site_config (key, document) VALUES (?, ?) \
             ON CONFLICT(key) DO UPDATE SET document = excluded.document",
        )
        .bind(CONFIG_KEY)
        .bind(&raw)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    // ==================== AUTH TOKENS ====================

    /// Persist a freshly minted token with its expiry.
    pub async fn insert_token(
        &self,
        token: &str,
        created_at: i64,
        expires_at: i64,
    ) -> Result<(), AppError> {
        sqlx::query("INSERT INTO auth_tokens (token, created_at, expires_at) VALUES (?, ?, ?)")
            .bind(token)
            .bind(created_at)
            .bind(expires_at)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Existence check for an unexpired token. No payload semantics.
    pub async fn token_exists(&self, token: &str, now: i64) -> Result<bool, AppError> {
        let row = sqlx::query("SELECT token FROM auth_tokens WHERE token = ? AND expires_at > ?")
            .bind(token)
            .bind(now)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.is_some())
    }

    /// Drop tokens past their expiry. Called opportunistically at mint time.
    pub async fn purge_expired_tokens(&self, now: i64) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM auth_tokens WHERE expires_at <= ?")
            .bind(now)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    // ==================== IMAGE BLOBS ====================

    /// Store an uploaded image under its generated filename.
    pub async fn store_image(&self, image: &StoredImage) -> Result<(), AppError> {
        sqlx::query(
            "INSERT OR REPLACE INTO images (filename, content_type, data, checksum, created_at) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&image.filename)
        .bind(&image.content_type)
        .bind(&image.data)
        .bind(&image.checksum)
        .bind(&image.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Fetch an image blob by filename.
    pub async fn get_image(&self, filename: &str) -> Result<Option<StoredImage>, AppError> {
        let row = sqlx::query(
            "SELECT filename, content_type, data, checksum, created_at FROM images WHERE filename = ?",
        )
        .bind(filename)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| StoredImage {
            filename: row.get("filename"),
            content_type: row.get("content_type"),
            data: row.get("data"),
            checksum: row.get("checksum"),
            created_at: row.get("created_at"),
        }))
    }
}

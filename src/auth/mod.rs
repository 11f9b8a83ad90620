//! Bearer-token authentication module.
//!
//! The shared password is compared in constant time to mitigate timing
//! attacks. Tokens are opaque strings checked for bare existence in the
//! store; expiry is handled by the store queries, not here.

use axum::http::{header, HeaderMap};
use chrono::Utc;
use subtle::ConstantTimeEq;

use crate::errors::AppError;
use crate::AppState;

/// Token lifetime in seconds (24 hours).
pub const TOKEN_TTL_SECS: i64 = 86_400;

/// Mint a fresh opaque token: UUID v4 plus the mint timestamp.
pub fn mint_token(now_ms: i64) -> String {
    format!("{}-{}", uuid::Uuid::new_v4(), now_ms)
}

/// Perform constant-time string comparison.
pub fn constant_time_compare(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// Extract the bearer token from the Authorization header, if any.
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(|s| s.to_string())
}

/// Guard for the mutating endpoints: the request must carry a bearer token
/// that still exists in the store.
pub async fn require_token(state: &AppState, headers: &HeaderMap) -> Result<(), AppError> {
    let Some(token) = bearer_token(headers) else {
        return Err(AppError::Unauthorized("Missing bearer token".to_string()));
    };

    let now_ms = Utc::now().timestamp_millis();
    match state.repo.token_exists(&token, now_ms).await {
        Ok(true) => Ok(()),
        Ok(false) => Err(AppError::Unauthorized(
            "Invalid or expired token".to_string(),
        )),
        Err(e) => {
            // A failed lookup reads as an invalid token, same as the store
            // being unreachable at verification time.
            tracing::error!("Token lookup failed: {}", e);
            Err(AppError::Unauthorized(
                "Invalid or expired token".to_string(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_constant_time_compare_equal() {
        assert!(constant_time_compare("secret123", "secret123"));
    }

    #[test]
    fn test_constant_time_compare_not_equal() {
        assert!(!constant_time_compare("secret123", "secret124"));
    }

    #[test]
    fn test_constant_time_compare_different_lengths() {
        assert!(!constant_time_compare("short", "much-longer-password"));
    }

    #[test]
    fn test_constant_time_compare_empty() {
        assert!(constant_time_compare("", ""));
        assert!(!constant_time_compare("", "not-empty"));
    }

    #[test]
    fn test_mint_token_unique_and_stamped() {
        let a = mint_token(1_736_000_000_000);
        let b = mint_token(1_736_000_000_000);
        assert_ne!(a, b);
        assert!(a.ends_with("-1736000000000"));
    }

    #[test]
    fn test_bearer_token_extraction() {
        let mut headers = HeaderMap::new();
        assert!(bearer_token(&headers).is_none());

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        assert_eq!(bearer_token(&headers).as_deref(), Some("abc"));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert!(bearer_token(&headers).is_none());
    }
}

//! Configuration module for the homepage backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Shared owner password (required for login to work at all)
    pub admin_password: Option<String>,
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let admin_password = env::var("HOMEPAGE_ADMIN_PASSWORD").ok();

        let db_path = env::var("HOMEPAGE_DB_PATH")
            .unwrap_or_else(|_| "./data/homepage.sqlite".to_string())
            .into();

        let bind_addr = env::var("HOMEPAGE_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse()
            .expect("Invalid HOMEPAGE_BIND_ADDR format");

        let log_level = env::var("HOMEPAGE_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Self {
            admin_password,
            db_path,
            bind_addr,
            log_level,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        // Clear any existing env vars
        env::remove_var("HOMEPAGE_ADMIN_PASSWORD");
        env::remove_var("HOMEPAGE_DB_PATH");
        env::remove_var("HOMEPAGE_BIND_ADDR");
        env::remove_var("HOMEPAGE_LOG_LEVEL");

        let config = Config::from_env();

        assert!(config.admin_password.is_none());
        assert_eq!(config.db_path, PathBuf::from("./data/homepage.sqlite"));
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8080");
        assert_eq!(config.log_level, "info");
    }
}

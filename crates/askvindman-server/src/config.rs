//! Server configuration loaded from environment variables.
//!
//! All settings have sensible defaults so the server can start with zero
//! configuration for local development.

use std::net::SocketAddr;
use std::path::PathBuf;

use askvindman_shared::constants::{DEFAULT_HTTP_PORT, DEFAULT_PAGE_SIZE, POPULAR_LIMIT};

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Socket address for the HTTP (axum) server.
    /// Env: `HTTP_ADDR`
    /// Default: `0.0.0.0:8000`
    pub http_addr: SocketAddr,

    /// SQLite database file.
    /// Env: `DATABASE_PATH`
    /// Default: none (the platform data directory is used).
    pub database_path: Option<PathBuf>,

    /// Items per listing page.
    /// Env: `PAGE_SIZE`
    /// Default: `10`
    pub page_size: usize,

    /// Length of the popular tags / popular users sidebars.
    /// Env: `POPULAR_LIMIT`
    /// Default: `30`
    pub popular_limit: usize,

    /// Title of the home page.
    /// Env: `SITE_TITLE`
    /// Default: `"FAQ AskVindman"`
    pub site_title: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_addr: ([0, 0, 0, 0], DEFAULT_HTTP_PORT).into(),
            database_path: None,
            page_size: DEFAULT_PAGE_SIZE,
            popular_limit: POPULAR_LIMIT,
            site_title: "FAQ AskVindman".to_string(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from any key/value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(addr) = lookup("HTTP_ADDR") {
            if let Ok(parsed) = addr.parse::<SocketAddr>() {
                config.http_addr = parsed;
            } else {
                tracing::warn!(value = %addr, "Invalid HTTP_ADDR, using default");
            }
        }

        if let Some(path) = lookup("DATABASE_PATH") {
            if !path.is_empty() {
                config.database_path = Some(PathBuf::from(path));
            }
        }

        if let Some(val) = lookup("PAGE_SIZE") {
            match val.parse::<usize>() {
                Ok(n) if n > 0 => config.page_size = n,
                _ => tracing::warn!(value = %val, "Invalid PAGE_SIZE, using default"),
            }
        }

        if let Some(val) = lookup("POPULAR_LIMIT") {
            match val.parse::<usize>() {
                Ok(n) => config.popular_limit = n,
                Err(_) => tracing::warn!(value = %val, "Invalid POPULAR_LIMIT, using default"),
            }
        }

        if let Some(title) = lookup("SITE_TITLE") {
            config.site_title = title;
        }

        // RUST_LOG is handled directly by tracing-subscriber's EnvFilter,
        // so we do not store it here.

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_pairs(pairs: &[(&str, &str)]) -> ServerConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.http_addr, ([0, 0, 0, 0], 8000).into());
        assert_eq!(config.page_size, 10);
        assert_eq!(config.popular_limit, 30);
        assert!(config.database_path.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = from_pairs(&[
            ("HTTP_ADDR", "127.0.0.1:9000"),
            ("DATABASE_PATH", "/tmp/qa.db"),
            ("PAGE_SIZE", "25"),
            ("POPULAR_LIMIT", "5"),
            ("SITE_TITLE", "Ask me"),
        ]);
        assert_eq!(config.http_addr, ([127, 0, 0, 1], 9000).into());
        assert_eq!(config.database_path, Some(PathBuf::from("/tmp/qa.db")));
        assert_eq!(config.page_size, 25);
        assert_eq!(config.popular_limit, 5);
        assert_eq!(config.site_title, "Ask me");
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = from_pairs(&[
            ("HTTP_ADDR", "not an addr"),
            ("PAGE_SIZE", "0"),
            ("POPULAR_LIMIT", "many"),
        ]);
        let defaults = ServerConfig::default();
        assert_eq!(config.http_addr, defaults.http_addr);
        assert_eq!(config.page_size, defaults.page_size);
        assert_eq!(config.popular_limit, defaults.popular_limit);
    }
}

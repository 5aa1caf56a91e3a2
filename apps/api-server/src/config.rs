//! Application configuration loaded from environment variables.

use std::env;

use inkwell_core::domain::Page;
use inkwell_infra::database::StoreConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub store: Option<StoreConfig>,
    /// Largest page the feed will serve in one request.
    pub page_limit: u64,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            store: StoreConfig::from_env(),
            page_limit: env::var("FEED_PAGE_LIMIT")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|limit: &u64| *limit > 0)
                .unwrap_or(Page::DEFAULT_LIMIT),
        }
    }
}

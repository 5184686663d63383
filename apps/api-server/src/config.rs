//! Application configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

use scribe_core::domain::PageRequest;
use scribe_infra::DatabaseConfig;

/// Page-size bounds applied to list and search endpoints.
#[derive(Debug, Clone, Copy)]
pub struct PaginationConfig {
    pub default_size: u64,
    pub max_size: u64,
}

impl PaginationConfig {
    /// Turn raw query parameters into a bounded [`PageRequest`].
    pub fn clamp(&self, page: Option<u64>, size: Option<u64>) -> PageRequest {
        let size = size
            .unwrap_or(self.default_size)
            .clamp(1, self.max_size.max(1));
        // Cap the page number so page * size stays in range everywhere
        // downstream. Pages past the data come back empty either way.
        let page = page.unwrap_or(0).min(u64::MAX / size);
        PageRequest::new(page, size)
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseConfig>,
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub pagination: PaginationConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = env::var("DATABASE_URL").ok().map(|url| DatabaseConfig {
            url,
            max_connections: env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
            min_connections: env::var("DB_MIN_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(2),
        });

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            database,
            upload_dir: env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("uploads")),
            max_upload_bytes: env::var("MAX_UPLOAD_BYTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10 * 1024 * 1024),
            pagination: PaginationConfig {
                default_size: env::var("DEFAULT_PAGE_SIZE")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(20),
                max_size: env::var("MAX_PAGE_SIZE")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(100),
            },
        }
    }
}

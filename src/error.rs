//! Error types for the favorites-downloader application.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::store::StoreError;

/// Main error type for the application.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration value for '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    #[error("Missing required configuration: {0}")]
    MissingConfig(String),

    // Feed errors
    #[error("API error: {0}")]
    Api(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Rate limited{}", .reset.map(|r| format!(", quota resets at {}", r.to_rfc3339())).unwrap_or_default())]
    RateLimited { reset: Option<DateTime<Utc>> },

    #[error("Rate limit persisted for {0} seconds, giving up")]
    RateLimitExhausted(u64),

    // Download errors
    #[error("Download failed: {0}")]
    Download(String),

    #[error("Scrape failed: {0}")]
    Scrape(String),

    // File system errors
    #[error("Invalid filename (path traversal attempt): {0}")]
    InvalidFilename(String),

    // Cache errors
    #[error("Cache unavailable: {0}")]
    CacheUnavailable(#[from] StoreError),

    #[error("Run interrupted")]
    Interrupted,

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // HTTP errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    // URL parsing errors
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),
}

impl Error {
    /// Whether the feed asked us to back off and retry later.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Error::RateLimited { .. })
    }

    /// Whether this error means the feed itself could not be read.
    pub fn is_feed_error(&self) -> bool {
        matches!(
            self,
            Error::Api(_)
                | Error::Authentication(_)
                | Error::RateLimited { .. }
                | Error::RateLimitExhausted(_)
                | Error::Http(_)
                | Error::Json(_)
        )
    }

    /// Whether this error came from the persistent cache.
    pub fn is_cache_error(&self) -> bool {
        matches!(self, Error::CacheUnavailable(_))
    }

    /// Process exit status for a run that ended with this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Config(_)
            | Error::ConfigValidation { .. }
            | Error::MissingConfig(_)
            | Error::TomlParse(_) => exit_codes::CONFIG_ERROR,
            Error::CacheUnavailable(_) => exit_codes::CACHE_ERROR,
            Error::Interrupted => exit_codes::INTERRUPTED,
            e if e.is_feed_error() => exit_codes::FEED_ERROR,
            _ => exit_codes::UNEXPECTED_ERROR,
        }
    }
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Process exit codes.
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const FEED_ERROR: i32 = 1;
    pub const CACHE_ERROR: i32 = 2;
    pub const CONFIG_ERROR: i32 = 3;
    pub const UNEXPECTED_ERROR: i32 = 4;
    pub const INTERRUPTED: i32 = 130;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limited_is_feed_error() {
        let err = Error::RateLimited { reset: None };
        assert!(err.is_rate_limited());
        assert!(err.is_feed_error());
        assert!(!err.is_cache_error());
    }

    #[test]
    fn test_cache_error_is_not_feed_error() {
        let err = Error::CacheUnavailable(StoreError::Query("disk I/O error".into()));
        assert!(err.is_cache_error());
        assert!(!err.is_feed_error());
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(
            Error::MissingConfig("access_token".into()).exit_code(),
            exit_codes::CONFIG_ERROR
        );
        assert_eq!(
            Error::Authentication("HTTP 401".into()).exit_code(),
            exit_codes::FEED_ERROR
        );
        assert_eq!(Error::RateLimitExhausted(3600).exit_code(), exit_codes::FEED_ERROR);
        assert_eq!(
            Error::CacheUnavailable(StoreError::Query("locked".into())).exit_code(),
            exit_codes::CACHE_ERROR
        );
        assert_eq!(Error::Interrupted.exit_code(), exit_codes::INTERRUPTED);
        assert_eq!(
            Error::Download("HTTP 404".into()).exit_code(),
            exit_codes::UNEXPECTED_ERROR
        );
    }

    #[test]
    fn test_rate_limited_message_includes_reset() {
        let reset = DateTime::parse_from_rfc3339("2024-03-01T10:15:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let err = Error::RateLimited { reset: Some(reset) };
        assert!(err.to_string().contains("2024-03-01T10:15:00"));
        assert_eq!(Error::RateLimited { reset: None }.to_string(), "Rate limited");
    }
}

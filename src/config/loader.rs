//! Configuration structures and loading logic.

use crate::config::convention::NamingConvention;
use crate::error::{Error, Result};
use directories::{ProjectDirs, UserDirs};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File name of the favorites cache inside the data directory.
const DATABASE_FILE: &str = "favorites.db";

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub account: AccountConfig,

    #[serde(default)]
    pub options: OptionsConfig,

    #[serde(default)]
    pub cache: CacheConfig,
}

/// Account credentials configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountConfig {
    /// Bearer token for the favorites API.
    #[serde(default)]
    pub access_token: String,

    /// User agent sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Override for the API base URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
}

/// Download options configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionsConfig {
    /// Base directory for downloads. Prompted for on first run.
    #[serde(default)]
    pub download_directory: Option<PathBuf>,

    /// Subdirectory layout below the download directory.
    #[serde(default)]
    pub naming_convention: NamingConvention,

    /// Favorites requested per page.
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Maximum number of pages fetched in one run.
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,

    /// Seconds to wait after the feed reports a rate limit.
    #[serde(default = "default_rate_limit_cooldown")]
    pub rate_limit_cooldown_secs: u64,

    /// Total seconds of back-to-back rate-limit waiting before giving up.
    #[serde(default = "default_max_rate_limit_wait")]
    pub max_rate_limit_wait_secs: u64,

    /// Posts processed concurrently within a page.
    #[serde(default = "default_post_concurrency")]
    pub post_concurrency: usize,

    /// Media downloads running concurrently within a post.
    #[serde(default = "default_media_concurrency")]
    pub media_concurrency: usize,

    /// Whether to look inside linked pages for embedded video.
    #[serde(default = "default_true")]
    pub scrape_links: bool,

    /// Whether to show download progress.
    #[serde(default = "default_true")]
    pub show_downloads: bool,

    /// Whether to show skipped downloads.
    #[serde(default)]
    pub show_skipped_downloads: bool,
}

impl Default for OptionsConfig {
    fn default() -> Self {
        Self {
            download_directory: None,
            naming_convention: NamingConvention::default(),
            page_size: default_page_size(),
            max_pages: default_max_pages(),
            rate_limit_cooldown_secs: default_rate_limit_cooldown(),
            max_rate_limit_wait_secs: default_max_rate_limit_wait(),
            post_concurrency: default_post_concurrency(),
            media_concurrency: default_media_concurrency(),
            scrape_links: true,
            show_downloads: true,
            show_skipped_downloads: false,
        }
    }
}

/// Favorites cache configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Path of the SQLite cache. Defaults to the platform data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_path: Option<PathBuf>,
}

fn default_user_agent() -> String {
    concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_true() -> bool {
    true
}

fn default_page_size() -> u32 {
    200
}

fn default_max_pages() -> u32 {
    50
}

fn default_rate_limit_cooldown() -> u64 {
    600
}

fn default_max_rate_limit_wait() -> u64 {
    3600
}

fn default_post_concurrency() -> usize {
    4
}

fn default_media_concurrency() -> usize {
    2
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::Config(format!(
                    "Configuration file not found: {}",
                    path.display()
                ))
            } else {
                Error::Io(e)
            }
        })?;

        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        Ok(())
    }

    /// Get the effective download directory, if one has been chosen.
    pub fn download_directory(&self) -> Option<&Path> {
        self.options.download_directory.as_deref()
    }

    /// Suggested download directory for the first-run prompt.
    pub fn default_download_directory() -> PathBuf {
        UserDirs::new()
            .and_then(|dirs| dirs.picture_dir().map(Path::to_path_buf))
            .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
            .join("favorites")
    }

    /// Get the effective cache database path.
    pub fn database_path(&self) -> PathBuf {
        if let Some(path) = &self.cache.database_path {
            return path.clone();
        }

        ProjectDirs::from("", "", env!("CARGO_PKG_NAME"))
            .map(|dirs| dirs.data_dir().join(DATABASE_FILE))
            .unwrap_or_else(|| PathBuf::from(DATABASE_FILE))
    }
}

impl Default for AccountConfig {
    fn default() -> Self {
        Self {
            access_token: String::new(),
            user_agent: default_user_agent(),
            api_base: None,
        }
    }
}

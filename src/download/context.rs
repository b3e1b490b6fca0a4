//! Collaborators and options shared by every stage of a sync run.

use std::path::PathBuf;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::api::FavoritesFeed;
use crate::config::{Config, NamingConvention};
use crate::download::media::MediaFetcher;
use crate::error::{Error, Result};
use crate::media::EmbeddedMediaScraper;
use crate::store::FavoriteStore;

/// Resolved options for a sync run.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    pub download_directory: PathBuf,
    pub naming_convention: NamingConvention,
    pub page_size: u32,
    pub max_pages: u32,
    pub rate_limit_cooldown: Duration,
    pub max_rate_limit_wait: Duration,
    pub post_concurrency: usize,
    pub media_concurrency: usize,
    pub show_downloads: bool,
    pub show_skipped_downloads: bool,
}

impl SyncOptions {
    /// Build run options from a validated configuration.
    ///
    /// Fails if no download directory has been chosen yet.
    pub fn from_config(config: &Config) -> Result<Self> {
        let download_directory = config
            .download_directory()
            .ok_or_else(|| Error::MissingConfig("download_directory".to_string()))?
            .to_path_buf();

        let options = &config.options;
        Ok(Self {
            download_directory,
            naming_convention: options.naming_convention,
            page_size: options.page_size,
            max_pages: options.max_pages,
            rate_limit_cooldown: Duration::from_secs(options.rate_limit_cooldown_secs),
            max_rate_limit_wait: Duration::from_secs(options.max_rate_limit_wait_secs),
            post_concurrency: options.post_concurrency.max(1),
            media_concurrency: options.media_concurrency.max(1),
            show_downloads: options.show_downloads,
            show_skipped_downloads: options.show_skipped_downloads,
        })
    }
}

/// Everything the pipeline needs, borrowed for the duration of a run.
pub struct SyncContext<'a> {
    pub feed: &'a dyn FavoritesFeed,
    pub store: &'a dyn FavoriteStore,
    pub fetcher: &'a dyn MediaFetcher,
    pub scraper: Option<&'a dyn EmbeddedMediaScraper>,
    pub options: &'a SyncOptions,
    pub shutdown: CancellationToken,
}

//! Favorites Downloader - incrementally mirror media from favorited posts.
//!
//! This library walks a user's favorites feed from newest to oldest, keeps a
//! SQLite cache of every post it has seen, and downloads each post's media.
//!
//! # Features
//!
//! - Cursor-based pagination with rate-limit backoff
//! - Resumable runs: completed posts are never fetched twice
//! - Native attachments at original size, direct image links, and video
//!   embedded in linked pages
//! - Configurable directory layout by date and/or author
//! - Graceful shutdown that never marks a half-downloaded post complete
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use favorites_downloader::{
//!     download_favorites, Config, FavoriteStore, RunStats, SqliteFavoriteStore, SyncContext,
//!     SyncOptions, TwitterApi,
//! };
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load(Path::new("config.toml"))?;
//!     let options = SyncOptions::from_config(&config)?;
//!     let store = SqliteFavoriteStore::open(&config.database_path()).await?;
//!     let api = TwitterApi::new(
//!         config.account.access_token.clone(),
//!         &config.account.user_agent,
//!         config.account.api_base.clone(),
//!     )?;
//!
//!     let ctx = SyncContext {
//!         feed: &api,
//!         store: &store,
//!         fetcher: &api,
//!         scraper: None,
//!         options: &options,
//!         shutdown: CancellationToken::new(),
//!     };
//!     let mut stats = RunStats::default();
//!     download_favorites(&ctx, &mut stats).await?;
//!     store.flush().await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod download;
pub mod error;
pub mod fs;
pub mod media;
pub mod output;
pub mod shutdown;
pub mod store;

// Re-exports for convenience
pub use api::{FavoritesFeed, FavoritesPage, Post, TwitterApi};
pub use config::{Config, NamingConvention};
pub use download::{
    download_favorites, MediaFetcher, PostReport, RunStats, SyncContext, SyncOptions, SyncOutcome,
};
pub use error::{Error, Result};
pub use media::{EmbeddedMediaScraper, HtmlScraper, ResolvedMedia};
pub use store::{FavoriteStore, SqliteFavoriteStore};

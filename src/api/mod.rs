//! Favorites API module.
//!
//! This module provides:
//! - HTTP client for the favorites REST API
//! - The feed capability consumed by the download pipeline
//! - API response types

pub mod client;
pub mod feed;
pub mod types;

pub use client::{TwitterApi, API_BASE};
pub use feed::{FavoritesFeed, FavoritesPage, MAX_PAGE_SIZE};
pub use types::{AccountInfo, Post, RateLimitInfo};

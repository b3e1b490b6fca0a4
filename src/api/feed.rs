//! The feed-reading capability consumed by the download pipeline.

use async_trait::async_trait;

use crate::api::types::{Post, RateLimitInfo};
use crate::error::Result;

/// Largest page the favorites endpoint will return.
pub const MAX_PAGE_SIZE: u32 = 200;

/// One page of favorites, newest first.
#[derive(Debug, Clone, Default)]
pub struct FavoritesPage {
    pub posts: Vec<Post>,
    pub rate_limit: Option<RateLimitInfo>,
}

/// An authenticated source of the user's favorites.
///
/// Implementations report a quota breach as [`crate::Error::RateLimited`];
/// every other error is treated as fatal by the caller.
#[async_trait]
pub trait FavoritesFeed: Send + Sync {
    /// List up to `count` favorites with ids at or below `before`
    /// (or the newest favorites when `before` is `None`).
    async fn list_favorites(&self, before: Option<u64>, count: u32) -> Result<FavoritesPage>;
}

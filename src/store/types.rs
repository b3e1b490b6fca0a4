//! Types for the favorites cache.

use chrono::{DateTime, Utc};

use crate::api::Post;

/// Maximum number of characters kept from a post's text.
pub const MAX_TEXT_CHARS: usize = 280;

/// Download state of a favorite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum DownloadState {
    /// Seen, but at least one media item is still outstanding.
    #[default]
    Pending = 0,
    /// Every resolved media item is on disk.
    Complete = 1,
}

impl DownloadState {
    /// Convert to the integer stored in the database.
    pub fn as_i64(self) -> i64 {
        self as i64
    }

    /// Parse from the integer stored in the database.
    ///
    /// Any non-zero value counts as complete.
    pub fn from_i64(value: i64) -> Self {
        if value == 0 {
            Self::Pending
        } else {
            Self::Complete
        }
    }
}

/// A favorite as persisted in the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FavoriteRecord {
    pub id: u64,
    pub created_at: DateTime<Utc>,
    pub author_id: u64,
    pub author_screen_name: String,
    pub text: String,
    pub state: DownloadState,
}

impl FavoriteRecord {
    /// Build a new pending record for a post seen in the feed.
    pub fn new_pending(post: &Post) -> Self {
        Self {
            id: post.id,
            created_at: post.created_at,
            author_id: post.author_id,
            author_screen_name: post.author_screen_name.clone(),
            text: post.text.chars().take(MAX_TEXT_CHARS).collect(),
            state: DownloadState::Pending,
        }
    }
}

/// Counts over the whole cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreSummary {
    pub total: u64,
    pub complete: u64,
    pub pending: u64,
    pub media_uris: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_download_state_roundtrip() {
        assert_eq!(DownloadState::Pending.as_i64(), 0);
        assert_eq!(DownloadState::Complete.as_i64(), 1);
        assert_eq!(DownloadState::from_i64(0), DownloadState::Pending);
        assert_eq!(DownloadState::from_i64(1), DownloadState::Complete);
        assert_eq!(DownloadState::from_i64(7), DownloadState::Complete);
    }

    #[test]
    fn test_new_pending_truncates_text() {
        let post = Post {
            id: 42,
            text: "x".repeat(MAX_TEXT_CHARS + 20),
            ..Post::default()
        };
        let record = FavoriteRecord::new_pending(&post);
        assert_eq!(record.id, 42);
        assert_eq!(record.state, DownloadState::Pending);
        assert_eq!(record.text.chars().count(), MAX_TEXT_CHARS);
    }
}

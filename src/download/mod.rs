//! Download module for the favorites sync pipeline.
//!
//! This module provides:
//! - The pagination loop over the favorites feed
//! - The per-post pipeline (cache, resolution, downloads)
//! - Media file downloading
//! - Run statistics

pub mod context;
pub mod favorites;
pub mod media;
pub mod post;
pub mod state;

pub use context::{SyncContext, SyncOptions};
pub use favorites::{download_favorites, next_cursor, SyncOutcome};
pub use media::{download_media, DownloadOutcome, MediaFetcher};
pub use post::process_post;
pub use state::{PostReport, PostStatus, RunStats};

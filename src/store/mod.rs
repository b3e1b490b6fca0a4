//! Persistent cache of seen favorites.
//!
//! SQLite-backed record of every favorite the feed has produced, with a
//! per-favorite completion flag and an append-only log of the media URIs
//! discovered for it. It is the only state that survives between runs:
//! - completed favorites are skipped on later runs
//! - pending favorites are retried until all of their media is on disk
//! - `reset_all` forces a full re-download pass

pub mod db;
pub mod error;
pub mod schema;
pub mod types;

pub use db::{FavoriteStore, SqliteFavoriteStore};
pub use error::StoreError;
pub use types::{DownloadState, FavoriteRecord, StoreSummary};

//! Favorites cache trait and SQLite implementation.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use rusqlite::{Connection, OptionalExtension};

use super::error::StoreError;
use super::schema;
use super::types::{DownloadState, FavoriteRecord, StoreSummary};

/// Persistent record of every favorite seen and whether its media is on disk.
///
/// Object-safe so the pipeline can hold an `Arc<dyn FavoriteStore>` and tests
/// can swap in their own implementation. Writes are serialized by the
/// implementation; callers never hold a lock across network I/O.
#[async_trait]
pub trait FavoriteStore: Send + Sync {
    /// Whether a favorite with this id has been recorded.
    async fn exists(&self, id: u64) -> Result<bool, StoreError>;

    /// Record a newly seen favorite as pending, together with the media URIs
    /// discovered for it.
    ///
    /// Returns `false` (and writes nothing) if the id is already recorded.
    async fn insert_pending(
        &self,
        record: &FavoriteRecord,
        media_uris: &[String],
    ) -> Result<bool, StoreError>;

    /// Whether the favorite is marked complete. Unknown ids are not complete.
    async fn is_complete(&self, id: u64) -> Result<bool, StoreError>;

    /// Mark a favorite complete. Returns whether the row changed.
    async fn mark_complete(&self, id: u64) -> Result<bool, StoreError>;

    /// Set every favorite back to pending. Returns whether any row changed.
    async fn reset_all(&self) -> Result<bool, StoreError>;

    /// Highest recorded id.
    async fn latest(&self) -> Result<Option<u64>, StoreError>;

    /// Lowest recorded id.
    async fn oldest(&self) -> Result<Option<u64>, StoreError>;

    /// Media URIs recorded for a favorite, in insertion order.
    async fn media_uris(&self, id: u64) -> Result<Vec<String>, StoreError>;

    /// Counts over the whole cache.
    async fn summary(&self) -> Result<StoreSummary, StoreError>;

    /// Make all writes durable. Called once at the end of a run.
    async fn flush(&self) -> Result<(), StoreError>;
}

/// SQLite implementation of the favorites cache.
pub struct SqliteFavoriteStore {
    /// Wrapped in Mutex because rusqlite::Connection is not Sync.
    conn: Mutex<Connection>,
    path: PathBuf,
}

impl std::fmt::Debug for SqliteFavoriteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteFavoriteStore")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl SqliteFavoriteStore {
    /// Open or create a cache at the given path.
    pub async fn open(path: &Path) -> Result<Self, StoreError> {
        let path = path.to_path_buf();
        let path_clone = path.clone();

        let conn = tokio::task::spawn_blocking(move || {
            if let Some(parent) = path_clone.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).map_err(|e| StoreError::CreateDir {
                        path: parent.to_path_buf(),
                        source: e,
                    })?;
                }
            }

            let conn = Connection::open(&path_clone).map_err(|e| StoreError::Open {
                path: path_clone.clone(),
                source: e,
            })?;

            conn.pragma_update(None, "journal_mode", "WAL")
                .map_err(StoreError::Migration)?;
            conn.pragma_update(None, "synchronous", "NORMAL")
                .map_err(StoreError::Migration)?;

            schema::migrate(&conn)?;

            Ok::<_, StoreError>(conn)
        })
        .await??;

        Ok(Self {
            conn: Mutex::new(conn),
            path,
        })
    }

    /// Open an in-memory cache. Nothing survives the process.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(|e| StoreError::Open {
            path: PathBuf::from(":memory:"),
            source: e,
        })?;
        schema::migrate(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            path: PathBuf::from(":memory:"),
        })
    }

    /// Path to the database file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|e| StoreError::Query(e.to_string()))
    }

    fn extremal_id(&self, sql: &str) -> Result<Option<u64>, StoreError> {
        let conn = self.lock()?;
        let id: Option<i64> = conn
            .query_row(sql, [], |row| row.get(0))
            .optional()
            .map_err(StoreError::query)?;
        Ok(id.map(|id| id as u64))
    }
}

#[async_trait]
impl FavoriteStore for SqliteFavoriteStore {
    async fn exists(&self, id: u64) -> Result<bool, StoreError> {
        let conn = self.lock()?;
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM favorites WHERE id = ?1",
                [id as i64],
                |row| row.get(0),
            )
            .map_err(StoreError::query)?;
        Ok(count != 0)
    }

    async fn insert_pending(
        &self,
        record: &FavoriteRecord,
        media_uris: &[String],
    ) -> Result<bool, StoreError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction().map_err(StoreError::query)?;

        let inserted = tx
            .execute(
                "INSERT OR IGNORE INTO favorites (id, created_at, user_id, screen_name, text, state) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                rusqlite::params![
                    record.id as i64,
                    record.created_at.timestamp(),
                    record.author_id as i64,
                    &record.author_screen_name,
                    &record.text,
                    DownloadState::Pending.as_i64(),
                ],
            )
            .map_err(StoreError::query)?;

        if inserted == 0 {
            tracing::debug!(id = record.id, "Favorite already cached, insert ignored");
            return Ok(false);
        }

        {
            let mut stmt = tx
                .prepare_cached("INSERT INTO media_uris (favorite_id, uri) VALUES (?1, ?2)")
                .map_err(StoreError::query)?;
            for uri in media_uris {
                stmt.execute(rusqlite::params![record.id as i64, uri])
                    .map_err(StoreError::query)?;
            }
        }

        tx.commit().map_err(StoreError::query)?;
        Ok(true)
    }

    async fn is_complete(&self, id: u64) -> Result<bool, StoreError> {
        let conn = self.lock()?;
        let state: Option<i64> = conn
            .query_row(
                "SELECT state FROM favorites WHERE id = ?1",
                [id as i64],
                |row| row.get(0),
            )
            .optional()
            .map_err(StoreError::query)?;
        Ok(state.map(DownloadState::from_i64) == Some(DownloadState::Complete))
    }

    async fn mark_complete(&self, id: u64) -> Result<bool, StoreError> {
        let conn = self.lock()?;
        let rows = conn
            .execute(
                "UPDATE favorites SET state = ?1 WHERE id = ?2 AND state != ?1",
                rusqlite::params![DownloadState::Complete.as_i64(), id as i64],
            )
            .map_err(StoreError::query)?;
        Ok(rows != 0)
    }

    async fn reset_all(&self) -> Result<bool, StoreError> {
        let conn = self.lock()?;
        let rows = conn
            .execute(
                "UPDATE favorites SET state = ?1 WHERE state != ?1",
                [DownloadState::Pending.as_i64()],
            )
            .map_err(StoreError::query)?;
        Ok(rows != 0)
    }

    async fn latest(&self) -> Result<Option<u64>, StoreError> {
        self.extremal_id("SELECT id FROM favorites ORDER BY id DESC LIMIT 1")
    }

    async fn oldest(&self) -> Result<Option<u64>, StoreError> {
        self.extremal_id("SELECT id FROM favorites ORDER BY id ASC LIMIT 1")
    }

    async fn media_uris(&self, id: u64) -> Result<Vec<String>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare_cached("SELECT uri FROM media_uris WHERE favorite_id = ?1 ORDER BY rowid")
            .map_err(StoreError::query)?;
        let uris = stmt
            .query_map([id as i64], |row| row.get::<_, String>(0))
            .map_err(StoreError::query)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(StoreError::query)?;
        Ok(uris)
    }

    async fn summary(&self) -> Result<StoreSummary, StoreError> {
        let conn = self.lock()?;

        let (total, complete): (i64, i64) = conn
            .query_row(
                "SELECT COUNT(*), COALESCE(SUM(CASE WHEN state != 0 THEN 1 ELSE 0 END), 0) FROM favorites",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .map_err(StoreError::query)?;

        let media_uris: i64 = conn
            .query_row("SELECT COUNT(*) FROM media_uris", [], |row| row.get(0))
            .map_err(StoreError::query)?;

        Ok(StoreSummary {
            total: total as u64,
            complete: complete as u64,
            pending: (total - complete) as u64,
            media_uris: media_uris as u64,
        })
    }

    async fn flush(&self) -> Result<(), StoreError> {
        let conn = self.lock()?;
        conn.query_row("PRAGMA wal_checkpoint(TRUNCATE)", [], |_| Ok(()))
            .map_err(StoreError::query)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn record(id: u64) -> FavoriteRecord {
        FavoriteRecord {
            id,
            created_at: Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap(),
            author_id: 7,
            author_screen_name: "alice".to_string(),
            text: format!("post {}", id),
            state: DownloadState::Pending,
        }
    }

    #[tokio::test]
    async fn test_open_creates_db() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("favorites.db");
        let store = SqliteFavoriteStore::open(&path).await.unwrap();
        assert!(path.exists());
        assert_eq!(store.path(), path);
    }

    #[tokio::test]
    async fn test_data_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("favorites.db");

        {
            let store = SqliteFavoriteStore::open(&path).await.unwrap();
            store
                .insert_pending(&record(10), &["https://pbs.twimg.com/media/a.jpg".into()])
                .await
                .unwrap();
            store.mark_complete(10).await.unwrap();
            store.flush().await.unwrap();
        }

        let store = SqliteFavoriteStore::open(&path).await.unwrap();
        assert!(store.exists(10).await.unwrap());
        assert!(store.is_complete(10).await.unwrap());
        assert_eq!(store.media_uris(10).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_insert_and_exists() {
        let store = SqliteFavoriteStore::open_in_memory().unwrap();
        assert!(!store.exists(1).await.unwrap());

        let inserted = store
            .insert_pending(&record(1), &["a".into(), "b".into()])
            .await
            .unwrap();
        assert!(inserted);
        assert!(store.exists(1).await.unwrap());
        assert!(!store.is_complete(1).await.unwrap());
        assert_eq!(store.media_uris(1).await.unwrap(), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_duplicate_insert_is_ignored() {
        let store = SqliteFavoriteStore::open_in_memory().unwrap();
        assert!(store.insert_pending(&record(1), &["a".into()]).await.unwrap());
        store.mark_complete(1).await.unwrap();

        let mut again = record(1);
        again.text = "changed".to_string();
        let inserted = store
            .insert_pending(&again, &["b".into(), "c".into()])
            .await
            .unwrap();

        assert!(!inserted);
        assert!(store.is_complete(1).await.unwrap());
        assert_eq!(store.media_uris(1).await.unwrap(), vec!["a"]);
        assert_eq!(store.summary().await.unwrap().total, 1);
    }

    #[tokio::test]
    async fn test_mark_complete_is_idempotent() {
        let store = SqliteFavoriteStore::open_in_memory().unwrap();
        store.insert_pending(&record(1), &[]).await.unwrap();

        assert!(store.mark_complete(1).await.unwrap());
        assert!(!store.mark_complete(1).await.unwrap());
        assert!(store.is_complete(1).await.unwrap());
    }

    #[tokio::test]
    async fn test_unknown_id_is_not_complete() {
        let store = SqliteFavoriteStore::open_in_memory().unwrap();
        assert!(!store.is_complete(99).await.unwrap());
        assert!(!store.mark_complete(99).await.unwrap());
    }

    #[tokio::test]
    async fn test_reset_all() {
        let store = SqliteFavoriteStore::open_in_memory().unwrap();
        assert!(!store.reset_all().await.unwrap());

        store.insert_pending(&record(1), &[]).await.unwrap();
        store.insert_pending(&record(2), &[]).await.unwrap();
        assert!(!store.reset_all().await.unwrap());

        store.mark_complete(1).await.unwrap();
        assert!(store.reset_all().await.unwrap());
        assert!(!store.is_complete(1).await.unwrap());
        assert_eq!(store.summary().await.unwrap().total, 2);
    }

    #[tokio::test]
    async fn test_latest_and_oldest() {
        let store = SqliteFavoriteStore::open_in_memory().unwrap();
        assert_eq!(store.latest().await.unwrap(), None);
        assert_eq!(store.oldest().await.unwrap(), None);

        for id in [500, 20, 9000] {
            store.insert_pending(&record(id), &[]).await.unwrap();
        }
        assert_eq!(store.latest().await.unwrap(), Some(9000));
        assert_eq!(store.oldest().await.unwrap(), Some(20));
    }

    #[tokio::test]
    async fn test_summary_counts() {
        let store = SqliteFavoriteStore::open_in_memory().unwrap();
        store.insert_pending(&record(1), &["a".into()]).await.unwrap();
        store
            .insert_pending(&record(2), &["b".into(), "c".into()])
            .await
            .unwrap();
        store.insert_pending(&record(3), &[]).await.unwrap();
        store.mark_complete(3).await.unwrap();

        let summary = store.summary().await.unwrap();
        assert_eq!(
            summary,
            StoreSummary {
                total: 3,
                complete: 1,
                pending: 2,
                media_uris: 3,
            }
        );
    }

    #[tokio::test]
    async fn test_large_ids_roundtrip() {
        let store = SqliteFavoriteStore::open_in_memory().unwrap();
        let id = 1_764_000_000_000_000_123u64;
        store.insert_pending(&record(id), &[]).await.unwrap();
        assert!(store.exists(id).await.unwrap());
        assert_eq!(store.latest().await.unwrap(), Some(id));
    }
}

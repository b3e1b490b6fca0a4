//! Cache schema definitions and migrations.

use rusqlite::Connection;

use super::error::StoreError;

/// Current schema version. Increment when making schema changes.
pub const SCHEMA_VERSION: i32 = 1;

/// Schema DDL for version 1.
const SCHEMA_V1: &str = r#"
CREATE TABLE IF NOT EXISTS favorites (
    id INTEGER PRIMARY KEY NOT NULL,
    created_at INTEGER NOT NULL,
    user_id INTEGER NOT NULL,
    screen_name TEXT NOT NULL,
    text TEXT NOT NULL,
    state INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS idx_favorites_state ON favorites(state);

CREATE TABLE IF NOT EXISTS media_uris (
    favorite_id INTEGER NOT NULL,
    uri TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_media_uris_favorite_id ON media_uris(favorite_id);
"#;

/// Get the current schema version from the database.
pub(crate) fn get_schema_version(conn: &Connection) -> Result<i32, StoreError> {
    let version: i32 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
    Ok(version)
}

fn set_schema_version(conn: &Connection, version: i32) -> Result<(), StoreError> {
    conn.pragma_update(None, "user_version", version)?;
    Ok(())
}

/// Initialize or migrate the schema.
///
/// Idempotent; safe on both new and existing databases.
pub(crate) fn migrate(conn: &Connection) -> Result<(), StoreError> {
    let current_version = get_schema_version(conn)?;

    if current_version > SCHEMA_VERSION {
        return Err(StoreError::UnsupportedSchemaVersion {
            found: current_version,
            expected: SCHEMA_VERSION,
        });
    }

    if current_version < SCHEMA_VERSION {
        conn.execute_batch(SCHEMA_V1)?;
        set_schema_version(conn, SCHEMA_VERSION)?;
        tracing::debug!("Initialized cache schema at version {}", SCHEMA_VERSION);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_db_migration() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        assert_eq!(get_schema_version(&conn).unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn test_idempotent_migration() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        migrate(&conn).unwrap();
        assert_eq!(get_schema_version(&conn).unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn test_unsupported_version() {
        let conn = Connection::open_in_memory().unwrap();
        conn.pragma_update(None, "user_version", SCHEMA_VERSION + 1)
            .unwrap();
        let result = migrate(&conn);
        assert!(matches!(
            result,
            Err(StoreError::UnsupportedSchemaVersion { .. })
        ));
    }

    #[test]
    fn test_tables_and_indexes_created() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM favorites", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM media_uris", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='index' AND name LIKE 'idx_%'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 2);
    }
}

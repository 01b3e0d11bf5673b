//! Database access for the local music library
//!
//! Schema: `albums` (one row per catalogued release) and `items` (one row
//! per catalogued track, FK to albums). Items carry the full flat field
//! set so format templates can address any field.

pub mod albums;
pub mod items;

use anyhow::Result;
use sqlx::SqlitePool;
use std::path::Path;

/// Initialize database connection pool
///
/// Connects to the library database, creating it (and its parent
/// directory) if needed, and runs idempotent migrations.
pub async fn init_database_pool(db_path: &Path) -> Result<SqlitePool> {
    // Ensure parent directory exists
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Use proper SQLite URI with mode=rwc (read, write, create)
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    tracing::debug!("Connecting to database: {}", db_url);

    let pool = SqlitePool::connect(&db_url).await?;

    sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await?;

    init_tables(&pool).await?;

    Ok(pool)
}

/// Create library tables if they don't exist
///
/// Idempotent - safe to call multiple times.
pub async fn init_tables(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS albums (
            guid TEXT PRIMARY KEY,
            album TEXT NOT NULL,
            albumartist TEXT,
            albumartist_sort TEXT,
            albumartist_credit TEXT,
            mb_albumid TEXT,
            mb_albumartistid TEXT,
            mb_releasegroupid TEXT,
            albumtotal INTEGER NOT NULL DEFAULT 0,
            year INTEGER,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS items (
            guid TEXT PRIMARY KEY,
            album_id TEXT REFERENCES albums(guid) ON DELETE CASCADE,
            title TEXT,
            artist TEXT,
            artist_sort TEXT,
            artist_credit TEXT,
            album TEXT,
            albumartist TEXT,
            albumartist_sort TEXT,
            albumartist_credit TEXT,
            albumdisambig TEXT,
            albumstatus TEXT,
            albumtype TEXT,
            albumsubtype TEXT,
            asin TEXT,
            catalognum TEXT,
            comp INTEGER,
            country TEXT,
            disc INTEGER,
            disctitle TEXT,
            disctotal INTEGER,
            label TEXT,
            language TEXT,
            length REAL,
            media TEXT,
            mb_albumid TEXT,
            mb_artistid TEXT,
            mb_releasegroupid TEXT,
            mb_trackid TEXT,
            script TEXT,
            track INTEGER,
            tracktotal INTEGER,
            year INTEGER,
            month INTEGER,
            day INTEGER,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_items_album_id ON items(album_id)")
        .execute(pool)
        .await?;

    tracing::debug!("Database tables initialized (albums, items)");

    Ok(())
}

#[cfg(test)]
pub(crate) async fn test_pool() -> SqlitePool {
    // Single connection: every in-memory connection is its own database
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create in-memory database");
    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(&pool)
        .await
        .unwrap();
    init_tables(&pool).await.expect("Failed to init tables");
    pool
}

//! Schema version management using `PRAGMA user_version`.

use anyhow::{Context, Result};
use rusqlite::Connection;

/// Current schema version.
const CURRENT_VERSION: u32 = 1;

/// Runs database migrations up to `CURRENT_VERSION`.
///
/// # Errors
///
/// Returns an error if any SQL statement fails.
pub fn run_migrations(conn: &Connection) -> Result<()> {
    let version: u32 = conn
        .pragma_query_value(None, "user_version", |row| row.get(0))
        .context("failed to read user_version")?;

    if version < 1 {
        migrate_v1(conn).context("migration to v1 failed")?;
    }

    conn.pragma_update(None, "user_version", CURRENT_VERSION)
        .context("failed to update user_version")?;

    Ok(())
}

/// Migration to v1: create `posters`, `genre_terms`, `movies`, and
/// `movie_genres` tables.
fn migrate_v1(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS posters (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            name          TEXT NOT NULL UNIQUE,
            file_name     TEXT NOT NULL,
            alt_text      TEXT NOT NULL,
            source_url    TEXT NOT NULL,
            content_type  TEXT,
            byte_size     INTEGER NOT NULL,
            data          BLOB NOT NULL,
            created_at    TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        );

        CREATE TABLE IF NOT EXISTS genre_terms (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            vocabulary  TEXT NOT NULL,
            name        TEXT NOT NULL,
            UNIQUE (vocabulary, name)
        );

        CREATE TABLE IF NOT EXISTS movies (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            external_id  TEXT NOT NULL UNIQUE,
            title        TEXT NOT NULL,
            year         TEXT NOT NULL,
            body         TEXT NOT NULL,
            poster_id    INTEGER REFERENCES posters(id),
            imported_at  TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        );

        CREATE TABLE IF NOT EXISTS movie_genres (
            movie_id  INTEGER NOT NULL REFERENCES movies(id),
            position  INTEGER NOT NULL,
            term_id   INTEGER NOT NULL REFERENCES genre_terms(id),
            PRIMARY KEY (movie_id, position)
        );

        CREATE INDEX IF NOT EXISTS idx_movie_genres_term_id ON movie_genres(term_id);
        CREATE INDEX IF NOT EXISTS idx_movies_poster_id ON movies(poster_id);",
    )
    .context("failed to create tables")?;

    Ok(())
}

//! Poster asset operations.

use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, Row};

use crate::outcome::InsertOutcome;

/// A poster to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPoster {
    /// Unique derived name ("{title} Poster").
    pub name: String,
    /// File name the image is exposed as ("{title}.jpg").
    pub file_name: String,
    /// Alternative text.
    pub alt_text: String,
    /// URL the image was downloaded from.
    pub source_url: String,
    /// MIME type reported by the server.
    pub content_type: Option<String>,
    /// Image bytes.
    pub data: Vec<u8>,
}

/// Metadata of a stored poster (without the image bytes).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredPoster {
    /// Row ID.
    pub id: i64,
    /// Unique derived name.
    pub name: String,
    /// File name.
    pub file_name: String,
    /// Alternative text.
    pub alt_text: String,
    /// Source URL.
    pub source_url: String,
    /// MIME type.
    pub content_type: Option<String>,
    /// Image size in bytes.
    pub byte_size: u64,
    /// Creation timestamp (UTC).
    pub created_at: String,
}

fn map_poster(row: &Row<'_>) -> rusqlite::Result<StoredPoster> {
    Ok(StoredPoster {
        id: row.get(0)?,
        name: row.get(1)?,
        file_name: row.get(2)?,
        alt_text: row.get(3)?,
        source_url: row.get(4)?,
        content_type: row.get(5)?,
        byte_size: row.get(6)?,
        created_at: row.get(7)?,
    })
}

/// Looks up a poster by its derived name.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn find_poster_by_name(conn: &Connection, name: &str) -> Result<Option<StoredPoster>> {
    conn.query_row(
        "SELECT id, name, file_name, alt_text, source_url, content_type, byte_size, created_at
         FROM posters
         WHERE name = ?1",
        [name],
        map_poster,
    )
    .optional()
    .with_context(|| format!("failed to query poster {name:?}"))
}

/// Stores a poster unless one with the same name exists.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn insert_poster(conn: &Connection, poster: &NewPoster) -> Result<InsertOutcome> {
    let byte_size = i64::try_from(poster.data.len()).context("poster too large")?;
    let inserted = conn
        .execute(
            "INSERT INTO posters (name, file_name, alt_text, source_url, content_type, byte_size, data)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             ON CONFLICT(name) DO NOTHING",
            rusqlite::params![
                poster.name,
                poster.file_name,
                poster.alt_text,
                poster.source_url,
                poster.content_type,
                byte_size,
                poster.data,
            ],
        )
        .with_context(|| format!("failed to insert poster {:?}", poster.name))?;

    if inserted > 0 {
        return Ok(InsertOutcome::Inserted(conn.last_insert_rowid()));
    }

    let existing = find_poster_by_name(conn, &poster.name)?
        .with_context(|| format!("poster {:?} vanished after conflict", poster.name))?;
    Ok(InsertOutcome::AlreadyExists(existing.id))
}

/// Loads the image bytes of a poster.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn load_poster_data(conn: &Connection, id: i64) -> Result<Option<Vec<u8>>> {
    conn.query_row("SELECT data FROM posters WHERE id = ?1", [id], |row| {
        row.get(0)
    })
    .optional()
    .with_context(|| format!("failed to load poster data {id}"))
}

/// Counts stored posters.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_posters(conn: &Connection) -> Result<u64> {
    conn.query_row("SELECT COUNT(*) FROM posters", [], |row| row.get(0))
        .context("failed to count posters")
}

//! Genre term operations.

use anyhow::{Context, Result, bail};
use rusqlite::{Connection, OptionalExtension};

use crate::outcome::InsertOutcome;

/// Vocabulary holding movie genres.
pub const GENRE_VOCABULARY: &str = "genre";

/// A stored taxonomy term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenreTerm {
    /// Row ID.
    pub id: i64,
    /// Vocabulary the term belongs to.
    pub vocabulary: String,
    /// Term name (trimmed).
    pub name: String,
}

/// Looks up a term by vocabulary and trimmed name (case-sensitive).
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn find_genre_term(
    conn: &Connection,
    vocabulary: &str,
    name: &str,
) -> Result<Option<GenreTerm>> {
    conn.query_row(
        "SELECT id, vocabulary, name FROM genre_terms WHERE vocabulary = ?1 AND name = ?2",
        rusqlite::params![vocabulary, name.trim()],
        |row| {
            Ok(GenreTerm {
                id: row.get(0)?,
                vocabulary: row.get(1)?,
                name: row.get(2)?,
            })
        },
    )
    .optional()
    .with_context(|| format!("failed to query genre term {name:?}"))
}

/// Returns the term with this trimmed name, creating it if needed.
///
/// # Errors
///
/// Returns an error if the trimmed name is empty or the database
/// operation fails.
pub fn get_or_create_genre_term(
    conn: &Connection,
    vocabulary: &str,
    name: &str,
) -> Result<InsertOutcome> {
    let name = name.trim();
    if name.is_empty() {
        bail!("genre term name must not be empty");
    }

    let inserted = conn
        .execute(
            "INSERT INTO genre_terms (vocabulary, name) VALUES (?1, ?2)
             ON CONFLICT(vocabulary, name) DO NOTHING",
            rusqlite::params![vocabulary, name],
        )
        .with_context(|| format!("failed to insert genre term {name:?}"))?;

    if inserted > 0 {
        let id = conn.last_insert_rowid();
        tracing::debug!(id, name, vocabulary, "Genre term created");
        return Ok(InsertOutcome::Inserted(id));
    }

    let existing = find_genre_term(conn, vocabulary, name)?
        .with_context(|| format!("genre term {name:?} vanished after conflict"))?;
    Ok(InsertOutcome::AlreadyExists(existing.id))
}

/// Loads all terms of a vocabulary, ordered by name.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn load_genre_terms(conn: &Connection, vocabulary: &str) -> Result<Vec<GenreTerm>> {
    let mut stmt = conn
        .prepare("SELECT id, vocabulary, name FROM genre_terms WHERE vocabulary = ?1 ORDER BY name")
        .context("failed to prepare genre_terms query")?;

    let rows = stmt
        .query_map([vocabulary], |row| {
            Ok(GenreTerm {
                id: row.get(0)?,
                vocabulary: row.get(1)?,
                name: row.get(2)?,
            })
        })
        .context("failed to query genre_terms")?;

    rows.collect::<std::result::Result<Vec<_>, _>>()
        .context("failed to read genre_terms rows")
}

//! Movie content operations.

use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, Row};

use crate::genres::GenreTerm;
use crate::outcome::InsertOutcome;

/// A movie to be created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMovie {
    /// External ID (unique).
    pub external_id: String,
    /// Title.
    pub title: String,
    /// Release year.
    pub year: String,
    /// Body text (plot).
    pub body: String,
    /// Poster reference.
    pub poster_id: Option<i64>,
    /// Genre term IDs in display order.
    pub genre_term_ids: Vec<i64>,
}

/// A stored movie row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredMovie {
    /// Row ID.
    pub id: i64,
    /// External ID.
    pub external_id: String,
    /// Title.
    pub title: String,
    /// Release year.
    pub year: String,
    /// Body text.
    pub body: String,
    /// Poster reference.
    pub poster_id: Option<i64>,
    /// Import timestamp (UTC).
    pub imported_at: String,
}

const MOVIE_COLUMNS: &str = "id, external_id, title, year, body, poster_id, imported_at";

fn map_movie(row: &Row<'_>) -> rusqlite::Result<StoredMovie> {
    Ok(StoredMovie {
        id: row.get(0)?,
        external_id: row.get(1)?,
        title: row.get(2)?,
        year: row.get(3)?,
        body: row.get(4)?,
        poster_id: row.get(5)?,
        imported_at: row.get(6)?,
    })
}

/// Looks up a movie by external ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn find_movie_by_external_id(
    conn: &Connection,
    external_id: &str,
) -> Result<Option<StoredMovie>> {
    conn.query_row(
        &format!("SELECT {MOVIE_COLUMNS} FROM movies WHERE external_id = ?1"),
        [external_id],
        map_movie,
    )
    .optional()
    .with_context(|| format!("failed to query movie {external_id}"))
}

/// Creates a movie and its ordered genre links in one transaction.
///
/// Returns `AlreadyExists` without touching the genre links when a movie
/// with the same external ID is already stored.
///
/// # Errors
///
/// Returns an error if the database operation fails (e.g. a dangling
/// poster or term reference).
pub fn insert_movie(conn: &Connection, movie: &NewMovie) -> Result<InsertOutcome> {
    let tx = conn
        .unchecked_transaction()
        .context("failed to begin transaction")?;

    let inserted = tx
        .execute(
            "INSERT INTO movies (external_id, title, year, body, poster_id)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(external_id) DO NOTHING",
            rusqlite::params![
                movie.external_id,
                movie.title,
                movie.year,
                movie.body,
                movie.poster_id,
            ],
        )
        .with_context(|| format!("failed to insert movie {}", movie.external_id))?;

    if inserted == 0 {
        let id: i64 = tx
            .query_row(
                "SELECT id FROM movies WHERE external_id = ?1",
                [&movie.external_id],
                |row| row.get(0),
            )
            .with_context(|| format!("failed to look up movie {}", movie.external_id))?;
        tx.commit().context("failed to commit transaction")?;
        return Ok(InsertOutcome::AlreadyExists(id));
    }

    let movie_id = tx.last_insert_rowid();
    {
        let mut stmt = tx
            .prepare("INSERT INTO movie_genres (movie_id, position, term_id) VALUES (?1, ?2, ?3)")
            .context("failed to prepare movie_genres insert")?;
        for (position, term_id) in movie.genre_term_ids.iter().enumerate() {
            let position = i64::try_from(position).context("genre position overflow")?;
            stmt.execute(rusqlite::params![movie_id, position, term_id])
                .with_context(|| {
                    format!("failed to link genre {term_id} to {}", movie.external_id)
                })?;
        }
    }

    tx.commit().context("failed to commit transaction")?;
    tracing::debug!(
        id = movie_id,
        external_id = %movie.external_id,
        genres = movie.genre_term_ids.len(),
        "Movie created"
    );
    Ok(InsertOutcome::Inserted(movie_id))
}

/// Loads all movies ordered by title.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn load_movies(conn: &Connection) -> Result<Vec<StoredMovie>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {MOVIE_COLUMNS} FROM movies ORDER BY title, external_id"
        ))
        .context("failed to prepare movies query")?;

    let rows = stmt
        .query_map([], map_movie)
        .context("failed to query movies")?;

    rows.collect::<std::result::Result<Vec<_>, _>>()
        .context("failed to read movies rows")
}

/// Loads the genre terms of a movie in display order.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn load_movie_genres(conn: &Connection, movie_id: i64) -> Result<Vec<GenreTerm>> {
    let mut stmt = conn
        .prepare(
            "SELECT t.id, t.vocabulary, t.name
             FROM movie_genres mg
             JOIN genre_terms t ON t.id = mg.term_id
             WHERE mg.movie_id = ?1
             ORDER BY mg.position",
        )
        .context("failed to prepare movie_genres query")?;

    let rows = stmt
        .query_map([movie_id], |row| {
            Ok(GenreTerm {
                id: row.get(0)?,
                vocabulary: row.get(1)?,
                name: row.get(2)?,
            })
        })
        .context("failed to query movie_genres")?;

    rows.collect::<std::result::Result<Vec<_>, _>>()
        .context("failed to read movie_genres rows")
}

/// Counts stored movies.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_movies(conn: &Connection) -> Result<u64> {
    conn.query_row("SELECT COUNT(*) FROM movies", [], |row| row.get(0))
        .context("failed to count movies")
}

//! Single-record import with poster and genre deduplication.

use filmport_api::omdb::{LocalOmdbApi, MovieRecord};
use filmport_db::{
    GENRE_VOCABULARY, InsertOutcome, NewMovie, NewPoster, find_movie_by_external_id,
    find_poster_by_name, get_or_create_genre_term, insert_movie, insert_poster,
};
use rusqlite::Connection;
use tracing::instrument;
use url::Url;

use crate::error::ImportError;

/// Result of importing one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    /// A new movie was created.
    Imported {
        /// New movie row ID.
        movie_id: i64,
        /// Poster reference, if the record had one.
        poster_id: Option<i64>,
        /// Genre term IDs in display order.
        genre_term_ids: Vec<i64>,
    },
    /// A movie with this external ID was already stored.
    AlreadyExists {
        /// Existing movie row ID.
        movie_id: i64,
    },
}

/// Creates local content for fetched movie records.
///
/// Borrows the content store connection and an API handle for poster
/// downloads. Records are processed one at a time.
#[derive(Debug)]
pub struct Importer<'a, A> {
    conn: &'a Connection,
    api: &'a A,
}

impl<'a, A: LocalOmdbApi + Sync> Importer<'a, A> {
    /// Creates an importer over the given store and API.
    pub const fn new(conn: &'a Connection, api: &'a A) -> Self {
        Self { conn, api }
    }

    /// Imports a record unless a movie with its external ID exists.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::AssetDownload`] if the poster cannot be
    /// downloaded, or [`ImportError::Persistence`] if a store operation
    /// fails.
    #[instrument(skip_all, fields(external_id = %record.external_id))]
    pub async fn import(&self, record: &MovieRecord) -> Result<ImportOutcome, ImportError> {
        if let Some(existing) = find_movie_by_external_id(self.conn, &record.external_id)
            .map_err(ImportError::Persistence)?
        {
            tracing::info!(title = %record.title, "Movie already exists, skipping");
            return Ok(ImportOutcome::AlreadyExists {
                movie_id: existing.id,
            });
        }

        let poster_id = self.resolve_poster(record).await?;
        let genre_term_ids = self.resolve_genres(&record.genres)?;

        let movie = NewMovie {
            external_id: record.external_id.clone(),
            title: record.title.clone(),
            year: record.year.clone(),
            body: record.plot.clone(),
            poster_id,
            genre_term_ids,
        };

        match insert_movie(self.conn, &movie).map_err(ImportError::Persistence)? {
            InsertOutcome::Inserted(movie_id) => {
                tracing::info!(
                    movie_id,
                    title = %record.title,
                    genres = movie.genre_term_ids.len(),
                    has_poster = poster_id.is_some(),
                    "Movie imported"
                );
                Ok(ImportOutcome::Imported {
                    movie_id,
                    poster_id,
                    genre_term_ids: movie.genre_term_ids,
                })
            }
            InsertOutcome::AlreadyExists(movie_id) => {
                tracing::info!(title = %record.title, "Movie already exists, skipping");
                Ok(ImportOutcome::AlreadyExists { movie_id })
            }
        }
    }

    /// Returns the poster for the record, downloading it on first use.
    ///
    /// Posters are keyed by `"{title} Poster"`; an existing poster is
    /// reused without a download, even when the record has no poster
    /// URL. Otherwise a record without a URL yields `None`.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::AssetDownload`] if the URL is invalid or the
    /// download fails, or [`ImportError::Persistence`] if the store fails.
    pub async fn resolve_poster(&self, record: &MovieRecord) -> Result<Option<i64>, ImportError> {
        let name = record.poster_name();
        if let Some(existing) =
            find_poster_by_name(self.conn, &name).map_err(ImportError::Persistence)?
        {
            tracing::debug!(poster_id = existing.id, name = %name, "Reusing stored poster");
            return Ok(Some(existing.id));
        }

        let Some(url) = record.poster_url.as_deref() else {
            tracing::debug!(title = %record.title, "No poster available");
            return Ok(None);
        };

        let download_error = |source: anyhow::Error| ImportError::AssetDownload {
            url: url.to_owned(),
            source,
        };
        let parsed = Url::parse(url).map_err(|err| download_error(err.into()))?;
        let image = self.api.download(&parsed).await.map_err(download_error)?;

        let poster = NewPoster {
            name,
            file_name: format!("{}.jpg", record.title),
            alt_text: record.title.clone(),
            source_url: url.to_owned(),
            content_type: image.content_type,
            data: image.bytes,
        };
        let outcome = insert_poster(self.conn, &poster).map_err(ImportError::Persistence)?;
        tracing::debug!(
            poster_id = outcome.id(),
            name = %poster.name,
            bytes = poster.data.len(),
            "Poster stored"
        );
        Ok(Some(outcome.id()))
    }

    /// Resolves genre names to term IDs, creating missing terms.
    ///
    /// Names are trimmed and blank names skipped. IDs follow the input
    /// order; a term named twice is linked once.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::Persistence`] if the store fails.
    pub fn resolve_genres(&self, names: &[String]) -> Result<Vec<i64>, ImportError> {
        let mut ids = Vec::with_capacity(names.len());
        for name in names.iter().map(|n| n.as_str().trim()).filter(|n| !n.is_empty()) {
            let id = get_or_create_genre_term(self.conn, GENRE_VOCABULARY, name)
                .map_err(ImportError::Persistence)?
                .id();
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        Ok(ids)
    }
}

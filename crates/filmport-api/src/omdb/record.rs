//! `MovieRecord` - the unit handed from the fetcher to the importer.

use std::sync::LazyLock;

use regex::Regex;

use super::error::FetchError;
use super::types::{NOT_AVAILABLE, OmdbTitle};

/// IMDb-style external ID (`tt` followed by at least seven digits).
#[allow(clippy::expect_used)]
static EXTERNAL_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^tt\d{7,}$").expect("failed to compile external ID regex"));

/// A fully fetched movie, ready for import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieRecord {
    /// External ID (unique key).
    pub external_id: String,
    /// Title.
    pub title: String,
    /// Release year as reported by OMDb.
    pub year: String,
    /// Plot summary (empty when OMDb has none).
    pub plot: String,
    /// Genre names in OMDb order, trimmed.
    pub genres: Vec<String>,
    /// Poster URL; `None` when OMDb reports no poster.
    pub poster_url: Option<String>,
}

impl MovieRecord {
    /// Derived name of the poster asset for this movie.
    #[must_use]
    pub fn poster_name(&self) -> String {
        format!("{} Poster", self.title)
    }
}

/// Returns `None` for missing, blank, or `"N/A"` fields.
fn available(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty() && v != NOT_AVAILABLE)
}

/// Splits a comma-separated genre string into trimmed, non-empty names.
///
/// `"Action, Drama"` and `"Action,Drama"` yield the same list.
#[must_use]
pub fn split_genres(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty() && *name != NOT_AVAILABLE)
        .map(str::to_owned)
        .collect()
}

impl TryFrom<OmdbTitle> for MovieRecord {
    type Error = FetchError;

    fn try_from(title: OmdbTitle) -> Result<Self, Self::Error> {
        let external_id = title.imdb_id.trim().to_owned();
        if !EXTERNAL_ID_RE.is_match(&external_id) {
            return Err(FetchError::MalformedResponse(format!(
                "invalid external ID {external_id:?}"
            )));
        }
        let name = title.title.trim().to_owned();
        if name.is_empty() {
            return Err(FetchError::MalformedResponse(format!(
                "empty title for {external_id}"
            )));
        }

        Ok(Self {
            external_id,
            title: name,
            year: title.year.trim().to_owned(),
            plot: available(title.plot).unwrap_or_default(),
            genres: available(title.genre)
                .map(|raw| split_genres(&raw))
                .unwrap_or_default(),
            poster_url: available(title.poster),
        })
    }
}

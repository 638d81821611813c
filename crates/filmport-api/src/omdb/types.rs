//! OMDb API response types and search parameters.

use serde::Deserialize;

/// Value OMDb uses for absent fields (`"Poster": "N/A"`).
pub(crate) const NOT_AVAILABLE: &str = "N/A";

// --- Envelope ---

/// Fields shared by every OMDb response body.
///
/// OMDb answers most failures with HTTP 200 and `"Response": "False"`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct OmdbEnvelope {
    /// `"True"` or `"False"`.
    pub response: String,
    /// Error message when `response` is `"False"`.
    #[serde(default)]
    pub error: Option<String>,
}

impl OmdbEnvelope {
    /// Returns `true` when OMDb reported success.
    pub(crate) fn is_success(&self) -> bool {
        self.response.eq_ignore_ascii_case("true")
    }
}

// --- Search ---

/// Response from a search request (`?s=...`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OmdbSearchResponse {
    /// Matches on the requested page.
    #[serde(rename = "Search", default)]
    pub search: Vec<OmdbSearchItem>,
    /// Total number of matches across all pages, as a decimal string.
    #[serde(rename = "totalResults", default)]
    pub total_results: Option<String>,
}

impl OmdbSearchResponse {
    /// Total number of matches reported by OMDb.
    ///
    /// Falls back to the page length when the field is absent or not numeric.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.total_results
            .as_deref()
            .and_then(|raw| raw.trim().parse().ok())
            .unwrap_or_else(|| u32::try_from(self.search.len()).unwrap_or(u32::MAX))
    }
}

/// A single search match.
#[derive(Debug, Clone, Deserialize)]
pub struct OmdbSearchItem {
    /// Title.
    #[serde(rename = "Title")]
    pub title: String,
    /// Release year (may be a range for series, e.g. "2018–2020").
    #[serde(rename = "Year")]
    pub year: String,
    /// External ID (IMDb ID).
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
    /// Result type ("movie", "series", "episode").
    #[serde(rename = "Type", default)]
    pub kind: Option<String>,
    /// Poster URL or "N/A".
    #[serde(rename = "Poster", default)]
    pub poster: Option<String>,
}

// --- Title details ---

/// Response from a detail request (`?i=...`).
#[derive(Debug, Clone, Deserialize)]
pub struct OmdbTitle {
    /// Title.
    #[serde(rename = "Title")]
    pub title: String,
    /// Release year.
    #[serde(rename = "Year")]
    pub year: String,
    /// Plot summary.
    #[serde(rename = "Plot", default)]
    pub plot: Option<String>,
    /// Comma-separated genre list (e.g. "Comedy, Drama").
    #[serde(rename = "Genre", default)]
    pub genre: Option<String>,
    /// Poster URL or "N/A".
    #[serde(rename = "Poster", default)]
    pub poster: Option<String>,
    /// External ID (IMDb ID).
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
}

// --- Poster ---

/// A downloaded poster image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PosterImage {
    /// Raw image bytes.
    pub bytes: Vec<u8>,
    /// `Content-Type` header value, if the server sent one.
    pub content_type: Option<String>,
}

// --- Search Parameters ---

/// Parameters for a search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    /// Search term (required, `s`).
    pub term: String,
    /// Release year filter (`y`).
    pub year: Option<u32>,
}

impl SearchParams {
    /// Creates new search params with the given term.
    pub fn new(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            year: None,
        }
    }

    /// Sets the release year filter.
    #[must_use]
    pub const fn year(mut self, year: u32) -> Self {
        self.year = Some(year);
        self
    }
}

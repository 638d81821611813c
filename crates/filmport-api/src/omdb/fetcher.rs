//! Turns a year/term search into complete movie records.

use std::collections::HashSet;

use tracing::instrument;

use super::api::LocalOmdbApi;
use super::error::FetchError;
use super::record::MovieRecord;
use super::types::SearchParams;

/// A year/term search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// Release year.
    pub year: u32,
    /// Search term.
    pub term: String,
}

impl SearchQuery {
    /// Creates a new query.
    pub fn new(year: u32, term: impl Into<String>) -> Self {
        Self {
            year,
            term: term.into(),
        }
    }
}

/// A search match whose detail request failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    /// External ID from the search match.
    pub external_id: String,
    /// Title from the search match.
    pub title: String,
    /// Why the detail request failed.
    pub error: FetchError,
}

/// Result of a successful search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The search matched nothing.
    NoResults,
    /// The search matched at least one title.
    Found {
        /// Records in search order.
        records: Vec<MovieRecord>,
        /// Matches whose detail request failed; empty on full success.
        failures: Vec<FetchFailure>,
        /// Total matches reported by OMDb across all pages.
        total_results: u32,
    },
}

/// Searches OMDb and fetches details for every match on the first page.
///
/// Issues one search request and one detail request per distinct match.
/// Detail failures are logged and collected in [`FetchOutcome::Found`]
/// instead of aborting the other matches.
///
/// # Errors
///
/// Returns an error if the search request itself fails.
#[instrument(skip_all, fields(year = query.year, term = %query.term))]
pub async fn fetch_movies(
    api: &(impl LocalOmdbApi + Sync),
    query: &SearchQuery,
) -> Result<FetchOutcome, FetchError> {
    let params = SearchParams::new(query.term.as_str()).year(query.year);
    let response = api.search(&params).await.map_err(|err| {
        let classified = FetchError::classify(&err);
        tracing::error!(error = %classified, "OMDb search failed");
        classified
    })?;

    if response.search.is_empty() {
        tracing::info!("OMDb search returned no matches");
        return Ok(FetchOutcome::NoResults);
    }

    let total_results = response.total();
    let page_len = response.search.len();
    if usize::try_from(total_results).is_ok_and(|total| total > page_len) {
        tracing::warn!(
            total_results,
            fetched = page_len,
            "Search has more matches than one page; only the first page is fetched"
        );
    }

    let mut seen: HashSet<String> = HashSet::new();
    let mut records = Vec::with_capacity(page_len);
    let mut failures = Vec::new();

    for item in response.search {
        if !seen.insert(item.imdb_id.clone()) {
            tracing::debug!(external_id = %item.imdb_id, "Skipping duplicate search match");
            continue;
        }

        let fetched = match api.title(&item.imdb_id).await {
            Ok(title) => MovieRecord::try_from(title),
            Err(err) => Err(FetchError::classify(&err)),
        };

        match fetched {
            Ok(record) => records.push(record),
            Err(error) => {
                tracing::warn!(
                    external_id = %item.imdb_id,
                    title = %item.title,
                    %error,
                    "Failed to fetch movie details"
                );
                failures.push(FetchFailure {
                    external_id: item.imdb_id,
                    title: item.title,
                    error,
                });
            }
        }
    }

    tracing::info!(
        fetched = records.len(),
        failed = failures.len(),
        total_results,
        "OMDb fetch complete"
    );

    Ok(FetchOutcome::Found {
        records,
        failures,
        total_results,
    })
}

//! Sequential batch import with progress reporting and cancellation.

use filmport_api::omdb::{
    FetchError, FetchFailure, FetchOutcome, LocalOmdbApi, MovieRecord, SearchQuery, fetch_movies,
};
use rusqlite::Connection;
use tokio_util::sync::CancellationToken;
use tracing::instrument;

use crate::importer::{ImportOutcome, Importer};

/// Progress after one record has been processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchProgress<'a> {
    /// 1-based position of the processed record.
    pub current: usize,
    /// Number of records in the batch.
    pub total: usize,
    /// Title of the processed record.
    pub title: &'a str,
}

/// Outcome of one record in a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    /// A new movie was created.
    Imported {
        /// New movie row ID.
        movie_id: i64,
    },
    /// The movie was already stored.
    AlreadyExists {
        /// Existing movie row ID.
        movie_id: i64,
    },
    /// The import failed; the batch continued.
    Failed(String),
    /// The batch was cancelled before this record completed.
    Cancelled,
}

/// A record together with its outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemReport {
    /// External ID of the record.
    pub external_id: String,
    /// Title of the record.
    pub title: String,
    /// What happened to it.
    pub outcome: ItemOutcome,
}

/// Per-record outcomes of a batch, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// One entry per input record.
    pub items: Vec<ItemReport>,
}

impl BatchReport {
    fn count(&self, pred: impl Fn(&ItemOutcome) -> bool) -> usize {
        self.items.iter().filter(|item| pred(&item.outcome)).count()
    }

    /// Number of newly created movies.
    #[must_use]
    pub fn imported(&self) -> usize {
        self.count(|o| matches!(o, ItemOutcome::Imported { .. }))
    }

    /// Number of records skipped because the movie existed.
    #[must_use]
    pub fn already_exists(&self) -> usize {
        self.count(|o| matches!(o, ItemOutcome::AlreadyExists { .. }))
    }

    /// Number of failed records.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, ItemOutcome::Failed(_)))
    }

    /// Number of records left unprocessed by cancellation.
    #[must_use]
    pub fn cancelled(&self) -> usize {
        self.count(|o| matches!(o, ItemOutcome::Cancelled))
    }
}

/// Result of a full search-and-import run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunReport {
    /// The search matched nothing.
    NoResults,
    /// The search matched and the batch ran.
    Completed {
        /// Per-record outcomes.
        batch: BatchReport,
        /// Matches whose details could not be fetched.
        fetch_failures: Vec<FetchFailure>,
        /// Total matches reported by OMDb across all pages.
        total_results: u32,
    },
}

/// Imports records one at a time, in order.
///
/// Each record is handed to [`Importer::import`] exactly once. A failed
/// record does not stop the batch. Once `cancel` fires, the in-flight
/// import is abandoned at its next await point and the remaining records
/// are reported as [`ItemOutcome::Cancelled`]. `on_progress` is called
/// after every processed record.
pub async fn import_batch<A, I, F>(
    importer: &Importer<'_, A>,
    records: I,
    cancel: &CancellationToken,
    mut on_progress: F,
) -> BatchReport
where
    A: LocalOmdbApi + Sync,
    I: IntoIterator<Item = MovieRecord>,
    F: FnMut(BatchProgress<'_>),
{
    let records: Vec<MovieRecord> = records.into_iter().collect();
    let total = records.len();
    let mut items = Vec::with_capacity(total);

    for (index, record) in records.into_iter().enumerate() {
        let outcome = if cancel.is_cancelled() {
            ItemOutcome::Cancelled
        } else {
            tokio::select! {
                biased;
                () = cancel.cancelled() => ItemOutcome::Cancelled,
                result = importer.import(&record) => match result {
                    Ok(ImportOutcome::Imported { movie_id, .. }) => ItemOutcome::Imported { movie_id },
                    Ok(ImportOutcome::AlreadyExists { movie_id }) => {
                        ItemOutcome::AlreadyExists { movie_id }
                    }
                    Err(err) => {
                        let reason = err.reason();
                        tracing::warn!(
                            external_id = %record.external_id,
                            title = %record.title,
                            error = %reason,
                            "Import failed"
                        );
                        ItemOutcome::Failed(reason)
                    }
                },
            }
        };

        if !matches!(outcome, ItemOutcome::Cancelled) {
            on_progress(BatchProgress {
                current: index.saturating_add(1),
                total,
                title: &record.title,
            });
        }

        items.push(ItemReport {
            external_id: record.external_id,
            title: record.title,
            outcome,
        });
    }

    let report = BatchReport { items };
    tracing::info!(
        imported = report.imported(),
        already_exists = report.already_exists(),
        failed = report.failed(),
        cancelled = report.cancelled(),
        "Batch finished"
    );
    report
}

/// Searches OMDb for `query` and imports every fetched record.
///
/// # Errors
///
/// Returns an error if the search request fails. Detail and import
/// failures are reported in [`RunReport::Completed`].
#[instrument(skip_all, fields(year = query.year, term = %query.term))]
pub async fn run_import<A, F>(
    api: &A,
    conn: &Connection,
    query: &SearchQuery,
    cancel: &CancellationToken,
    on_progress: F,
) -> Result<RunReport, FetchError>
where
    A: LocalOmdbApi + Sync,
    F: FnMut(BatchProgress<'_>),
{
    match fetch_movies(api, query).await? {
        FetchOutcome::NoResults => Ok(RunReport::NoResults),
        FetchOutcome::Found {
            records,
            failures,
            total_results,
        } => {
            let importer = Importer::new(conn, api);
            let batch = import_batch(&importer, records, cancel, on_progress).await;
            Ok(RunReport::Completed {
                batch,
                fetch_failures: failures,
                total_results,
            })
        }
    }
}

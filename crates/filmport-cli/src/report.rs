//! User-facing output for search and import results.

use filmport_api::omdb::{FetchOutcome, MovieRecord};
use filmport_db::{GenreTerm, StoredMovie};
use filmport_import::{BatchProgress, RunReport};

/// Shown when a search matches nothing.
pub const NO_RESULTS_MESSAGE: &str =
    "There are no movies that match your search, please try something else.";

/// Formats one fetched record as a tab-separated line.
fn record_line(record: &MovieRecord) -> String {
    format!(
        "{}\t{}\t{}\t{}",
        record.external_id,
        record.year,
        record.title,
        record.genres.join(", ")
    )
}

/// Formats one stored movie as a tab-separated line.
pub fn movie_line(movie: &StoredMovie, genres: &[GenreTerm]) -> String {
    let names: Vec<&str> = genres.iter().map(|g| g.name.as_str()).collect();
    format!(
        "{}\t{}\t{}\t{}\t{}",
        movie.external_id,
        movie.year,
        if movie.poster_id.is_some() { "poster" } else { "-" },
        movie.title,
        names.join(", ")
    )
}

/// Logs batch progress as "Processed N out of M".
pub fn log_progress(progress: BatchProgress<'_>) {
    tracing::info!(
        "Processed {} out of {}: {}",
        progress.current,
        progress.total,
        progress.title
    );
}

/// Logs the result of `filmport search`.
pub fn log_search(outcome: &FetchOutcome) {
    let FetchOutcome::Found {
        records,
        failures,
        total_results,
    } = outcome
    else {
        tracing::info!("{NO_RESULTS_MESSAGE}");
        return;
    };

    tracing::info!("IMDb ID\t\tYear\tTitle\tGenres");
    for record in records {
        tracing::info!("{}", record_line(record));
    }
    for failure in failures {
        tracing::warn!(
            "Could not fetch details for {} ({}): {}",
            failure.title,
            failure.external_id,
            failure.error
        );
    }
    tracing::info!("Found {} of {} matches", records.len(), total_results);
}

/// Logs the summary of `filmport import`.
pub fn log_run_report(report: &RunReport) {
    let RunReport::Completed {
        batch,
        fetch_failures,
        total_results,
    } = report
    else {
        tracing::info!("{NO_RESULTS_MESSAGE}");
        return;
    };

    for failure in fetch_failures {
        tracing::warn!(
            "Could not fetch details for {} ({}): {}",
            failure.title,
            failure.external_id,
            failure.error
        );
    }

    let seen = batch.items.len().saturating_add(fetch_failures.len());
    if usize::try_from(*total_results).is_ok_and(|total| total > seen) {
        tracing::info!(
            "Only the first page was imported ({seen} of {total_results} matches)"
        );
    }
    if batch.cancelled() > 0 {
        tracing::warn!("Import cancelled, {} movies skipped", batch.cancelled());
    }

    tracing::info!(
        "Import finished: {} imported, {} already existed, {} failed",
        batch.imported(),
        batch.already_exists(),
        batch.failed()
    );
}

#[cfg(test)]
mod tests {
    use filmport_api::omdb::{FetchError, FetchFailure};
    use filmport_import::{BatchReport, ItemOutcome, ItemReport};
    use tracing::subscriber::with_default;
    use tracing_mock::{expect, subscriber};

    use super::*;

    fn item(external_id: &str, title: &str, outcome: ItemOutcome) -> ItemReport {
        ItemReport {
            external_id: String::from(external_id),
            title: String::from(title),
            outcome,
        }
    }

    #[test]
    fn test_no_results_message() {
        // Arrange
        let (subscriber, handle) = subscriber::mock()
            .event(expect::event().with_fields(expect::msg(NO_RESULTS_MESSAGE)))
            .only()
            .run_with_handle();

        // Act
        with_default(subscriber, || {
            log_run_report(&RunReport::NoResults);
        });

        // Assert
        handle.assert_finished();
    }

    #[test]
    fn test_search_without_matches_logs_message() {
        // Arrange
        let (subscriber, handle) = subscriber::mock()
            .event(expect::event().with_fields(expect::msg(NO_RESULTS_MESSAGE)))
            .only()
            .run_with_handle();

        // Act
        with_default(subscriber, || {
            log_search(&FetchOutcome::NoResults);
        });

        // Assert
        handle.assert_finished();
    }

    #[test]
    fn test_completed_summary() {
        // Arrange
        let report = RunReport::Completed {
            batch: BatchReport {
                items: vec![
                    item("tt5104604", "Isle of Dogs", ItemOutcome::Imported { movie_id: 1 }),
                    item(
                        "tt7605254",
                        "Dog Days",
                        ItemOutcome::AlreadyExists { movie_id: 2 },
                    ),
                ],
            },
            fetch_failures: vec![],
            total_results: 2,
        };
        let (subscriber, handle) = subscriber::mock()
            .event(expect::event().with_fields(expect::msg(
                "Import finished: 1 imported, 1 already existed, 0 failed",
            )))
            .only()
            .run_with_handle();

        // Act
        with_default(subscriber, || {
            log_run_report(&report);
        });

        // Assert
        handle.assert_finished();
    }

    #[test]
    fn test_fetch_failures_and_truncation_are_reported() {
        // Arrange
        let report = RunReport::Completed {
            batch: BatchReport {
                items: vec![item(
                    "tt5104604",
                    "Isle of Dogs",
                    ItemOutcome::Failed(String::from("boom")),
                )],
            },
            fetch_failures: vec![FetchFailure {
                external_id: String::from("tt7605254"),
                title: String::from("Dog Days"),
                error: FetchError::Transport(String::from("timed out")),
            }],
            total_results: 25,
        };
        let (subscriber, handle) = subscriber::mock()
            .event(
                expect::event()
                    .at_level(tracing::Level::WARN)
                    .with_fields(expect::msg(
                        "Could not fetch details for Dog Days (tt7605254): transport error: timed out",
                    )),
            )
            .event(expect::event().with_fields(expect::msg(
                "Only the first page was imported (2 of 25 matches)",
            )))
            .event(expect::event().with_fields(expect::msg(
                "Import finished: 0 imported, 0 already existed, 1 failed",
            )))
            .only()
            .run_with_handle();

        // Act
        with_default(subscriber, || {
            log_run_report(&report);
        });

        // Assert
        handle.assert_finished();
    }

    #[test]
    fn test_progress_message() {
        // Arrange
        let (subscriber, handle) = subscriber::mock()
            .event(expect::event().with_fields(expect::msg("Processed 1 out of 2: Isle of Dogs")))
            .only()
            .run_with_handle();

        // Act
        with_default(subscriber, || {
            log_progress(BatchProgress {
                current: 1,
                total: 2,
                title: "Isle of Dogs",
            });
        });

        // Assert
        handle.assert_finished();
    }

    #[test]
    fn test_movie_line() {
        // Arrange
        let movie = StoredMovie {
            id: 1,
            external_id: String::from("tt7605254"),
            title: String::from("Dog Days"),
            year: String::from("2018"),
            body: String::new(),
            poster_id: Some(3),
            imported_at: String::from("2026-01-01 00:00:00"),
        };
        let genres = vec![
            GenreTerm {
                id: 1,
                vocabulary: String::from("genre"),
                name: String::from("Comedy"),
            },
            GenreTerm {
                id: 2,
                vocabulary: String::from("genre"),
                name: String::from("Drama"),
            },
        ];

        // Act
        let line = movie_line(&movie, &genres);

        // Assert
        assert_eq!(line, "tt7605254\t2018\tposter\tDog Days\tComedy, Drama");
    }
}

//! OMDb API client module.
//!
//! Handles HTTP requests to the OMDb endpoint, poster downloads,
//! and assembles search results into [`MovieRecord`]s.

mod api;
mod client;
mod error;
mod fetcher;
mod record;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{LocalOmdbApi, OmdbApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{OmdbClient, OmdbClientBuilder};
#[allow(clippy::module_name_repetitions)]
pub use error::{FetchError, OmdbError};
pub use fetcher::{FetchFailure, FetchOutcome, SearchQuery, fetch_movies};
pub use record::{MovieRecord, split_genres};
#[allow(clippy::module_name_repetitions)]
pub use types::{OmdbSearchItem, OmdbSearchResponse, OmdbTitle, PosterImage, SearchParams};

//! `OmdbApi` trait definition.
#![allow(clippy::future_not_send)]

use anyhow::Result;
use url::Url;

use super::types::{OmdbSearchResponse, OmdbTitle, PosterImage, SearchParams};

/// OMDb API trait.
///
/// Abstracts API operations for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(OmdbApi: Send)]
pub trait LocalOmdbApi {
    /// Searches titles by term and optional year.
    ///
    /// A search without matches yields an empty response, not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails, or OMDb
    /// rejects the request.
    async fn search(&self, params: &SearchParams) -> Result<OmdbSearchResponse>;

    /// Fetches full details of a single title by external ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails, or OMDb
    /// does not know the ID.
    async fn title(&self, imdb_id: &str) -> Result<OmdbTitle>;

    /// Downloads a poster image.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails, the status is not 2xx,
    /// or the body is empty.
    async fn download(&self, url: &Url) -> Result<PosterImage>;
}

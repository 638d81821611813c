//! `OmdbClient` - OMDb API client implementation.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use tracing::instrument;
use url::Url;

use super::api::LocalOmdbApi;
use super::error::OmdbError;
use super::types::{OmdbEnvelope, OmdbSearchResponse, OmdbTitle, PosterImage, SearchParams};

/// Default base URL for the OMDb API.
const DEFAULT_BASE_URL: &str = "https://www.omdbapi.com/";

/// Default per-request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// OMDb error message for a search without matches.
const NOT_FOUND_MESSAGE: &str = "Movie not found!";

/// Maximum number of body bytes included in decode errors.
const PREVIEW_LEN: usize = 500;

/// OMDb API client.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct OmdbClient {
    /// HTTP client.
    http_client: Client,
    /// Base URL for API requests.
    base_url: Url,
    /// API key sent as the `apikey` query parameter.
    api_key: String,
}

/// Builder for `OmdbClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct OmdbClientBuilder {
    base_url: Option<Url>,
    api_key: Option<String>,
    user_agent: Option<String>,
    timeout: Option<Duration>,
}

impl OmdbClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            api_key: None,
            user_agent: None,
            timeout: None,
        }
    }

    /// Overrides the base URL (for wiremock in tests).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the API key (required).
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the User-Agent (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Sets the per-request timeout (default: 10s).
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - `api_key` is not set or blank.
    /// - `user_agent` is not set.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<OmdbClient> {
        let api_key = self
            .api_key
            .filter(|key| !key.trim().is_empty())
            .context("api_key is required")?;
        let user_agent = self.user_agent.context("user_agent is required")?;

        let base_url = if let Some(url) = self.base_url {
            url
        } else {
            let result = Url::parse(DEFAULT_BASE_URL);
            result.context("invalid default base URL")?
        };

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .gzip(true)
            .timeout(self.timeout.unwrap_or(DEFAULT_TIMEOUT))
            .build()
            .context("failed to build HTTP client")?;

        Ok(OmdbClient {
            http_client,
            base_url,
            api_key,
        })
    }
}

impl OmdbClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> OmdbClientBuilder {
        OmdbClientBuilder::new()
    }

    /// Decodes a JSON body, keeping a preview of it on failure.
    fn decode<T: DeserializeOwned>(body: &str) -> Result<T, OmdbError> {
        serde_json::from_str(body).map_err(|source| {
            let preview: String = body.chars().take(PREVIEW_LEN).collect();
            OmdbError::Decode {
                len: body.len(),
                preview,
                source,
            }
        })
    }

    /// Sends a GET request with the API key and query params.
    ///
    /// Returns the response body together with the decoded OMDb envelope.
    #[instrument(skip_all)]
    async fn get_body(&self, query: &[(&str, String)]) -> Result<(String, OmdbEnvelope)> {
        let request = self
            .http_client
            .get(self.base_url.clone())
            .query(&[("apikey", self.api_key.as_str())])
            .query(query)
            .build()
            .context("failed to build OMDb request")?;

        tracing::debug!(query = ?query, "OMDb API request");

        let response = self
            .http_client
            .execute(request)
            .await
            .map_err(OmdbError::Transport)?;
        let status = response.status();
        let body = response.text().await.map_err(OmdbError::Transport)?;

        if !status.is_success() {
            let message = Self::decode::<OmdbEnvelope>(&body)
                .ok()
                .and_then(|envelope| envelope.error)
                .unwrap_or(body);
            return Err(OmdbError::Status { status, message }.into());
        }

        let envelope = Self::decode::<OmdbEnvelope>(&body)?;
        Ok((body, envelope))
    }
}

impl LocalOmdbApi for OmdbClient {
    #[instrument(skip_all, fields(term = %params.term, year = ?params.year))]
    async fn search(&self, params: &SearchParams) -> Result<OmdbSearchResponse> {
        let mut query: Vec<(&str, String)> = vec![
            ("s", params.term.clone()),
            ("type", String::from("movie")),
            ("page", String::from("1")),
        ];
        if let Some(year) = params.year {
            query.push(("y", year.to_string()));
        }

        let (body, envelope) = self.get_body(&query).await?;
        if !envelope.is_success() {
            let message = envelope
                .error
                .unwrap_or_else(|| String::from("unknown error"));
            if message == NOT_FOUND_MESSAGE {
                return Ok(OmdbSearchResponse::default());
            }
            return Err(OmdbError::Api(message).into());
        }

        Self::decode(&body).context("failed to decode search response")
    }

    #[instrument(skip_all, fields(imdb_id = %imdb_id))]
    async fn title(&self, imdb_id: &str) -> Result<OmdbTitle> {
        let query = [("i", String::from(imdb_id)), ("plot", String::from("short"))];

        let (body, envelope) = self.get_body(&query).await?;
        if !envelope.is_success() {
            let message = envelope
                .error
                .unwrap_or_else(|| String::from("unknown error"));
            return Err(OmdbError::Api(message))
                .with_context(|| format!("failed to fetch details for {imdb_id}"));
        }

        Self::decode(&body).with_context(|| format!("failed to decode details for {imdb_id}"))
    }

    #[instrument(skip_all, fields(url = %url))]
    async fn download(&self, url: &Url) -> Result<PosterImage> {
        let response = self
            .http_client
            .get(url.clone())
            .send()
            .await
            .map_err(OmdbError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(OmdbError::Status {
                status,
                message: format!("poster download failed: {url}"),
            }
            .into());
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let bytes = response.bytes().await.map_err(OmdbError::Transport)?;
        anyhow::ensure!(!bytes.is_empty(), "poster body is empty: {url}");

        tracing::debug!(size = bytes.len(), "Poster downloaded");
        Ok(PosterImage {
            bytes: bytes.to_vec(),
            content_type,
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use super::*;
    use crate::omdb::error::FetchError;

    fn client_for(mock_server: &wiremock::MockServer) -> OmdbClient {
        let base_url = format!("{}/", mock_server.uri());
        OmdbClient::builder()
            .base_url(base_url.parse().unwrap())
            .api_key("test-key")
            .user_agent("test/0.0.0")
            .build()
            .unwrap()
    }

    #[test]
    fn test_builder_requires_api_key() {
        // Arrange & Act
        let result = OmdbClient::builder().user_agent("test/0.0.0").build();

        // Assert
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("api_key is required")
        );
    }

    #[test]
    fn test_builder_rejects_blank_api_key() {
        // Arrange & Act
        let result = OmdbClient::builder()
            .api_key("   ")
            .user_agent("test/0.0.0")
            .build();

        // Assert
        assert!(result.is_err());
    }

    #[test]
    fn test_builder_requires_user_agent() {
        // Arrange & Act
        let result = OmdbClient::builder().api_key("test-key").build();

        // Assert
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("user_agent is required")
        );
    }

    #[test]
    fn test_builder_with_custom_base_url() {
        // Arrange
        let custom_url = Url::parse("http://localhost:8080/").unwrap();

        // Act
        let client = OmdbClient::builder()
            .base_url(custom_url.clone())
            .api_key("test-key")
            .user_agent("test/0.0.0")
            .build()
            .unwrap();

        // Assert
        assert_eq!(client.base_url, custom_url);
    }

    #[test]
    fn test_parse_search_fixture() {
        // Arrange
        let json = include_str!("../../../../fixtures/omdb/search_dog_2018.json");

        // Act
        let response: OmdbSearchResponse = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(response.search.len(), 2);
        assert_eq!(response.search[0].imdb_id, "tt5104604");
        assert_eq!(response.total(), 2);
    }

    #[test]
    fn test_parse_title_fixture() {
        // Arrange
        let json = include_str!("../../../../fixtures/omdb/title_tt5104604.json");

        // Act
        let title: OmdbTitle = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(title.title, "Isle of Dogs");
        assert_eq!(title.genre.as_deref(), Some("Animation, Adventure, Comedy"));
    }

    #[tokio::test]
    async fn test_search_via_http_sends_query_params() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/omdb/search_dog_2018.json");

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/"))
            .and(wiremock::matchers::query_param("apikey", "test-key"))
            .and(wiremock::matchers::query_param("s", "Dog"))
            .and(wiremock::matchers::query_param("y", "2018"))
            .and(wiremock::matchers::query_param("type", "movie"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(json_body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let params = SearchParams::new("Dog").year(2018);

        // Act
        let response = client.search(&params).await.unwrap();

        // Assert
        assert_eq!(response.search.len(), 2);
        assert_eq!(response.search[1].imdb_id, "tt7605254");
    }

    #[tokio::test]
    async fn test_search_not_found_is_empty() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/omdb/search_not_found.json");

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(json_body))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);

        // Act
        let response = client.search(&SearchParams::new("zzzz")).await.unwrap();

        // Assert
        assert!(response.search.is_empty());
        assert_eq!(response.total(), 0);
    }

    #[tokio::test]
    async fn test_search_too_many_results_is_api_error() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(
                wiremock::ResponseTemplate::new(200)
                    .set_body_string(r#"{"Response":"False","Error":"Too many results."}"#),
            )
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);

        // Act
        let err = client.search(&SearchParams::new("a")).await.unwrap_err();

        // Assert
        assert!(matches!(FetchError::classify(&err), FetchError::Api(_)));
        assert!(err.to_string().contains("Too many results."));
    }

    #[tokio::test]
    async fn test_title_via_http() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/omdb/title_tt5104604.json");

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::query_param("i", "tt5104604"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(json_body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);

        // Act
        let title = client.title("tt5104604").await.unwrap();

        // Assert
        assert_eq!(title.imdb_id, "tt5104604");
        assert_eq!(title.year, "2018");
    }

    #[tokio::test]
    async fn test_title_unknown_id_is_api_error() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(
                wiremock::ResponseTemplate::new(200)
                    .set_body_string(r#"{"Response":"False","Error":"Incorrect IMDb ID."}"#),
            )
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);

        // Act
        let err = client.title("tt0000000").await.unwrap_err();

        // Assert
        assert!(matches!(FetchError::classify(&err), FetchError::Api(_)));
    }

    #[tokio::test]
    async fn test_http_error_carries_omdb_message() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let error_body = include_str!("../../../../fixtures/omdb/error_invalid_key.json");

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(wiremock::ResponseTemplate::new(401).set_body_string(error_body))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);

        // Act
        let err = client
            .search(&SearchParams::new("Dog"))
            .await
            .unwrap_err();

        // Assert
        let message = err.to_string();
        assert!(message.contains("OMDb API error (HTTP 401"));
        assert!(message.contains("Invalid API key!"));
        assert!(matches!(FetchError::classify(&err), FetchError::Transport(_)));
    }

    #[tokio::test]
    async fn test_malformed_json_is_decode_error() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string("<html>oops"))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);

        // Act
        let err = client
            .search(&SearchParams::new("Dog"))
            .await
            .unwrap_err();

        // Assert
        assert!(matches!(
            FetchError::classify(&err),
            FetchError::MalformedResponse(_)
        ));
        assert!(err.to_string().contains("<html>oops"));
    }

    #[tokio::test]
    async fn test_timeout_is_transport_error() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/omdb/search_dog_2018.json");

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(
                wiremock::ResponseTemplate::new(200)
                    .set_body_string(json_body)
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&mock_server)
            .await;

        let client = OmdbClient::builder()
            .base_url(format!("{}/", mock_server.uri()).parse().unwrap())
            .api_key("test-key")
            .user_agent("test/0.0.0")
            .timeout(Duration::from_millis(50))
            .build()
            .unwrap();

        // Act
        let err = client
            .search(&SearchParams::new("Dog"))
            .await
            .unwrap_err();

        // Assert
        assert!(matches!(FetchError::classify(&err), FetchError::Transport(_)));
    }

    #[tokio::test]
    async fn test_download_returns_bytes_and_content_type() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/posters/isle.jpg"))
            .respond_with(
                wiremock::ResponseTemplate::new(200)
                    .insert_header("Content-Type", "image/jpeg")
                    .set_body_bytes(vec![0xFF, 0xD8, 0xFF, 0xE0]),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let url = Url::parse(&format!("{}/posters/isle.jpg", mock_server.uri())).unwrap();

        // Act
        let image = client.download(&url).await.unwrap();

        // Assert
        assert_eq!(image.bytes, vec![0xFF, 0xD8, 0xFF, 0xE0]);
        assert_eq!(image.content_type.as_deref(), Some("image/jpeg"));
    }

    #[tokio::test]
    async fn test_download_not_found_fails() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(wiremock::ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let url = Url::parse(&format!("{}/missing.jpg", mock_server.uri())).unwrap();

        // Act
        let result = client.download(&url).await;

        // Assert
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("HTTP 404"));
    }
}

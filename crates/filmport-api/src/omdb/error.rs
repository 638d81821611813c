//! OMDb error types.

use thiserror::Error;

/// Low-level failure raised by `OmdbClient`.
///
/// Client methods return `anyhow::Result`; the underlying error is one of
/// these variants so callers can classify it with [`FetchError::classify`].
#[derive(Debug, Error)]
#[allow(clippy::module_name_repetitions)]
pub enum OmdbError {
    /// Network failure, timeout, or unreadable body.
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// Non-2xx HTTP status.
    #[error("OMDb API error (HTTP {status}): {message}")]
    Status {
        /// HTTP status code.
        status: reqwest::StatusCode,
        /// OMDb `Error` field, or the raw body.
        message: String,
    },

    /// Body was not the expected JSON shape.
    #[error("failed to decode OMDb response (len={len}): {preview}")]
    Decode {
        /// Body length in bytes.
        len: usize,
        /// First bytes of the body.
        preview: String,
        /// JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// OMDb answered `"Response": "False"`.
    #[error("OMDb API error: {0}")]
    Api(String),
}

/// Classified failure of a fetch step.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[allow(clippy::module_name_repetitions)]
pub enum FetchError {
    /// Network or HTTP failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// JSON or shape mismatch.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// OMDb rejected the request (invalid key, too many results, unknown ID).
    #[error("OMDb rejected the request: {0}")]
    Api(String),
}

impl FetchError {
    /// Classifies an error returned by an `OmdbApi` implementation.
    ///
    /// Errors that carry no [`OmdbError`] in their chain are treated as
    /// transport failures.
    #[must_use]
    pub fn classify(err: &anyhow::Error) -> Self {
        let message = format!("{err:#}");
        let omdb = err
            .chain()
            .find_map(|cause| cause.downcast_ref::<OmdbError>());
        match omdb {
            Some(OmdbError::Decode { .. }) => Self::MalformedResponse(message),
            Some(OmdbError::Api(_)) => Self::Api(message),
            Some(OmdbError::Transport(_) | OmdbError::Status { .. }) | None => {
                Self::Transport(message)
            }
        }
    }
}

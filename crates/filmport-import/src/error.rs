//! Import error types.

/// Why a single record could not be imported.
///
/// Either variant aborts the current record only; supporting records
/// created before the failure stay in place and are reused on retry.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    /// The poster image could not be downloaded.
    #[error("failed to download poster from {url}")]
    AssetDownload {
        /// Poster URL.
        url: String,
        /// Underlying download error.
        #[source]
        source: anyhow::Error,
    },

    /// A content store operation failed.
    #[error("failed to persist movie")]
    Persistence(#[source] anyhow::Error),
}

impl ImportError {
    /// Renders the error with its full cause chain on one line.
    #[must_use]
    pub fn reason(&self) -> String {
        let source = match self {
            Self::AssetDownload { source, .. } | Self::Persistence(source) => source,
        };
        format!("{self}: {source:#}")
    }
}

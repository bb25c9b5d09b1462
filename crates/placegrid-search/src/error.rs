use thiserror::Error;

use crate::grid::GridError;

/// Failures of a single provider call.
///
/// These never escape a search: the cell worker logs them and treats the cell
/// as empty.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid provider base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },

    #[error("provider call cancelled")]
    Cancelled,
}

/// The only failures a caller of [`crate::SearchOrchestrator::search`] sees.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("failed to search places: {source}")]
    Upstream {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("search cancelled before all grid cells completed")]
    Cancelled,
}

impl SearchError {
    pub fn upstream(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Upstream {
            source: source.into(),
        }
    }
}

impl From<GridError> for SearchError {
    fn from(err: GridError) -> Self {
        Self::upstream(err)
    }
}

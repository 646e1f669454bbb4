use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    #[error("HTTP error fetching {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

impl FetchError {
    /// The URL the failing request was made against, when known.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        match self {
            FetchError::Http { url, .. } | FetchError::UnexpectedStatus { url, .. } => {
                Some(url.as_str())
            }
            FetchError::ClientBuild(_) | FetchError::Deserialize { .. } => None,
        }
    }
}

use paintsync_core::{sku_count, CatalogEnvelope, CatalogSource};
use reqwest::Client;

use crate::decode::decode_catalog;
use crate::error::FetchError;

pub const DEFAULT_USER_AGENT: &str = "paintsync/0.1 (catalog-sync)";

/// HTTP client for vendor catalog endpoints.
///
/// Each source is fetched with a single GET. There is no retry and no request
/// timeout: a failure is returned to the caller immediately, and a hung
/// endpoint blocks until the connection is closed by the peer.
#[derive(Clone)]
pub struct CatalogClient {
    client: Client,
}

impl CatalogClient {
    /// Creates a `CatalogClient` sending the given `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::ClientBuild`] if the underlying `reqwest::Client`
    /// cannot be constructed (e.g., invalid TLS config).
    pub fn new(user_agent: &str) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(FetchError::ClientBuild)?;
        Ok(Self { client })
    }

    /// Fetches and decodes one catalog document.
    ///
    /// # Errors
    ///
    /// - [`FetchError::Http`] on a connection, TLS, or body read failure.
    /// - [`FetchError::UnexpectedStatus`] on any non-2xx status.
    /// - [`FetchError::Deserialize`] if the body is not an envelope or envelope array.
    pub async fn fetch_catalog(&self, url: &str) -> Result<Vec<CatalogEnvelope>, FetchError> {
        let http_err = |source| FetchError::Http {
            url: url.to_owned(),
            source,
        };

        let response = self.client.get(url).send().await.map_err(http_err)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        let body = response.text().await.map_err(http_err)?;
        decode_catalog(&body).map_err(|e| FetchError::Deserialize {
            context: format!("catalog from {url}"),
            source: e,
        })
    }

    /// Fetches every source in order, appending their envelopes into one
    /// sequence.
    ///
    /// Fail-fast: the first failing source aborts the loop and later sources
    /// are never requested.
    ///
    /// # Errors
    ///
    /// Propagates the first error from [`Self::fetch_catalog`].
    pub async fn fetch_all(
        &self,
        sources: &[CatalogSource],
    ) -> Result<Vec<CatalogEnvelope>, FetchError> {
        let mut envelopes: Vec<CatalogEnvelope> = Vec::new();

        for source in sources {
            tracing::info!(source = %source.name, url = %source.url, "fetching catalog");

            let fetched = match self.fetch_catalog(&source.url).await {
                Ok(fetched) => fetched,
                Err(e) => {
                    tracing::error!(source = %source.name, error = %e, "catalog fetch failed");
                    return Err(e);
                }
            };

            tracing::debug!(
                source = %source.name,
                envelopes = fetched.len(),
                skus = sku_count(&fetched),
                "catalog decoded"
            );
            envelopes.extend(fetched);
        }

        Ok(envelopes)
    }
}

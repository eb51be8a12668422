// SPDX-License-Identifier: GPL-3.0-or-later

use crate::error::{CatalogError, Result};
use crate::models::{Credential, SearchResponse, SearchResult};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, trace, warn};
use url::Url;

const TOKEN_BASE_URL: &str = "https://accounts.spotify.com";
const API_BASE_URL: &str = "https://api.spotify.com";
const USER_AGENT: &str = concat!(
    "Staccato/",
    env!("CARGO_PKG_VERSION"),
    " ( https://github.com/staccato-app/staccato )"
);

/// Catalog search abstraction the coordinator drives.
///
/// Implemented by [`CatalogClient`]; test doubles implement it to script
/// outcomes without a network.
#[async_trait]
pub trait CatalogSearcher: Send + Sync {
    /// Run the full authenticate-then-search chain for one query.
    ///
    /// `Ok(None)` means the precondition check rejected the call (blank
    /// query); it is not a fault.
    async fn search_artists(&self, query: &str) -> Result<Option<SearchResult>>;
}

/// Client for the token-authenticated catalog search API.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    client: Client,
    token_base_url: String,
    api_base_url: String,
    client_id: String,
    client_secret: String,
}

impl CatalogClient {
    /// Create a client with default endpoints and the given credential pair.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Result<Self> {
        Self::builder().credentials(client_id, client_secret).build()
    }

    /// Create a client builder for custom configuration.
    pub fn builder() -> CatalogClientBuilder {
        CatalogClientBuilder::default()
    }

    /// Perform the client-credentials exchange and return a fresh bearer
    /// credential.
    ///
    /// A transport failure or a non-2xx status stops the chain; no search is
    /// attempted with a failed exchange.
    pub async fn authenticate(&self) -> Result<Credential> {
        let url = format!("{}/api/token", self.token_base_url);
        trace!(target: "catalog", "POST {}", url);

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        let status = response.status();
        debug!(target: "catalog", "token endpoint status: {}", status);

        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(CatalogError::Auth {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            CatalogError::MalformedResponse(format!("failed to parse token response: {e}"))
        })
    }

    /// Search the artist catalog with an already obtained credential.
    ///
    /// An empty query or an empty credential is a precondition no-op
    /// (`Ok(None)`), not a fault. A non-2xx search status is reported but
    /// the body is still parsed if one came back; only a parse failure is an
    /// error.
    pub async fn search(&self, query: &str, credential: &Credential) -> Result<Option<SearchResult>> {
        let query = query.trim();
        if query.is_empty() || credential.is_empty() {
            return Ok(None);
        }

        let mut url = Url::parse(&format!("{}/v1/search", self.api_base_url))
            .map_err(|e| CatalogError::MalformedResponse(e.to_string()))?;

        // Form-urlencoded pair serialization: spaces become `+`, everything
        // else percent-encodes, so the query string never carries a raw space.
        url.query_pairs_mut()
            .append_pair("type", "artist")
            .append_pair("q", query);

        trace!(target: "catalog", "GET {}", url);

        let response = self
            .client
            .get(url.as_str())
            .bearer_auth(&credential.access_token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(target: "catalog", "search returned status {}", status);
        }

        let body = response.text().await?;
        let parsed: SearchResponse = serde_json::from_str(&body).map_err(|e| {
            CatalogError::MalformedResponse(format!("failed to parse search response: {e}"))
        })?;

        Ok(Some(parsed.into()))
    }

    /// The one-call chain: authenticate, then search with the fresh
    /// credential.
    pub async fn search_artists(&self, query: &str) -> Result<Option<SearchResult>> {
        if query.trim().is_empty() {
            // Skip the token round trip for blank input.
            return Ok(None);
        }

        let credential = self.authenticate().await?;
        self.search(query, &credential).await
    }
}

#[async_trait]
impl CatalogSearcher for CatalogClient {
    async fn search_artists(&self, query: &str) -> Result<Option<SearchResult>> {
        CatalogClient::search_artists(self, query).await
    }
}

/// Builder for configuring a catalog client.
#[derive(Debug)]
pub struct CatalogClientBuilder {
    token_base_url: String,
    api_base_url: String,
    timeout: Duration,
    client_id: String,
    client_secret: String,
}

impl Default for CatalogClientBuilder {
    fn default() -> Self {
        Self {
            token_base_url: TOKEN_BASE_URL.to_string(),
            api_base_url: API_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            client_id: String::new(),
            client_secret: String::new(),
        }
    }
}

impl CatalogClientBuilder {
    /// Set the client-id/secret pair used for the token exchange.
    pub fn credentials(
        mut self,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        self.client_id = client_id.into();
        self.client_secret = client_secret.into();
        self
    }

    /// Set a custom token endpoint base URL (useful for testing with mock servers).
    pub fn token_base_url(mut self, url: impl Into<String>) -> Self {
        self.token_base_url = url.into();
        self
    }

    /// Set a custom API base URL (useful for testing with mock servers).
    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Set request timeout duration.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the catalog client.
    pub fn build(self) -> Result<CatalogClient> {
        let client = Client::builder()
            .timeout(self.timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(CatalogClient {
            client,
            token_base_url: self.token_base_url.trim_end_matches('/').to_string(),
            api_base_url: self.api_base_url.trim_end_matches('/').to_string(),
            client_id: self.client_id,
            client_secret: self.client_secret,
        })
    }
}

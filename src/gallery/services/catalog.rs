//! # Catalog Service
//!
//! Executes facet-listing and object-search requests against the remote
//! catalog and decodes the responses into gallery models.

use crate::config::CatalogProfile;
use crate::gallery::models::{
    FacetKind, FacetListing, FacetOption, ObjectListing, SearchRequest, SearchResult,
};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::fmt;
use url::Url;

/// Broad category of a failed catalog request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The request could not complete
    Network,
    /// The response was not in the expected shape
    Decode,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Network => f.write_str("network failure"),
            FailureKind::Decode => f.write_str("unexpected response"),
        }
    }
}

/// Errors produced by catalog requests
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("invalid catalog server URL '{0}'")]
    InvalidServer(String),

    #[error("request to {endpoint} failed: {source}")]
    Network {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} returned HTTP {status}")]
    Status { endpoint: String, status: u16 },

    #[error("could not decode response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
}

impl CatalogError {
    pub fn kind(&self) -> FailureKind {
        match self {
            CatalogError::Decode { .. } => FailureKind::Decode,
            _ => FailureKind::Network,
        }
    }
}

/// Read-only access to the remote catalog
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// List every known value of a facet
    async fn facet_options(&self, kind: FacetKind) -> Result<Vec<FacetOption>, CatalogError>;

    /// Fetch one page of objects matching the request
    async fn search(&self, request: &SearchRequest) -> Result<SearchResult, CatalogError>;
}

/// Catalog client backed by reqwest
#[derive(Debug, Clone)]
pub struct HttpCatalogClient {
    client: reqwest::Client,
    server: Url,
    api_key: Option<String>,
}

impl HttpCatalogClient {
    /// Create a client from a connection profile
    pub fn new(profile: &CatalogProfile) -> Result<Self, CatalogError> {
        tracing::debug!("Creating catalog client for {}", profile.server());

        let mut builder = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = profile.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(CatalogError::Client)?;

        let server = profile.server().clone();
        if server.cannot_be_a_base() {
            return Err(CatalogError::InvalidServer(server.to_string()));
        }

        Ok(Self {
            client,
            server,
            api_key: profile.api_key().map(str::to_string),
        })
    }

    /// URL of an endpoint below the server root, with the API key attached
    fn endpoint(&self, name: &str) -> Result<Url, CatalogError> {
        let mut url = self.server.clone();
        url.path_segments_mut()
            .map_err(|_| CatalogError::InvalidServer(self.server.to_string()))?
            .pop_if_empty()
            .push(name);
        url.set_query(None);
        if let Some(key) = &self.api_key {
            url.query_pairs_mut().append_pair("apikey", key);
        }
        Ok(url)
    }

    pub fn facet_url(&self, kind: FacetKind) -> Result<Url, CatalogError> {
        self.endpoint(kind.name())
    }

    pub fn search_url(&self, request: &SearchRequest) -> Result<Url, CatalogError> {
        let mut url = self.endpoint("object")?;
        {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in request.query_pairs() {
                pairs.append_pair(name, &value);
            }
        }
        Ok(url)
    }

    /// GET a URL and decode its JSON body
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, CatalogError> {
        // Never log or report the query string, it carries the API key
        let endpoint = url.path().to_string();
        tracing::debug!("GET {}", endpoint);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| CatalogError::Network {
                endpoint: endpoint.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status {
                endpoint,
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|source| CatalogError::Network {
                endpoint: endpoint.clone(),
                source,
            })?;
        tracing::trace!("{} returned {} bytes", endpoint, body.len());

        serde_json::from_str(&body).map_err(|source| CatalogError::Decode { endpoint, source })
    }
}

#[async_trait]
impl CatalogClient for HttpCatalogClient {
    async fn facet_options(&self, kind: FacetKind) -> Result<Vec<FacetOption>, CatalogError> {
        let listing: FacetListing = self.get_json(self.facet_url(kind)?).await?;
        tracing::debug!("Loaded {} {} options", listing.records.len(), kind);
        Ok(listing.records)
    }

    async fn search(&self, request: &SearchRequest) -> Result<SearchResult, CatalogError> {
        let listing: ObjectListing = self.get_json(self.search_url(request)?).await?;
        Ok(SearchResult::from(listing))
    }
}

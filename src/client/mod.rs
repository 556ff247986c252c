//! Remote search client
//!
//! One call, one request: [`SearchBackend::search`] turns a [`QueryParams`]
//! into a paginated request and returns the page exactly as the service
//! reported it. There is no caching and no retry; the session decides what
//! to do with failures.

pub mod error;

pub use error::FetchError;

use crate::Post;
use crate::query::{QueryParams, SearchResult};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Endpoint used when no configuration overrides it
pub const DEFAULT_ENDPOINT: &str = "https://dummyjson.com/posts/search";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
const ERROR_DETAIL_LIMIT: usize = 200;

/// Anything that can answer a paginated post search
///
/// The session holds its backend behind an `Arc<dyn SearchBackend>`, so test
/// doubles and alternative transports plug in here.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Fetch the page described by `params`
    ///
    /// # Errors
    ///
    /// Returns `FetchError` on transport failure, non-success status, or a
    /// body that does not decode into posts and a total.
    async fn search(&self, params: &QueryParams) -> Result<SearchResult, FetchError>;
}

/// Wire shape of the search endpoint's response
#[derive(Debug, Deserialize)]
struct SearchResponse {
    posts: Vec<Post>,
    total: u64,
}

/// HTTP implementation of [`SearchBackend`]
#[derive(Clone, Debug)]
pub struct HttpSearchClient {
    http: reqwest::Client,
    endpoint: Url,
}

impl HttpSearchClient {
    /// Create a client for `endpoint` with the given request timeout
    ///
    /// # Errors
    ///
    /// Returns `FetchError::InvalidEndpoint` if `endpoint` is not an absolute
    /// URL, or `FetchError::Transport` if the HTTP client cannot be built.
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, FetchError> {
        let endpoint = Url::parse(endpoint).map_err(|e| FetchError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
        })?;
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Transport(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { http, endpoint })
    }

    /// Create a client for the default endpoint
    ///
    /// # Errors
    ///
    /// Returns `FetchError` if the HTTP client cannot be built.
    pub fn with_defaults() -> Result<Self, FetchError> {
        Self::new(DEFAULT_ENDPOINT, DEFAULT_TIMEOUT)
    }

    /// The endpoint requests are sent to
    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Build the request URL for `params`: `q`, `skip` and `limit`
    #[must_use]
    pub fn request_url(&self, params: &QueryParams) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("q", params.text())
            .append_pair("skip", &params.skip().to_string())
            .append_pair("limit", &params.page_size().to_string());
        url
    }
}

#[async_trait]
impl SearchBackend for HttpSearchClient {
    async fn search(&self, params: &QueryParams) -> Result<SearchResult, FetchError> {
        let url = self.request_url(params);
        debug!(url = %url, "Sending search request");

        let resp = self.http.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let detail: String = body.trim().chars().take(ERROR_DETAIL_LIMIT).collect();
            warn!(status = status.as_u16(), "Search request rejected");
            return Err(FetchError::Status {
                status: status.as_u16(),
                detail,
            });
        }

        let body: SearchResponse = resp.json().await?;
        debug!(
            posts = body.posts.len(),
            total = body.total,
            "Search response received"
        );
        Ok(SearchResult::new(body.posts, body.total))
    }
}

//! Query state and response sequencing
//!
//! `QueryState` is the single owner of the canonical parameters and of the
//! last accepted result. Intents (`set_text`, `set_tags`, `set_page`,
//! `submit`) only change parameters and report how the refetch should be
//! scheduled; the session then calls [`QueryState::begin_fetch`] and later
//! [`QueryState::complete`] with whatever the backend returned.
//!
//! # Ordering
//!
//! ```text
//! begin_fetch() → token 1 ──────────────┐ (slow)
//! begin_fetch() → token 2 ───┐          │
//!                            ▼          ▼
//!              complete(2) Applied   complete(1) Stale
//! ```
//!
//! Every fetch gets a fresh, monotonically increasing [`RequestToken`]. Only
//! the most recently issued token may write state; anything else is stale
//! and dropped, whatever order the responses arrive in.

use super::error::QueryError;
use super::params::{QueryParams, TagSelection};
use crate::Post;
use crate::client::FetchError;
use crate::search::{TagFilterExt, derive_tags};
use tracing::{debug, warn};

/// Records and total from one successful response
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResult {
    pub records: Vec<Post>,
    pub total: u64,
}

impl SearchResult {
    /// Create a new result
    #[must_use]
    pub const fn new(records: Vec<Post>, total: u64) -> Self {
        Self { records, total }
    }
}

/// Identifies one issued fetch; later tokens compare greater
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    /// Raw sequence number
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// How an intent wants its refetch scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refetch {
    /// Wait for input to settle
    Debounced,
    /// Fetch right away
    Immediate,
}

/// What [`QueryState::complete`] did with a response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Success from the latest request; result replaced
    Applied,
    /// Failure from the latest request; error recorded
    Failed,
    /// Response to a superseded request; ignored
    Stale,
}

#[derive(Debug, Clone)]
struct PendingFetch {
    token: RequestToken,
    params: QueryParams,
}

/// Canonical parameters, last result, and fetch bookkeeping
#[derive(Debug, Clone, Default)]
pub struct QueryState {
    params: QueryParams,
    result: SearchResult,
    tag_options: Vec<String>,
    loading: bool,
    error: Option<String>,
    pending: Option<PendingFetch>,
    issued: u64,
    completed: u64,
}

impl QueryState {
    /// Fresh state seeded with `params`
    #[must_use]
    pub fn new(params: QueryParams) -> Self {
        Self {
            params,
            ..Self::default()
        }
    }

    /// Current parameters
    #[must_use]
    pub const fn params(&self) -> &QueryParams {
        &self.params
    }

    /// Last accepted result
    #[must_use]
    pub const fn result(&self) -> &SearchResult {
        &self.result
    }

    /// Tags found on the current page, first-seen order
    #[must_use]
    pub fn tag_options(&self) -> &[String] {
        &self.tag_options
    }

    /// Whether the latest issued fetch is still outstanding
    #[must_use]
    pub const fn loading(&self) -> bool {
        self.loading
    }

    /// User-facing message of the last failed fetch, cleared on success
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Number of fetches whose outcome was applied (success or failure)
    #[must_use]
    pub const fn completed_requests(&self) -> u64 {
        self.completed
    }

    /// Replace the search text; back to page 1
    pub fn set_text(&mut self, text: impl Into<String>) -> Refetch {
        self.params = self.params.with_text(text);
        Refetch::Debounced
    }

    /// Replace the tag selection; back to page 1
    pub fn set_tags<I, S>(&mut self, tags: I) -> Refetch
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.params = self.params.with_tags(tags);
        Refetch::Immediate
    }

    /// Replace pagination only
    ///
    /// # Errors
    ///
    /// Returns `QueryError` if `page` or `page_size` is zero; the current
    /// parameters are left as they were.
    pub fn set_page(&mut self, page: u32, page_size: u32) -> Result<Refetch, QueryError> {
        self.params = self.params.with_page(page, page_size)?;
        Ok(Refetch::Immediate)
    }

    /// Commit the current text: back to page 1, fetch now
    pub fn submit(&mut self) -> Refetch {
        self.params = self.params.with_first_page();
        Refetch::Immediate
    }

    /// Issue a new request token for the current parameters
    ///
    /// Any earlier outstanding request becomes stale.
    pub fn begin_fetch(&mut self) -> (RequestToken, QueryParams) {
        self.issued += 1;
        let token = RequestToken(self.issued);
        if let Some(prev) = &self.pending {
            debug!(superseded = prev.token.get(), token = token.get(), "Superseding in-flight fetch");
        }
        self.pending = Some(PendingFetch {
            token,
            params: self.params.clone(),
        });
        self.loading = true;
        (token, self.params.clone())
    }

    /// Apply the outcome of the fetch identified by `token`
    ///
    /// Only the latest issued token is accepted. On success the result is
    /// replaced wholesale and the tag options recomputed; on failure the
    /// previous records stay as they were and `error` carries the message.
    pub fn complete(
        &mut self,
        token: RequestToken,
        outcome: Result<SearchResult, FetchError>,
    ) -> Completion {
        let Some(pending) = self.pending.take_if(|p| p.token == token) else {
            debug!(token = token.get(), latest = self.issued, "Discarding stale response");
            return Completion::Stale;
        };

        self.loading = false;
        self.completed += 1;

        match outcome {
            Ok(mut result) => {
                let limit = pending.params.page_size() as usize;
                if result.records.len() > limit {
                    warn!(
                        received = result.records.len(),
                        limit,
                        "Service returned more records than requested; truncating"
                    );
                    result.records.truncate(limit);
                }
                self.tag_options = derive_tags(&result.records);
                self.result = result;
                self.error = None;
                Completion::Applied
            }
            Err(e) => {
                warn!(token = token.get(), error = %e, "Search failed");
                self.error = Some(e.to_string());
                Completion::Failed
            }
        }
    }

    /// Records of the current page that pass the tag selection
    #[must_use]
    pub fn visible_rows(&self) -> Vec<&Post> {
        self.result.records.with_all_tags(self.params.tags()).collect()
    }

    /// Selected tags
    #[must_use]
    pub const fn selected_tags(&self) -> &TagSelection {
        self.params.tags()
    }

    /// Number of pages the server total spans, at least one
    #[must_use]
    pub const fn page_count(&self) -> u64 {
        let pages = self.result.total.div_ceil(self.params.page_size() as u64);
        if pages == 0 { 1 } else { pages }
    }
}

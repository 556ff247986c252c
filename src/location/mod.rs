//! Location (URL) synchronisation
//!
//! The location is the shareable form of a query. It is read once when a
//! session starts, to seed the initial parameters, and rewritten every time a
//! fetch is issued so it always names the committed query.
//!
//! # Format
//!
//! ```text
//! page=2&search=love&tags=history%2Bcrime
//! ```
//!
//! `page` is always written. `search` and `tags` are omitted when empty.
//! Tags are joined with `+` before form encoding; when reading, both the
//! encoded `%2B` and a bare `+` (which form decoding turns into a space) are
//! accepted as delimiters.

pub mod error;

pub use error::LocationError;

use crate::query::{QueryError, QueryParams};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::warn;
use url::form_urlencoded;

const TAG_DELIMITER: char = '+';
const TAG_JOIN: &str = "+";

/// Query parameters as they appear in the location
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationState {
    pub page: Option<u32>,
    pub search: String,
    pub tags: Vec<String>,
}

impl LocationState {
    /// Location view of `params`
    #[must_use]
    pub fn from_params(params: &QueryParams) -> Self {
        Self {
            page: Some(params.page()),
            search: params.text().to_string(),
            tags: params.tags().iter().cloned().collect(),
        }
    }

    /// Parse a query string, with or without the leading `?`
    ///
    /// Unknown keys are ignored. A repeated key keeps its last value.
    ///
    /// # Errors
    ///
    /// Returns `LocationError::InvalidPage` if `page` is present but not an
    /// integer of at least 1.
    pub fn parse(query: &str) -> Result<Self, LocationError> {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut state = Self::default();

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "page" => {
                    let page = value
                        .trim()
                        .parse::<u32>()
                        .ok()
                        .filter(|p| *p >= 1)
                        .ok_or_else(|| LocationError::InvalidPage(value.to_string()))?;
                    state.page = Some(page);
                }
                "search" => state.search = value.into_owned(),
                "tags" => {
                    state.tags = value
                        .split([TAG_DELIMITER, ' '])
                        .filter(|t| !t.is_empty())
                        .map(str::to_string)
                        .collect();
                }
                _ => {}
            }
        }
        Ok(state)
    }

    /// Render as a query string without the leading `?`
    #[must_use]
    pub fn to_query_string(&self) -> String {
        let mut out = form_urlencoded::Serializer::new(String::new());
        out.append_pair("page", &self.page.unwrap_or(1).to_string());
        if !self.search.is_empty() {
            out.append_pair("search", &self.search);
        }
        if !self.tags.is_empty() {
            let joined = self.tags.join(TAG_JOIN);
            out.append_pair("tags", &joined);
        }
        out.finish()
    }

    /// Overlay this location onto `base`, keeping its page size
    ///
    /// # Errors
    ///
    /// Returns `QueryError` if the resulting page is invalid.
    pub fn apply_to(&self, base: &QueryParams) -> Result<QueryParams, QueryError> {
        base.with_text(self.search.clone())
            .with_tags(self.tags.iter().cloned())
            .with_page(self.page.unwrap_or(1), base.page_size())
    }
}

/// Seed parameters from a location query string
///
/// Anything that does not parse is logged and replaced by `defaults`.
#[must_use]
pub fn restore(query: &str, defaults: &QueryParams) -> QueryParams {
    let parsed = LocationState::parse(query)
        .map_err(crate::PostrError::from)
        .and_then(|state| state.apply_to(defaults).map_err(crate::PostrError::from));

    match parsed {
        Ok(params) => params,
        Err(e) => {
            warn!(query, error = %e, "Ignoring unusable location state");
            defaults.clone()
        }
    }
}

/// Navigable location the session reads from and writes to
pub trait Location: Send {
    /// Current query string, without the leading `?`
    fn read(&self) -> String;

    /// Replace the query string
    fn replace(&mut self, query: String);
}

#[derive(Debug, Default)]
struct MemoryLocationInner {
    current: String,
    writes: Vec<String>,
}

/// In-process [`Location`]; clones share the same state
#[derive(Debug, Clone, Default)]
pub struct MemoryLocation {
    inner: Arc<Mutex<MemoryLocationInner>>,
}

impl MemoryLocation {
    /// Location starting at `query`
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(MemoryLocationInner {
                current: query.into(),
                writes: Vec::new(),
            })),
        }
    }

    /// Every query string written so far, oldest first
    #[must_use]
    pub fn writes(&self) -> Vec<String> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .writes
            .clone()
    }

    /// Current location parsed back into its parts
    ///
    /// # Errors
    ///
    /// Returns `LocationError` if the stored query is malformed.
    pub fn state(&self) -> Result<LocationState, LocationError> {
        LocationState::parse(&self.read())
    }
}

impl Location for MemoryLocation {
    fn read(&self) -> String {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .current
            .clone()
    }

    fn replace(&mut self, query: String) {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.writes.push(query.clone());
        inner.current = query;
    }
}

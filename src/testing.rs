//! Testing utilities for postr
//!
//! This module provides post fixtures and a scripted in-memory
//! [`SearchBackend`] for exercising the session without a network.
//!
//! Only available when compiled with `cfg(test)`.

use crate::Post;
use crate::client::{FetchError, SearchBackend};
use crate::query::{QueryParams, SearchResult};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

/// Build a post whose title and body are both `body`
pub fn post(id: u64, body: &str, tags: &[&str]) -> Post {
    Post::new(
        id,
        body.to_string(),
        body.to_string(),
        tags.iter().map(ToString::to_string).collect(),
    )
}

/// A small corpus with overlapping tags
pub fn sample_posts() -> Vec<Post> {
    vec![
        post(1, "His mother had always taught him", &["history", "american", "crime"]),
        post(2, "He was an expert but not in a discipline", &["french", "fiction", "english"]),
        post(3, "Dave watched as the forest burned up on the hill", &["magical", "history", "french"]),
        post(4, "All he wanted was a candy bar", &["mystery", "english", "american"]),
        post(5, "Hopes and dreams were dashed that day", &["crime", "mystery", "love"]),
    ]
}

/// In-memory search backend with scripted latency and failures
///
/// Matches the search text case-insensitively against title and body, then
/// applies `skip`/`limit` the way the remote service does.
#[derive(Debug, Default)]
pub struct MockBackend {
    corpus: Vec<Post>,
    latency: HashMap<String, Duration>,
    failing: HashSet<String>,
    calls: Mutex<Vec<QueryParams>>,
}

impl MockBackend {
    /// Backend serving `corpus`
    pub fn new(corpus: Vec<Post>) -> Self {
        Self {
            corpus,
            ..Self::default()
        }
    }

    /// Delay responses for `text` by `delay`
    #[must_use]
    pub fn with_latency(mut self, text: &str, delay: Duration) -> Self {
        self.latency.insert(text.to_string(), delay);
        self
    }

    /// Fail every request for `text` with a transport error
    #[must_use]
    pub fn failing_on(mut self, text: &str) -> Self {
        self.failing.insert(text.to_string());
        self
    }

    /// Parameters of every request received, oldest first
    pub fn calls(&self) -> Vec<QueryParams> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of requests received
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl SearchBackend for MockBackend {
    async fn search(&self, params: &QueryParams) -> Result<SearchResult, FetchError> {
        self.calls.lock().unwrap().push(params.clone());

        if let Some(delay) = self.latency.get(params.text()) {
            tokio::time::sleep(*delay).await;
        }
        if self.failing.contains(params.text()) {
            return Err(FetchError::Transport("connection refused".to_string()));
        }

        let needle = params.text().to_lowercase();
        let matched: Vec<&Post> = self
            .corpus
            .iter()
            .filter(|p| {
                p.title.to_lowercase().contains(&needle) || p.body.to_lowercase().contains(&needle)
            })
            .collect();
        let total = matched.len() as u64;
        let records = matched
            .into_iter()
            .skip(usize::try_from(params.skip()).unwrap_or(usize::MAX))
            .take(params.page_size() as usize)
            .cloned()
            .collect();

        Ok(SearchResult::new(records, total))
    }
}

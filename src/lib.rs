//! Postr - search, tag-filter and page through a remote post collection
//!
//! This library provides the query/state controller that sits between user
//! input and a paginated remote search endpoint: debounced refetches,
//! last-issued-wins response ordering, client-side tag filtering and
//! location (URL) synchronisation. Rendering is left to a [`view::TableRenderer`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod client;
pub mod config;
pub mod debounce;
pub mod location;
pub mod logging;
pub mod query;
pub mod search;
pub mod session;
pub mod view;

#[cfg(test)]
pub mod testing;

pub use client::{FetchError, HttpSearchClient, SearchBackend};
pub use query::{QueryParams, QueryState, SearchResult};
pub use session::{SearchHandle, SearchSession, SessionSettings, ViewSnapshot};

/// Error enum, contains all failure states of the library
#[derive(Debug, Error)]
pub enum PostrError {
    /// Remote search failed
    #[error("Fetch error: {0}")]
    FetchError(#[from] client::FetchError),
    /// Query parameters were rejected
    #[error("Query error: {0}")]
    QueryError(#[from] query::QueryError),
    /// Location state could not be parsed
    #[error("Location error: {0}")]
    LocationError(#[from] location::LocationError),
    /// Search session is gone
    #[error("Session error: {0}")]
    SessionError(#[from] session::SessionError),
    /// Represents a configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] ::config::ConfigError),
}

/// A single searchable record as served by the remote collection
///
/// Posts are read-only on the client; `id` is the identity.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Post {
    pub id: u64,
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Post {
    /// Create a new Post
    #[must_use]
    pub const fn new(id: u64, title: String, body: String, tags: Vec<String>) -> Self {
        Self {
            id,
            title,
            body,
            tags,
        }
    }

    /// Whether this post carries `tag` (case-sensitive)
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_ignores_unknown_fields() {
        let json = r#"{
            "id": 3,
            "title": "T",
            "body": "b",
            "tags": ["x"],
            "reactions": {"likes": 3, "dislikes": 0},
            "views": 10,
            "userId": 7
        }"#;
        let post: Post = serde_json::from_str(json).unwrap();
        assert_eq!(post, Post::new(3, "T".into(), "b".into(), vec!["x".into()]));
    }

    #[test]
    fn test_post_missing_tags_defaults_empty() {
        let post: Post = serde_json::from_str(r#"{"id":1,"title":"a","body":"b"}"#).unwrap();
        assert!(post.tags.is_empty());
    }

    #[test]
    fn test_has_tag_is_case_sensitive() {
        let post = Post::new(1, "t".into(), "b".into(), vec!["Rust".into()]);
        assert!(post.has_tag("Rust"));
        assert!(!post.has_tag("rust"));
    }

    #[test]
    fn test_error_conversion() {
        let err: PostrError = query::QueryError::InvalidPage(0).into();
        assert!(err.to_string().starts_with("Query error"));
    }
}

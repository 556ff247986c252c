//! Remote search error types
//!
//! `FetchError` is the only error the remote search path produces. Its
//! `Display` output is what the user sees in place of the result table, so
//! every variant renders as a short human-readable sentence.

use thiserror::Error;

/// Failure of a single search request
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// The request never produced a response (connect, timeout, I/O)
    #[error("Failed to fetch data: {0}")]
    Transport(String),

    /// The service answered with a non-success status
    #[error("Failed to fetch data: server responded with {status}{}", detail_suffix(.detail))]
    Status { status: u16, detail: String },

    /// The response body was not a valid search result
    #[error("Failed to read search results: {0}")]
    Decode(String),

    /// The configured endpoint is not a usable URL
    #[error("Invalid search endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },
}

fn detail_suffix(detail: &str) -> String {
    if detail.is_empty() {
        String::new()
    } else {
        format!(" ({detail})")
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            Self::Status {
                status: status.as_u16(),
                detail: String::new(),
            }
        } else {
            Self::Transport(err.to_string())
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod error_tests;

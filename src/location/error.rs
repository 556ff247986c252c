//! Location parsing error types

use thiserror::Error;

/// Location state that cannot be turned into query parameters
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LocationError {
    /// `page` is not a positive integer
    #[error("Invalid page '{0}' in location")]
    InvalidPage(String),
}

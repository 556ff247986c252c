//! Query parameter error types

use thiserror::Error;

/// Rejected query parameters
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QueryError {
    /// Pages are numbered from 1
    #[error("Invalid page {0}: pages start at 1")]
    InvalidPage(u32),

    /// A page must hold at least one record
    #[error("Invalid page size {0}: must be greater than zero")]
    InvalidPageSize(u32),
}

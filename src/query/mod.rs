//! Query parameters and the state that owns them
//!
//! - `params`: immutable [`QueryParams`] values
//! - `state`: [`QueryState`], the intent operations and response sequencing
//! - `error`: [`QueryError`] for rejected pagination

pub mod error;
pub mod params;
pub mod state;

pub use error::QueryError;
pub use params::{DEFAULT_PAGE_SIZE, QueryParams, TagSelection, check_pagination};
pub use state::{Completion, QueryState, Refetch, RequestToken, SearchResult};

//! In-memory derivations over a fetched page
//!
//! Provides the pieces that turn a page of posts into what the user sees:
//! 1. Tag options gathered from the page (`tags`)
//! 2. The AND tag filter applied on top of the server search (`filter`)
//! 3. Query highlighting of body text (`highlight`)

pub mod filter;
pub mod highlight;
pub mod tags;

pub use filter::{TagFilterExt, Tagged};
pub use highlight::{Segment, highlight};
pub use tags::derive_tags;

//! Tag options derived from the current result page

use crate::Post;
use std::collections::HashSet;

/// Distinct tags across `records`, in first-seen order
///
/// Equality is case-sensitive and tags are not normalized. Only the records
/// passed in contribute, so the options follow the page being displayed.
#[must_use]
pub fn derive_tags(records: &[Post]) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    records
        .iter()
        .flat_map(|post| post.tags.iter())
        .filter(|tag| seen.insert(tag.as_str()))
        .cloned()
        .collect()
}

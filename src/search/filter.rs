//! Client-side tag filtering of a fetched page
//!
//! The server only knows about the search text; the tag selection is applied
//! here, after the page has arrived. Selection uses AND semantics: a post is
//! kept only when it carries every selected tag.
//!
//! # Iterator Adapters
//!
//! [`TagFilterExt`] adds the same filter to any slice of [`Tagged`] items:
//!
//! ```ignore
//! use postr::search::filter::TagFilterExt;
//!
//! let visible: Vec<_> = records.with_all_tags(params.tags()).collect();
//! ```

use crate::Post;
use crate::query::TagSelection;

/// Types that expose a tag list for filtering
pub trait Tagged {
    /// Tags attached to this item
    fn tags(&self) -> &[String];
}

impl Tagged for Post {
    fn tags(&self) -> &[String] {
        &self.tags
    }
}

/// Whether `item` carries every tag in `selected`
///
/// An empty selection matches everything.
#[must_use]
pub fn matches_all<T: Tagged + ?Sized>(item: &T, selected: &TagSelection) -> bool {
    let tags = item.tags();
    selected.iter().all(|wanted| tags.contains(wanted))
}

/// Extension trait for AND-filtering slices of tagged items
pub trait TagFilterExt<T: Tagged> {
    /// Iterate over the items carrying every selected tag, order preserved
    fn with_all_tags<'a>(&'a self, selected: &'a TagSelection) -> impl Iterator<Item = &'a T> + 'a
    where
        T: 'a;
}

impl<T: Tagged> TagFilterExt<T> for [T] {
    fn with_all_tags<'a>(&'a self, selected: &'a TagSelection) -> impl Iterator<Item = &'a T> + 'a
    where
        T: 'a,
    {
        self.iter().filter(move |item| matches_all(*item, selected))
    }
}

/// Posts from `records` that carry every tag in `selected`
///
/// With an empty selection the records come back unchanged.
#[must_use]
pub fn apply(records: &[Post], selected: &TagSelection) -> Vec<Post> {
    if selected.is_empty() {
        return records.to_vec();
    }
    records.with_all_tags(selected).cloned().collect()
}

//! Canonical search parameters
//!
//! `QueryParams` is an immutable value: every change goes through a `with_*`
//! method that returns a new value, so consumers never observe a half-edited
//! query. Changing the text or the tag selection always lands on page 1.

use super::error::QueryError;
use std::collections::BTreeSet;

/// Page size used when nothing else is configured
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Selected tag filters
pub type TagSelection = BTreeSet<String>;

/// Search text, tag selection and pagination
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParams {
    text: String,
    tags: TagSelection,
    page: u32,
    page_size: u32,
}

impl Default for QueryParams {
    fn default() -> Self {
        Self {
            text: String::new(),
            tags: TagSelection::new(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl QueryParams {
    /// Empty query on page 1 with the given page size
    ///
    /// # Errors
    ///
    /// Returns `QueryError::InvalidPageSize` if `page_size` is zero.
    pub fn new(page_size: u32) -> Result<Self, QueryError> {
        Self::default().with_page(1, page_size)
    }

    /// Search text; empty means "match all"
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Selected tags
    #[must_use]
    pub const fn tags(&self) -> &TagSelection {
        &self.tags
    }

    /// Current page, starting at 1
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Records per page
    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Number of records before the current page
    #[must_use]
    pub const fn skip(&self) -> u64 {
        (self.page as u64 - 1) * self.page_size as u64
    }

    /// Replace the search text and go back to page 1
    #[must_use]
    pub fn with_text(&self, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            page: 1,
            ..self.clone()
        }
    }

    /// Replace the tag selection and go back to page 1
    ///
    /// Empty tag names are dropped; everything else is kept verbatim.
    #[must_use]
    pub fn with_tags<I, S>(&self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tags = tags
            .into_iter()
            .map(Into::into)
            .filter(|t: &String| !t.is_empty())
            .collect();
        Self {
            tags,
            page: 1,
            ..self.clone()
        }
    }

    /// Replace pagination only; text and tags are untouched
    ///
    /// # Errors
    ///
    /// Returns `QueryError` if `page` or `page_size` is zero.
    pub fn with_page(&self, page: u32, page_size: u32) -> Result<Self, QueryError> {
        check_pagination(page, page_size)?;
        Ok(Self {
            page,
            page_size,
            ..self.clone()
        })
    }

    /// Same query, page 1
    #[must_use]
    pub fn with_first_page(&self) -> Self {
        Self {
            page: 1,
            ..self.clone()
        }
    }
}

/// Validate a page number and page size without building params
///
/// # Errors
///
/// Returns `QueryError` if `page` or `page_size` is zero.
pub const fn check_pagination(page: u32, page_size: u32) -> Result<(), QueryError> {
    if page == 0 {
        return Err(QueryError::InvalidPage(page));
    }
    if page_size == 0 {
        return Err(QueryError::InvalidPageSize(page_size));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params() {
        let params = QueryParams::default();
        assert_eq!(params.text(), "");
        assert!(params.tags().is_empty());
        assert_eq!(params.page(), 1);
        assert_eq!(params.page_size(), DEFAULT_PAGE_SIZE);
        assert_eq!(params.skip(), 0);
    }

    #[test]
    fn test_with_text_resets_page() {
        for page in [1, 2, 7, 1000] {
            let params = QueryParams::default().with_page(page, 10).unwrap();
            let next = params.with_text("rust");
            assert_eq!(next.page(), 1);
            assert_eq!(next.text(), "rust");
            assert_eq!(params.page(), page);
        }
    }

    #[test]
    fn test_with_tags_resets_page() {
        let params = QueryParams::default().with_page(4, 10).unwrap();
        let next = params.with_tags(["history", "love"]);
        assert_eq!(next.page(), 1);
        assert_eq!(next.tags().len(), 2);
    }

    #[test]
    fn test_with_tags_drops_empty_names() {
        let params = QueryParams::default().with_tags(["", "x", "x"]);
        assert_eq!(params.tags().iter().collect::<Vec<_>>(), vec!["x"]);
    }

    #[test]
    fn test_with_page_keeps_filters() {
        let params = QueryParams::default().with_text("a").with_tags(["t"]);
        let next = params.with_page(3, 20).unwrap();
        assert_eq!(next.text(), "a");
        assert!(next.tags().contains("t"));
        assert_eq!(next.skip(), 40);
    }

    #[test]
    fn test_with_page_rejects_zero() {
        let params = QueryParams::default();
        assert_eq!(params.with_page(0, 10), Err(QueryError::InvalidPage(0)));
        assert_eq!(params.with_page(1, 0), Err(QueryError::InvalidPageSize(0)));
        assert!(QueryParams::new(0).is_err());
    }

    #[test]
    fn test_skip_does_not_overflow() {
        let params = QueryParams::default().with_page(u32::MAX, u32::MAX).unwrap();
        assert_eq!(params.skip(), (u64::from(u32::MAX) - 1) * u64::from(u32::MAX));
    }
}

//! Match highlighting for body text
//!
//! The query is matched literally and case-insensitively. It is escaped
//! before the matcher is built, so characters such as `(`, `[` or `*` in the
//! user's input never reach the pattern engine as syntax.

use regex::RegexBuilder;
use tracing::warn;

/// A run of body text, either plain or matching the query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Matched(String),
}

impl Segment {
    /// The text of this segment regardless of kind
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Literal(s) | Self::Matched(s) => s,
        }
    }

    /// Whether this segment matched the query
    #[must_use]
    pub const fn is_match(&self) -> bool {
        matches!(self, Self::Matched(_))
    }
}

/// Split `text` into literal and matched segments for `query`
///
/// Matched segments keep the casing found in `text`. An empty query yields
/// the whole text as a single literal segment.
#[must_use]
pub fn highlight(text: &str, query: &str) -> Vec<Segment> {
    if text.is_empty() {
        return Vec::new();
    }
    if query.is_empty() {
        return vec![Segment::Literal(text.to_string())];
    }

    let matcher = match RegexBuilder::new(&regex::escape(query))
        .case_insensitive(true)
        .build()
    {
        Ok(m) => m,
        Err(e) => {
            warn!(error = %e, "Could not build highlight matcher");
            return vec![Segment::Literal(text.to_string())];
        }
    };

    let mut segments = Vec::new();
    let mut last = 0;
    for m in matcher.find_iter(text) {
        if m.start() > last {
            segments.push(Segment::Literal(text[last..m.start()].to_string()));
        }
        segments.push(Segment::Matched(m.as_str().to_string()));
        last = m.end();
    }
    if last < text.len() {
        segments.push(Segment::Literal(text[last..].to_string()));
    }
    segments
}

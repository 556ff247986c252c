//! View model handed to the presentation layer
//!
//! The crate does not draw anything. A [`TableRenderer`] receives column
//! descriptors and row records (or an error message) and is free to render
//! them however it likes.

use crate::search::{Segment, highlight};
use crate::session::ViewSnapshot;

/// Describes one table column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub key: &'static str,
    pub title: &'static str,
}

/// Columns of the post table, in display order
pub const COLUMNS: [Column; 4] = [
    Column { key: "id", title: "ID" },
    Column { key: "title", title: "Title" },
    Column { key: "body", title: "Body" },
    Column { key: "tags", title: "Tags" },
];

/// One displayed post with its body split into highlight segments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub id: u64,
    pub title: String,
    pub body: Vec<Segment>,
    pub tags: Vec<String>,
}

/// Pager state shown under the table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
    pub total: u64,
    pub page_count: u64,
}

/// Presentation collaborator
pub trait TableRenderer {
    /// Draw the table for the current page
    fn render_table(&mut self, columns: &[Column], rows: &[TableRow], pagination: Pagination, loading: bool);

    /// Draw the error display in place of the table and controls
    fn render_error(&mut self, message: &str);
}

/// Rows for `snapshot`, with bodies highlighted against the search text
#[must_use]
pub fn rows(snapshot: &ViewSnapshot) -> Vec<TableRow> {
    let query = snapshot.params.text();
    snapshot
        .rows
        .iter()
        .map(|post| TableRow {
            id: post.id,
            title: post.title.clone(),
            body: highlight(&post.body, query),
            tags: post.tags.clone(),
        })
        .collect()
}

/// Pager state for `snapshot`
#[must_use]
pub const fn pagination(snapshot: &ViewSnapshot) -> Pagination {
    Pagination {
        page: snapshot.params.page(),
        page_size: snapshot.params.page_size(),
        total: snapshot.total,
        page_count: snapshot.page_count,
    }
}

/// Hand `snapshot` to `renderer`: the error display when a fetch failed,
/// the table otherwise
pub fn render<R: TableRenderer + ?Sized>(snapshot: &ViewSnapshot, renderer: &mut R) {
    if let Some(message) = &snapshot.error {
        renderer.render_error(message);
        return;
    }
    renderer.render_table(&COLUMNS, &rows(snapshot), pagination(snapshot), snapshot.loading);
}

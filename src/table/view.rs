//! Display-ready snapshots of a table.
//!
//! A [`TableView`] is computed from a [`TableManager`](super::TableManager) by
//! `view()` and holds nothing but rendered text and flags. It carries no
//! business logic; a renderer walks it top to bottom.
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//! use vuege::table::{Column, TableManager};
//!
//! let rows = vec![json!({ "id": 1, "name": "Tver" })];
//! let table = TableManager::new(rows, vec![Column::new("name", "Name").field("name")]);
//! let view = table.view();
//! assert_eq!(view.rows[0].cells, vec!["Tver".to_string()]);
//! assert!(view.empty_state.is_none());
//! ```

use super::query::{Pagination, SortDirection};
use crate::domain::RowKey;
use serde::Serialize;

/// Complete snapshot of the visible page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableView {
    /// Visible (non-hidden) columns, in column order.
    pub header: Vec<HeaderCell>,

    /// Rows of the current page with formatted cells.
    pub rows: Vec<ViewRow>,

    pub pagination: Pagination,

    /// Header checkbox state.
    pub select_all: bool,
    pub indeterminate: bool,

    /// Active search text, if any.
    pub search: Option<String>,

    /// Message to show instead of rows when the page is empty.
    pub empty_state: Option<String>,

    pub loading: bool,
    pub error: Option<String>,
}

/// One header cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderCell {
    pub key: String,
    pub label: String,
    pub sortable: bool,

    /// Direction indicator when the table is sorted by this column.
    pub sort: Option<SortDirection>,
}

/// One rendered row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewRow {
    pub key: RowKey,

    /// Formatted cells, aligned with [`TableView::header`].
    pub cells: Vec<String>,

    pub is_selected: bool,
    pub is_expanded: bool,
}

/// Summary counters of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableStats {
    /// Rows in the backing set.
    pub total_rows: usize,
    /// Rows on the current page.
    pub visible_rows: usize,
    /// Selected keys, including keys of rows not currently visible.
    pub selected_rows: usize,
    pub expanded_rows: usize,
    pub current_page: usize,
    pub total_pages: usize,
    pub has_filters: bool,
    pub has_search: bool,
    pub has_sort: bool,
    pub is_loading: bool,
    pub has_error: bool,
}

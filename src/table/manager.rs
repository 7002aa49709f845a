//! The table pipeline.
//!
//! [`TableManager`] owns a backing row set and the view state (search, filters,
//! sort, pagination) and keeps the visible page up to date.
//!
//! # Architecture
//!
//! Every mutator that can change what is visible ends by calling
//! [`TableManager::recompute`], which runs the fixed pipeline:
//!
//! 1. Start from the full backing set.
//! 2. Keep rows where a searchable column matches the search text.
//! 3. Keep rows that satisfy every filter.
//! 4. Stable-sort by the sort key, if any.
//! 5. Store the surviving row count in `pagination.total`.
//! 6. Slice out the current page.
//!
//! The result is cached as row indices, so [`TableManager::page`] and the other
//! readers never mutate state.
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//! use vuege::table::{Column, FilterConfig, TableManager};
//!
//! let rows = vec![
//!     json!({ "id": 1, "name": "A" }),
//!     json!({ "id": 2, "name": "B" }),
//!     json!({ "id": 3, "name": "C" }),
//! ];
//! let mut table = TableManager::new(rows, vec![Column::new("name", "Name").field("name")]);
//! table.set_page_size(2);
//! assert_eq!(table.page().len(), 2);
//! assert_eq!(table.pagination().total, 3);
//!
//! table.add_filter(FilterConfig::equals("name", "B"));
//! assert_eq!(table.pagination().total, 1);
//! assert_eq!(table.page()[0]["id"], 2);
//! ```

use super::column::Column;
use super::export::{self, Export, ExportFormat};
use super::filter::{matches, SearchMatcher};
use super::query::{FilterConfig, Pagination, SearchMode, SortConfig, SortDirection, DEFAULT_PAGE_SIZE};
use super::selection::Selection;
use super::view::{HeaderCell, TableStats, TableView, ViewRow};
use crate::domain::error::{Result, VuegeError};
use crate::domain::value::sort_cmp;
use crate::domain::{Record, RowKey, RowKeySource};
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::BTreeSet;

/// In-memory table with search, filters, sort, pagination, selection and
/// expansion.
pub struct TableManager<T> {
    rows: Vec<T>,
    columns: Vec<Column<T>>,
    row_key: RowKeySource<T>,
    sort: Option<SortConfig>,
    filters: Vec<FilterConfig>,
    search: String,
    search_mode: SearchMode,
    pagination: Pagination,
    default_page_size: usize,
    selection: Selection,
    expanded: BTreeSet<RowKey>,
    loading: bool,
    error: Option<String>,
    revision: u64,
    /// Backing indices of the current page, in display order.
    processed: Vec<usize>,
    visible_keys: Vec<RowKey>,
}

impl<T: Record> TableManager<T> {
    /// Creates a table keyed by the `id` property.
    pub fn new(rows: Vec<T>, columns: Vec<Column<T>>) -> Self {
        Self::with_row_key(rows, columns, RowKeySource::default())
    }

    /// Creates a table with an explicit row key source.
    pub fn with_row_key(rows: Vec<T>, columns: Vec<Column<T>>, row_key: RowKeySource<T>) -> Self {
        let mut table = Self {
            rows,
            columns,
            row_key,
            sort: None,
            filters: Vec::new(),
            search: String::new(),
            search_mode: SearchMode::default(),
            pagination: Pagination::new(DEFAULT_PAGE_SIZE),
            default_page_size: DEFAULT_PAGE_SIZE,
            selection: Selection::default(),
            expanded: BTreeSet::new(),
            loading: false,
            error: None,
            revision: 0,
            processed: Vec::new(),
            visible_keys: Vec::new(),
        };
        table.recompute();
        table
    }

    /// Sets the page size used initially and restored by [`reset`](Self::reset).
    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.default_page_size = page_size.max(1);
        self.set_page_size(page_size);
        self
    }

    /// Returns the key of `row`.
    pub fn key_of(&self, row: &T) -> RowKey {
        self.row_key.key_of(row)
    }

    // ---- data ----

    /// The full backing row set, in insertion order.
    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    pub fn columns(&self) -> &[Column<T>] {
        &self.columns
    }

    /// Looks up a column by key.
    pub fn column(&self, key: &str) -> Option<&Column<T>> {
        self.columns.iter().find(|c| c.key == key)
    }

    pub fn set_columns(&mut self, columns: Vec<Column<T>>) {
        self.columns = columns;
        self.revision += 1;
        self.recompute();
    }

    /// Replaces the backing set and returns to the first page.
    pub fn update_data(&mut self, rows: Vec<T>) {
        tracing::debug!(count = rows.len(), "replacing table data");
        self.rows = rows;
        self.revision += 1;
        self.pagination.page = 1;
        self.recompute();
    }

    /// Appends rows to the backing set.
    pub fn add_data(&mut self, rows: Vec<T>) {
        tracing::debug!(count = rows.len(), "appending table data");
        self.rows.extend(rows);
        self.revision += 1;
        self.recompute();
    }

    /// Removes every row whose key is in `keys` and forgets those keys in the
    /// selection and expansion sets.
    ///
    /// # Returns
    ///
    /// The number of rows removed.
    pub fn remove_data(&mut self, keys: &[RowKey]) -> usize {
        let doomed: BTreeSet<&RowKey> = keys.iter().collect();
        let before = self.rows.len();
        let row_key = &self.row_key;
        self.rows.retain(|row| !doomed.contains(&row_key.key_of(row)));
        for key in keys {
            self.selection.selected_keys.remove(key);
            self.expanded.remove(key);
        }
        let removed = before - self.rows.len();
        tracing::debug!(requested = keys.len(), removed, "removed table rows");
        self.revision += 1;
        self.recompute();
        removed
    }

    /// Applies `update` to the row with `key`.
    ///
    /// # Errors
    ///
    /// Returns [`VuegeError::RowNotFound`] if no row has that key.
    pub fn update_row(&mut self, key: &RowKey, update: impl FnOnce(&mut T)) -> Result<()> {
        let row_key = &self.row_key;
        let row = self
            .rows
            .iter_mut()
            .find(|row| &row_key.key_of(row) == key)
            .ok_or_else(|| VuegeError::RowNotFound(key.to_string()))?;
        update(row);
        self.revision += 1;
        self.recompute();
        Ok(())
    }

    // ---- sort ----

    pub fn sort(&self) -> Option<&SortConfig> {
        self.sort.as_ref()
    }

    /// Replaces the active sort. Sorting does not change the current page.
    pub fn set_sort(&mut self, key: impl Into<String>, direction: SortDirection) {
        self.sort = Some(SortConfig::new(key, direction));
        self.recompute();
    }

    pub fn clear_sort(&mut self) {
        self.sort = None;
        self.recompute();
    }

    // ---- filters ----

    pub fn filters(&self) -> &[FilterConfig] {
        &self.filters
    }

    /// Adds a filter and returns to the first page.
    ///
    /// Several filters may target the same key; all of them must hold.
    pub fn add_filter(&mut self, filter: FilterConfig) {
        tracing::debug!(key = %filter.key, operator = filter.operator.as_str(), "adding filter");
        self.filters.push(filter);
        self.pagination.page = 1;
        self.recompute();
    }

    /// Removes every filter on `key` and returns to the first page.
    pub fn remove_filter(&mut self, key: &str) {
        self.filters.retain(|f| f.key != key);
        self.pagination.page = 1;
        self.recompute();
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear();
        self.pagination.page = 1;
        self.recompute();
    }

    // ---- search ----

    pub fn search(&self) -> &str {
        &self.search
    }

    pub const fn search_mode(&self) -> SearchMode {
        self.search_mode
    }

    /// Sets the search text and returns to the first page.
    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
        self.pagination.page = 1;
        self.recompute();
    }

    pub fn clear_search(&mut self) {
        self.set_search(String::new());
    }

    pub fn set_search_mode(&mut self, mode: SearchMode) {
        self.search_mode = mode;
        self.pagination.page = 1;
        self.recompute();
    }

    // ---- pagination ----

    pub const fn pagination(&self) -> Pagination {
        self.pagination
    }

    pub const fn total_pages(&self) -> usize {
        self.pagination.total_pages()
    }

    /// Moves to `page`, clamped to at least 1. Pages past the end are empty.
    pub fn set_page(&mut self, page: usize) {
        self.pagination.page = page.max(1);
        self.recompute();
    }

    /// Sets the page size, clamped to at least 1, and returns to the first page.
    pub fn set_page_size(&mut self, page_size: usize) {
        self.pagination.page_size = page_size.max(1);
        self.pagination.page = 1;
        self.recompute();
    }

    pub fn reset_pagination(&mut self) {
        self.pagination.page = 1;
        self.recompute();
    }

    // ---- pipeline ----

    /// Runs search, filters, sort and pagination and caches the current page.
    ///
    /// Also refreshes the selection flags against the new page.
    pub fn recompute(&mut self) {
        let _span = tracing::debug_span!(
            "recompute",
            rows = self.rows.len(),
            filters = self.filters.len(),
            has_search = !self.search.is_empty(),
            sort = ?self.sort.as_ref().map(|s| (&s.key, s.direction))
        )
        .entered();

        let matcher = SearchMatcher::new(&self.search, self.search_mode);
        let mut indices: Vec<usize> = self
            .rows
            .iter()
            .enumerate()
            .filter(|(_, row)| matcher.as_ref().map_or(true, |m| self.matches_search(row, m)))
            .filter(|(_, row)| {
                self.filters
                    .iter()
                    .all(|filter| matches(&self.resolve(row, &filter.key), filter))
            })
            .map(|(index, _)| index)
            .collect();

        if let Some(sort) = &self.sort {
            let mut keyed: Vec<(usize, Value)> = indices
                .iter()
                .map(|&index| (index, self.resolve(&self.rows[index], &sort.key)))
                .collect();
            keyed.sort_by(|(_, a), (_, b)| match sort.direction {
                SortDirection::Asc => sort_cmp(a, b),
                SortDirection::Desc => sort_cmp(b, a),
            });
            indices = keyed.into_iter().map(|(index, _)| index).collect();
        }

        self.pagination.total = indices.len();
        let (start, end) = self.pagination.bounds();
        self.processed = indices[start..end].to_vec();
        self.visible_keys = self
            .processed
            .iter()
            .map(|&index| self.key_of(&self.rows[index]))
            .collect();
        self.selection.refresh(&self.visible_keys);

        tracing::debug!(
            total = self.pagination.total,
            visible = self.processed.len(),
            page = self.pagination.page,
            "table recomputed"
        );
    }

    fn matches_search(&self, row: &T, matcher: &SearchMatcher) -> bool {
        self.columns
            .iter()
            .filter_map(|c| c.field.as_ref())
            .any(|field| matcher.is_match(&field.resolve(row)))
    }

    /// Reads `key` from `row` through the matching column, falling back to a
    /// raw property lookup.
    fn resolve(&self, row: &T, key: &str) -> Value {
        self.column(key)
            .map_or_else(|| row.field(key), |column| column.value(row))
    }

    /// Rows of the current page, in display order.
    pub fn page(&self) -> Vec<&T> {
        self.processed.iter().map(|&index| &self.rows[index]).collect()
    }

    /// Keys of the rows on the current page.
    pub fn visible_keys(&self) -> &[RowKey] {
        &self.visible_keys
    }

    // ---- selection ----

    pub fn select_row(&mut self, key: RowKey) {
        self.selection.selected_keys.insert(key);
        self.selection.refresh(&self.visible_keys);
    }

    pub fn deselect_row(&mut self, key: &RowKey) {
        self.selection.selected_keys.remove(key);
        self.selection.refresh(&self.visible_keys);
    }

    pub fn toggle_row_selection(&mut self, key: RowKey) {
        if self.selection.contains(&key) {
            self.deselect_row(&key);
        } else {
            self.select_row(key);
        }
    }

    /// Selects every row on the current page.
    pub fn select_all(&mut self) {
        self.selection
            .selected_keys
            .extend(self.visible_keys.iter().cloned());
        self.selection.refresh(&self.visible_keys);
    }

    /// Deselects every row on the current page. Keys of rows elsewhere stay
    /// selected.
    pub fn deselect_all(&mut self) {
        for key in &self.visible_keys {
            self.selection.selected_keys.remove(key);
        }
        self.selection.refresh(&self.visible_keys);
    }

    /// Empties the selection, visible or not.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Selected rows of the current page.
    pub fn selected_rows(&self) -> Vec<&T> {
        self.processed
            .iter()
            .zip(&self.visible_keys)
            .filter(|(_, key)| self.selection.contains(key))
            .map(|(&index, _)| &self.rows[index])
            .collect()
    }

    /// All selected keys, in key order.
    pub fn selected_keys(&self) -> Vec<RowKey> {
        self.selection.selected_keys.iter().cloned().collect()
    }

    pub const fn selection(&self) -> &Selection {
        &self.selection
    }

    // ---- expansion ----

    pub fn expand_row(&mut self, key: RowKey) {
        self.expanded.insert(key);
    }

    pub fn collapse_row(&mut self, key: &RowKey) {
        self.expanded.remove(key);
    }

    pub fn toggle_row_expansion(&mut self, key: RowKey) {
        if !self.expanded.remove(&key) {
            self.expanded.insert(key);
        }
    }

    #[must_use]
    pub fn is_expanded(&self, key: &RowKey) -> bool {
        self.expanded.contains(key)
    }

    /// All expanded keys, in key order.
    pub fn expanded_rows(&self) -> Vec<RowKey> {
        self.expanded.iter().cloned().collect()
    }

    /// Expands every row on the current page.
    pub fn expand_all(&mut self) {
        self.expanded.extend(self.visible_keys.iter().cloned());
    }

    /// Collapses every row on the current page.
    pub fn collapse_all(&mut self) {
        for key in &self.visible_keys {
            self.expanded.remove(key);
        }
    }

    // ---- status ----

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn set_error(&mut self, error: impl Into<String>) {
        self.error = Some(error.into());
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Drops the view state: sort, filters, search, selection, expansion,
    /// loading and error. The rows, columns and search mode are kept and the
    /// page size returns to its default.
    pub fn reset(&mut self) {
        tracing::debug!("resetting table state");
        self.sort = None;
        self.filters.clear();
        self.search.clear();
        self.pagination = Pagination::new(self.default_page_size);
        self.selection.clear();
        self.expanded.clear();
        self.loading = false;
        self.error = None;
        self.recompute();
    }

    // ---- output ----

    /// Exports the rows of the current page.
    ///
    /// # Errors
    ///
    /// Returns [`VuegeError::Json`] if a row fails to serialize.
    pub fn export_data(&self, format: ExportFormat) -> Result<Export>
    where
        T: Serialize,
    {
        let _span = tracing::debug_span!("export_data", format = format.as_str(), rows = self.processed.len()).entered();
        export::render(format, &self.columns, &self.page())
    }

    pub fn stats(&self) -> TableStats {
        TableStats {
            total_rows: self.rows.len(),
            visible_rows: self.processed.len(),
            selected_rows: self.selection.selected_keys.len(),
            expanded_rows: self.expanded.len(),
            current_page: self.pagination.page,
            total_pages: self.total_pages(),
            has_filters: !self.filters.is_empty(),
            has_search: !self.search.is_empty(),
            has_sort: self.sort.is_some(),
            is_loading: self.loading,
            has_error: self.error.is_some(),
        }
    }

    /// Builds a display-ready snapshot of the current page.
    pub fn view(&self) -> TableView {
        let visible: Vec<&Column<T>> = self.columns.iter().filter(|c| !c.hidden).collect();
        let header = visible
            .iter()
            .map(|c| HeaderCell {
                key: c.key.clone(),
                label: c.label.clone(),
                sortable: c.sortable,
                sort: self
                    .sort
                    .as_ref()
                    .filter(|s| s.key == c.key)
                    .map(|s| s.direction),
            })
            .collect();
        let rows = self
            .processed
            .iter()
            .zip(&self.visible_keys)
            .map(|(&index, key)| ViewRow {
                key: key.clone(),
                cells: visible.iter().map(|c| c.display(&self.rows[index])).collect(),
                is_selected: self.selection.contains(key),
                is_expanded: self.is_expanded(key),
            })
            .collect();
        let empty_state = if !self.processed.is_empty() {
            None
        } else if self.filters.is_empty() && self.search.is_empty() {
            Some("No rows".to_string())
        } else {
            Some("No rows match the current search and filters".to_string())
        };

        TableView {
            header,
            rows,
            pagination: self.pagination,
            select_all: self.selection.select_all,
            indeterminate: self.selection.indeterminate,
            search: (!self.search.is_empty()).then(|| self.search.clone()),
            empty_state,
            loading: self.loading,
            error: self.error.clone(),
        }
    }

    /// Identifies the data revision and view state; two calls return the same
    /// text exactly when the current page would render the same rows.
    pub fn fingerprint(&self) -> String {
        json!({
            "revision": self.revision,
            "search": self.search,
            "searchMode": self.search_mode,
            "filters": self.filters,
            "sort": self.sort,
            "page": self.pagination.page,
            "pageSize": self.pagination.page_size,
        })
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value::to_text;
    use crate::table::query::FilterOperator;

    fn abc() -> TableManager<Value> {
        let rows = vec![
            json!({ "id": 1, "name": "A" }),
            json!({ "id": 2, "name": "B" }),
            json!({ "id": 3, "name": "C" }),
        ];
        TableManager::new(rows, vec![Column::new("name", "Name").field("name").sortable()])
    }

    fn ids(table: &TableManager<Value>) -> Vec<i64> {
        table.page().iter().filter_map(|row| row["id"].as_i64()).collect()
    }

    #[test]
    fn first_page_of_three() {
        let mut table = abc();
        table.set_page_size(2);
        assert_eq!(ids(&table), vec![1, 2]);
        assert_eq!(table.pagination().total, 3);
        table.set_page(2);
        assert_eq!(ids(&table), vec![3]);
    }

    #[test]
    fn equals_filter_narrows_total() {
        let mut table = abc();
        table.set_page_size(2);
        table.add_filter(FilterConfig::equals("name", "B"));
        assert_eq!(table.pagination().total, 1);
        assert_eq!(ids(&table), vec![2]);
    }

    #[test]
    fn filter_resets_page() {
        let mut table = abc();
        table.set_page_size(1);
        table.set_page(3);
        table.add_filter(FilterConfig::new("id", FilterOperator::GreaterThan, json!(1)));
        assert_eq!(table.pagination().page, 1);
        assert_eq!(ids(&table), vec![2]);
        table.remove_filter("id");
        assert_eq!(table.pagination().total, 3);
    }

    #[test]
    fn sort_desc_and_clear() {
        let mut table = abc();
        table.set_sort("name", SortDirection::Desc);
        assert_eq!(ids(&table), vec![3, 2, 1]);
        table.clear_sort();
        assert_eq!(ids(&table), vec![1, 2, 3]);
    }

    #[test]
    fn sort_is_stable_on_ties() {
        let rows = vec![
            json!({ "id": 1, "rank": 2 }),
            json!({ "id": 2, "rank": 1 }),
            json!({ "id": 3, "rank": 2 }),
            json!({ "id": 4, "rank": 1 }),
        ];
        let mut table = TableManager::new(rows, Vec::new());
        table.set_sort("rank", SortDirection::Asc);
        assert_eq!(ids(&table), vec![2, 4, 1, 3]);
        table.set_sort("rank", SortDirection::Desc);
        assert_eq!(ids(&table), vec![1, 3, 2, 4]);
    }

    #[test]
    fn search_only_looks_at_columns_with_a_field() {
        let rows = vec![
            json!({ "id": 1, "name": "Kazan", "note": "Volga" }),
            json!({ "id": 2, "name": "Perm", "note": null }),
        ];
        let columns = vec![
            Column::new("name", "Name").field("name"),
            Column::new("note", "Note"),
        ];
        let mut table = TableManager::new(rows, columns);
        table.set_search("volga");
        assert!(table.page().is_empty());
        table.set_search("PERM");
        assert_eq!(ids(&table), vec![2]);
        table.clear_search();
        assert_eq!(table.pagination().total, 2);
    }

    #[test]
    fn search_reads_accessor_columns() {
        let rows = vec![
            json!({ "id": 1, "first": "Ivan", "last": "Susanin" }),
            json!({ "id": 2, "first": "Kuzma", "last": "Minin" }),
        ];
        let full_name = Column::new("full", "Full name").accessor(|row: &Value| {
            json!(format!("{} {}", to_text(&row.field("first")), to_text(&row.field("last"))))
        });
        let mut table = TableManager::new(rows, vec![full_name]);
        table.set_search("an sus");
        assert_eq!(ids(&table), vec![1]);
        table.set_search("kuzma m");
        assert_eq!(ids(&table), vec![2]);
        assert_eq!(table.key_of(&table.rows()[1]), RowKey::Int(2));
    }

    #[test]
    fn select_all_is_page_scoped() {
        let mut table = abc();
        table.set_page_size(2);
        table.select_all();
        assert_eq!(table.selected_keys(), vec![RowKey::Int(1), RowKey::Int(2)]);
        assert!(table.selection().select_all);
        assert!(!table.selection().indeterminate);

        table.deselect_row(&RowKey::Int(2));
        assert!(!table.selection().select_all);
        assert!(table.selection().indeterminate);

        table.set_page(2);
        assert!(!table.selection().select_all);
        assert!(!table.selection().indeterminate);
        table.select_all();
        table.set_page(1);
        table.deselect_all();
        assert_eq!(table.selected_keys(), vec![RowKey::Int(3)]);

        table.clear_selection();
        assert!(table.selected_keys().is_empty());
    }

    #[test]
    fn selected_rows_are_on_the_page() {
        let mut table = abc();
        table.set_page_size(2);
        table.toggle_row_selection(RowKey::Int(2));
        table.toggle_row_selection(RowKey::Int(3));
        let selected: Vec<&Value> = table.selected_rows();
        assert_eq!(selected, vec![&json!({ "id": 2, "name": "B" })]);
        table.toggle_row_selection(RowKey::Int(3));
        assert_eq!(table.selected_keys(), vec![RowKey::Int(2)]);
    }

    #[test]
    fn expansion() {
        let mut table = abc();
        table.set_page_size(2);
        table.expand_all();
        assert_eq!(table.expanded_rows(), vec![RowKey::Int(1), RowKey::Int(2)]);
        table.toggle_row_expansion(RowKey::Int(3));
        table.toggle_row_expansion(RowKey::Int(1));
        assert_eq!(table.expanded_rows(), vec![RowKey::Int(2), RowKey::Int(3)]);
        assert!(table.is_expanded(&RowKey::Int(3)) && !table.is_expanded(&RowKey::Int(1)));
        let view = table.view();
        assert!(!view.rows[0].is_expanded);
        assert!(view.rows[1].is_expanded);
        table.collapse_all();
        assert_eq!(table.expanded_rows(), vec![RowKey::Int(3)]);
        table.collapse_row(&RowKey::Int(3));
        assert!(table.expanded_rows().is_empty());
    }

    #[test]
    fn remove_data_prunes_keys() {
        let mut table = abc();
        table.select_row(RowKey::Int(2));
        table.expand_row(RowKey::Int(2));
        assert_eq!(table.remove_data(&[RowKey::Int(2), RowKey::Int(9)]), 1);
        assert_eq!(ids(&table), vec![1, 3]);
        assert!(table.selected_keys().is_empty());
        assert!(table.expanded_rows().is_empty());
    }

    #[test]
    fn update_row_and_missing_key() {
        let mut table = abc();
        table
            .update_row(&RowKey::Int(1), |row| row["name"] = json!("Z"))
            .unwrap();
        table.set_sort("name", SortDirection::Asc);
        assert_eq!(ids(&table), vec![2, 3, 1]);
        let missing = table.update_row(&RowKey::Int(7), |_| {});
        assert!(matches!(missing, Err(VuegeError::RowNotFound(key)) if key == "7"));
    }

    #[test]
    fn add_and_replace_data() {
        let mut table = abc();
        table.set_page_size(1);
        table.set_page(3);
        table.add_data(vec![json!({ "id": 4, "name": "D" })]);
        assert_eq!(table.pagination().page, 3);
        assert_eq!(table.pagination().total, 4);
        table.update_data(vec![json!({ "id": 9, "name": "X" })]);
        assert_eq!(table.pagination().page, 1);
        assert_eq!(ids(&table), vec![9]);
    }

    #[test]
    fn reset_restores_defaults() {
        let mut table = abc().with_page_size(2);
        table.set_search("a");
        table.set_sort("name", SortDirection::Desc);
        table.set_page_size(1);
        table.select_row(RowKey::Int(1));
        table.set_loading(true);
        table.set_error("boom");
        table.reset();
        let stats = table.stats();
        assert_eq!(table.pagination().page_size, 2);
        assert!(!stats.has_search && !stats.has_sort && !stats.is_loading && !stats.has_error);
        assert_eq!(stats.selected_rows, 0);
        assert_eq!(stats.total_pages, 2);
    }

    #[test]
    fn stats_and_view() {
        let mut table = abc();
        table.set_page_size(2);
        table.set_sort("name", SortDirection::Asc);
        table.select_row(RowKey::Int(3));
        let stats = table.stats();
        assert_eq!(stats.total_rows, 3);
        assert_eq!(stats.visible_rows, 2);
        assert_eq!(stats.selected_rows, 1);
        assert_eq!(stats.total_pages, 2);

        let view = table.view();
        assert_eq!(view.header[0].sort, Some(SortDirection::Asc));
        assert_eq!(view.rows[1].cells, vec!["B".to_string()]);
        assert!(!view.rows[0].is_selected);

        table.add_filter(FilterConfig::equals("name", "nope"));
        assert_eq!(
            table.view().empty_state.as_deref(),
            Some("No rows match the current search and filters")
        );
    }

    #[test]
    fn fingerprint_tracks_view_and_data() {
        let mut table = abc();
        let first = table.fingerprint();
        table.select_row(RowKey::Int(1));
        assert_eq!(table.fingerprint(), first);
        table.set_page(2);
        assert_ne!(table.fingerprint(), first);
        table.set_page(1);
        assert_eq!(table.fingerprint(), first);
        table.add_data(Vec::new());
        assert_ne!(table.fingerprint(), first);
    }

    #[test]
    fn export_json_round_trips_rows() {
        let table = abc();
        let export = table.export_data(ExportFormat::Json).unwrap();
        let back: Vec<Value> = serde_json::from_str(&export.body).unwrap();
        assert_eq!(back.as_slice(), table.rows());
    }
}

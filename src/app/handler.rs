//! Command handling and table state transitions.
//!
//! This module translates UI-control commands (search box, column headers,
//! pager, checkboxes) into [`TableManager`] mutations.
//!
//! # Architecture
//!
//! The handler follows a unidirectional data flow pattern:
//! 1. A [`Command`] arrives from the caller
//! 2. [`handle_command`] pattern-matches the command
//! 3. State mutations occur via `TableManager` methods
//! 4. Actions are collected and returned for execution
//!
//! The returned flag tells the caller whether the visible table changed and
//! must be re-rendered.
//!
//! # Commands
//!
//! - **Search**: `Search`, `ClearSearch`
//! - **Sort**: `HeaderClick`, `SetSort`, `ClearSort`
//! - **Filters**: `AddFilter`, `RemoveFilter`, `ClearFilters`
//! - **Paging**: `GoToPage`, `NextPage`, `PrevPage`, `SetPageSize`
//! - **Rows**: `ToggleRow`, `SelectAllVisible`, `DeselectAllVisible`,
//!   `ToggleExpand`, `ExpandAll`, `CollapseAll`
//! - **State**: `Reset`
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//! use vuege::app::{handle_command, Command};
//! use vuege::table::{Column, TableManager};
//!
//! let rows = vec![json!({ "id": 1, "name": "Uezd" }), json!({ "id": 2, "name": "Volost" })];
//! let mut table = TableManager::new(rows, vec![Column::new("name", "Name").field("name").sortable()]);
//! let (render, actions) = handle_command(&mut table, &Command::HeaderClick("name".into()))?;
//! assert!(render);
//! assert_eq!(actions.len(), 1);
//! # Ok::<(), vuege::VuegeError>(())
//! ```

use super::actions::{Action, Notification};
use crate::domain::error::{Result, VuegeError};
use crate::domain::{Record, RowKey};
use crate::table::{FilterConfig, SortDirection, TableManager};

/// Commands issued by table controls.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Replaces the search text.
    Search(String),
    ClearSearch,

    /// Cycles the sort of a column: ascending, descending, unsorted.
    ///
    /// Ignored for unknown and non-sortable columns.
    HeaderClick(String),
    /// Sorts by a key regardless of column flags.
    SetSort { key: String, direction: SortDirection },
    ClearSort,

    /// Adds a filter.
    ///
    /// Rejected when the key names a column that is not filterable or when the
    /// operand has the wrong shape. Keys without a column filter on the raw
    /// row property.
    AddFilter(FilterConfig),
    /// Removes every filter on a key.
    RemoveFilter(String),
    ClearFilters,

    GoToPage(usize),
    /// Moves forward one page; ignored on the last page.
    NextPage,
    /// Moves back one page; ignored on the first page.
    PrevPage,
    SetPageSize(usize),

    ToggleRow(RowKey),
    SelectAllVisible,
    DeselectAllVisible,
    ToggleExpand(RowKey),
    ExpandAll,
    CollapseAll,

    /// Drops sort, filters, search, selection and expansion.
    Reset,
}

/// Applies a command to the table and returns actions to execute.
///
/// # Parameters
///
/// * `table` - Table to mutate
/// * `command` - Command to process
///
/// # Returns
///
/// Whether the visible table changed, and the actions to execute in order.
///
/// # Errors
///
/// Returns [`VuegeError::Filter`] for an `AddFilter` on a non-filterable column
/// or with a malformed operand.
///
/// # Tracing
///
/// Each call creates a debug-level span with the command.
#[allow(clippy::too_many_lines)]
pub fn handle_command<T: Record>(table: &mut TableManager<T>, command: &Command) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_command", command = ?command).entered();

    match command {
        Command::Search(search) => {
            if table.search() == search {
                return Ok((false, vec![]));
            }
            table.set_search(search.clone());
            Ok((true, vec![search_changed(table)]))
        }
        Command::ClearSearch => {
            if table.search().is_empty() {
                return Ok((false, vec![]));
            }
            table.clear_search();
            Ok((true, vec![search_changed(table)]))
        }
        Command::HeaderClick(key) => {
            let Some(column) = table.column(key) else {
                tracing::debug!(key = %key, "header click on unknown column");
                return Ok((false, vec![]));
            };
            if !column.sortable {
                tracing::debug!(key = %key, "column is not sortable");
                return Ok((false, vec![]));
            }

            let next = match table.sort() {
                Some(sort) if &sort.key == key => match sort.direction {
                    SortDirection::Asc => Some(SortDirection::Desc),
                    SortDirection::Desc => None,
                },
                _ => Some(SortDirection::Asc),
            };
            match next {
                Some(direction) => table.set_sort(key.clone(), direction),
                None => table.clear_sort(),
            }
            tracing::debug!(key = %key, direction = ?next, "sort cycled");
            Ok((true, vec![sort_changed(table)]))
        }
        Command::SetSort { key, direction } => {
            table.set_sort(key.clone(), *direction);
            Ok((true, vec![sort_changed(table)]))
        }
        Command::ClearSort => {
            if table.sort().is_none() {
                return Ok((false, vec![]));
            }
            table.clear_sort();
            Ok((true, vec![sort_changed(table)]))
        }
        Command::AddFilter(filter) => {
            if table.column(&filter.key).is_some_and(|c| !c.filterable) {
                return Err(VuegeError::Filter(format!(
                    "column '{}' is not filterable",
                    filter.key
                )));
            }
            filter.validate()?;
            table.add_filter(filter.clone());
            Ok((true, vec![filters_changed(table)]))
        }
        Command::RemoveFilter(key) => {
            if !table.filters().iter().any(|f| &f.key == key) {
                return Ok((false, vec![]));
            }
            table.remove_filter(key);
            Ok((true, vec![filters_changed(table)]))
        }
        Command::ClearFilters => {
            if table.filters().is_empty() {
                return Ok((false, vec![]));
            }
            table.clear_filters();
            Ok((true, vec![filters_changed(table)]))
        }
        Command::GoToPage(page) => go_to_page(table, *page),
        Command::NextPage => {
            let page = table.pagination().page;
            if page >= table.total_pages() {
                tracing::trace!(page, "already on the last page");
                return Ok((false, vec![]));
            }
            go_to_page(table, page + 1)
        }
        Command::PrevPage => {
            let page = table.pagination().page;
            if page <= 1 {
                return Ok((false, vec![]));
            }
            go_to_page(table, page - 1)
        }
        Command::SetPageSize(size) => {
            table.set_page_size(*size);
            Ok((true, vec![page_changed(table)]))
        }
        Command::ToggleRow(key) => {
            table.toggle_row_selection(key.clone());
            Ok((true, vec![selection_changed(table)]))
        }
        Command::SelectAllVisible => {
            table.select_all();
            Ok((true, vec![selection_changed(table)]))
        }
        Command::DeselectAllVisible => {
            table.deselect_all();
            Ok((true, vec![selection_changed(table)]))
        }
        Command::ToggleExpand(key) => {
            table.toggle_row_expansion(key.clone());
            Ok((true, vec![expansion_changed(table)]))
        }
        Command::ExpandAll => {
            table.expand_all();
            Ok((true, vec![expansion_changed(table)]))
        }
        Command::CollapseAll => {
            table.collapse_all();
            Ok((true, vec![expansion_changed(table)]))
        }
        Command::Reset => {
            table.reset();
            Ok((true, vec![Action::Notify(Notification::Reset)]))
        }
    }
}

fn go_to_page<T: Record>(table: &mut TableManager<T>, page: usize) -> Result<(bool, Vec<Action>)> {
    if table.pagination().page == page.max(1) {
        return Ok((false, vec![]));
    }
    table.set_page(page);
    Ok((true, vec![page_changed(table)]))
}

fn search_changed<T: Record>(table: &TableManager<T>) -> Action {
    Action::Notify(Notification::SearchChanged {
        search: table.search().to_string(),
        total: table.pagination().total,
    })
}

fn sort_changed<T: Record>(table: &TableManager<T>) -> Action {
    Action::Notify(Notification::SortChanged {
        sort: table.sort().cloned(),
    })
}

fn filters_changed<T: Record>(table: &TableManager<T>) -> Action {
    Action::Notify(Notification::FiltersChanged {
        count: table.filters().len(),
        total: table.pagination().total,
    })
}

fn page_changed<T: Record>(table: &TableManager<T>) -> Action {
    Action::Notify(Notification::PageChanged {
        pagination: table.pagination(),
    })
}

fn selection_changed<T: Record>(table: &TableManager<T>) -> Action {
    let selection = table.selection();
    Action::Notify(Notification::SelectionChanged {
        selected: selection.selected_keys.len(),
        select_all: selection.select_all,
        indeterminate: selection.indeterminate,
    })
}

fn expansion_changed<T: Record>(table: &TableManager<T>) -> Action {
    Action::Notify(Notification::ExpansionChanged {
        expanded: table.expanded_rows().len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{Column, FilterOperator};
    use serde_json::{json, Value};

    fn table() -> TableManager<Value> {
        let rows = (1..=5).map(|i| json!({ "id": i, "name": format!("row {i}"), "kind": i % 2 })).collect();
        let columns = vec![
            Column::new("name", "Name").field("name").sortable().filterable(),
            Column::new("kind", "Kind").field("kind"),
        ];
        TableManager::new(rows, columns).with_page_size(2)
    }

    #[test]
    fn header_click_cycles_sort() {
        let mut table = table();
        let click = Command::HeaderClick("name".into());

        handle_command(&mut table, &click).unwrap();
        assert_eq!(table.sort().map(|s| s.direction), Some(SortDirection::Asc));
        handle_command(&mut table, &click).unwrap();
        assert_eq!(table.sort().map(|s| s.direction), Some(SortDirection::Desc));
        let (render, actions) = handle_command(&mut table, &click).unwrap();
        assert!(render);
        assert!(table.sort().is_none());
        assert_eq!(actions, vec![Action::Notify(Notification::SortChanged { sort: None })]);
    }

    #[test]
    fn header_click_ignores_unsortable_columns() {
        let mut table = table();
        let (render, actions) = handle_command(&mut table, &Command::HeaderClick("kind".into())).unwrap();
        assert!(!render);
        assert!(actions.is_empty());
        assert!(table.sort().is_none());
    }

    #[test]
    fn add_filter_checks_column_and_shape() {
        let mut table = table();
        let on_kind = FilterConfig::equals("kind", 1);
        assert!(matches!(
            handle_command(&mut table, &Command::AddFilter(on_kind)),
            Err(VuegeError::Filter(_))
        ));
        let malformed = FilterConfig::new("name", FilterOperator::Between, json!("a"));
        assert!(handle_command(&mut table, &Command::AddFilter(malformed)).is_err());

        let raw = FilterConfig::new("id", FilterOperator::LessThan, json!(3));
        let (_, actions) = handle_command(&mut table, &Command::AddFilter(raw)).unwrap();
        assert_eq!(
            actions,
            vec![Action::Notify(Notification::FiltersChanged { count: 1, total: 2 })]
        );
    }

    #[test]
    fn paging_stays_in_range() {
        let mut table = table();
        assert!(!handle_command(&mut table, &Command::PrevPage).unwrap().0);
        assert!(handle_command(&mut table, &Command::NextPage).unwrap().0);
        assert!(handle_command(&mut table, &Command::NextPage).unwrap().0);
        assert_eq!(table.pagination().page, 3);
        assert!(!handle_command(&mut table, &Command::NextPage).unwrap().0);
        assert!(!handle_command(&mut table, &Command::GoToPage(3)).unwrap().0);
        handle_command(&mut table, &Command::SetPageSize(10)).unwrap();
        assert_eq!(table.pagination().page, 1);
    }

    #[test]
    fn selection_commands_report_flags() {
        let mut table = table();
        let (_, actions) = handle_command(&mut table, &Command::ToggleRow(RowKey::Int(1))).unwrap();
        assert_eq!(
            actions,
            vec![Action::Notify(Notification::SelectionChanged {
                selected: 1,
                select_all: false,
                indeterminate: true,
            })]
        );
        let (_, actions) = handle_command(&mut table, &Command::SelectAllVisible).unwrap();
        assert_eq!(
            actions,
            vec![Action::Notify(Notification::SelectionChanged {
                selected: 2,
                select_all: true,
                indeterminate: false,
            })]
        );
    }

    #[test]
    fn search_and_reset() {
        let mut table = table();
        let (render, _) = handle_command(&mut table, &Command::Search("row 3".into())).unwrap();
        assert!(render);
        assert_eq!(table.pagination().total, 1);
        assert!(!handle_command(&mut table, &Command::Search("row 3".into())).unwrap().0);
        handle_command(&mut table, &Command::ToggleExpand(RowKey::Int(3))).unwrap();
        let (_, actions) = handle_command(&mut table, &Command::Reset).unwrap();
        assert_eq!(actions, vec![Action::Notify(Notification::Reset)]);
        assert_eq!(table.stats().expanded_rows, 0);
        assert_eq!(table.pagination().total, 5);
    }
}

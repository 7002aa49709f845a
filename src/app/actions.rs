//! Actions representing side effects requested by the command handler.
//!
//! The handler only mutates the table; anything that must leave the table (so
//! far only notifications for subscribers) is returned as an [`Action`] and
//! executed by the [`TableSession`](super::TableSession).
//!
//! # Example
//!
//! ```rust
//! use vuege::app::{Action, Notification};
//!
//! let action = Action::Notify(Notification::Reset);
//! assert_eq!(action, Action::Notify(Notification::Reset));
//! ```

use crate::table::{Pagination, SortConfig};
use serde::Serialize;

/// Side effects produced by [`handle_command`](super::handle_command).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Publishes a notification to the session's event subscribers.
    Notify(Notification),
}

/// What changed in the table after a command.
///
/// Each variant is published on its own topic, see [`Notification::topic`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Notification {
    /// The search text changed.
    SearchChanged {
        search: String,
        /// Rows surviving search and filters.
        total: usize,
    },

    /// The active sort changed; `None` means unsorted.
    SortChanged { sort: Option<SortConfig> },

    /// A filter was added or removed.
    FiltersChanged {
        /// Active filter count.
        count: usize,
        total: usize,
    },

    /// The page or page size changed.
    PageChanged { pagination: Pagination },

    /// The selection set changed.
    SelectionChanged {
        selected: usize,
        select_all: bool,
        indeterminate: bool,
    },

    /// The expansion set changed.
    ExpansionChanged { expanded: usize },

    /// The view state was reset.
    Reset,
}

impl Notification {
    /// Event topic the notification is published on.
    #[must_use]
    pub const fn topic(&self) -> &'static str {
        match self {
            Self::SearchChanged { .. } => "search",
            Self::SortChanged { .. } => "sort",
            Self::FiltersChanged { .. } => "filters",
            Self::PageChanged { .. } => "page",
            Self::SelectionChanged { .. } => "selection",
            Self::ExpansionChanged { .. } => "expansion",
            Self::Reset => "reset",
        }
    }
}

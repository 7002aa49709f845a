//! Row selection state.

use crate::domain::RowKey;
use serde::Serialize;
use std::collections::BTreeSet;

/// Selected row keys plus the header checkbox flags.
///
/// The key set is global (keys stay selected while their rows are filtered out
/// or on another page). The flags describe the visible rows only and are
/// refreshed by the table after every selection change and every recompute.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    pub selected_keys: BTreeSet<RowKey>,
    pub select_all: bool,
    pub indeterminate: bool,
}

impl Selection {
    #[must_use]
    pub fn contains(&self, key: &RowKey) -> bool {
        self.selected_keys.contains(key)
    }

    /// Recomputes the flags against the keys of the visible rows.
    pub fn refresh(&mut self, visible: &[RowKey]) {
        let selected = visible
            .iter()
            .filter(|key| self.selected_keys.contains(key))
            .count();
        self.select_all = selected > 0 && selected == visible.len();
        self.indeterminate = selected > 0 && selected < visible.len();
    }

    pub fn clear(&mut self) {
        self.selected_keys.clear();
        self.select_all = false;
        self.indeterminate = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_follow_visible_rows() {
        let visible = [RowKey::Int(1), RowKey::Int(2)];
        let mut selection = Selection::default();

        selection.selected_keys.insert(RowKey::Int(1));
        selection.refresh(&visible);
        assert!(!selection.select_all);
        assert!(selection.indeterminate);

        selection.selected_keys.insert(RowKey::Int(2));
        selection.refresh(&visible);
        assert!(selection.select_all);
        assert!(!selection.indeterminate);

        selection.refresh(&[RowKey::Int(3)]);
        assert!(!selection.select_all);
        assert!(!selection.indeterminate);

        selection.refresh(&[]);
        assert!(!selection.select_all);
    }
}

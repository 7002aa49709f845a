//! A table bound to its event subscribers and export cache.

use super::actions::{Action, Notification};
use super::handler::{handle_command, Command};
use crate::cache::CacheManager;
use crate::domain::error::Result;
use crate::domain::Record;
use crate::events::EventManager;
use crate::table::{Export, ExportFormat, TableManager};
use serde::Serialize;

/// Owns a [`TableManager`] and executes the actions its commands produce.
///
/// The event and cache managers are injected so several sessions can share
/// configuration and tests can observe them. Notifications are emitted on
/// [`Notification::topic`]; exports are memoized per view fingerprint and
/// format.
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use vuege::app::{Command, TableSession};
/// use vuege::cache::CacheManager;
/// use vuege::events::EventManager;
/// use vuege::table::{Column, ExportFormat, TableManager};
///
/// let table = TableManager::new(vec![json!({ "id": 1, "name": "Guberniya" })], vec![Column::new("name", "Name").field("name")]);
/// let mut session = TableSession::new(table, EventManager::new(), CacheManager::default());
/// session.dispatch(&Command::Search("gub".into()))?;
/// let csv = session.export(ExportFormat::Csv)?;
/// assert_eq!(csv.body, "Name\n\"Guberniya\"");
/// # Ok::<(), vuege::VuegeError>(())
/// ```
pub struct TableSession<T> {
    table: TableManager<T>,
    events: EventManager<Notification>,
    cache: CacheManager<Export>,
}

impl<T: Record + Serialize> TableSession<T> {
    pub fn new(table: TableManager<T>, events: EventManager<Notification>, cache: CacheManager<Export>) -> Self {
        Self { table, events, cache }
    }

    /// Handles a command and publishes the resulting notifications.
    ///
    /// # Returns
    ///
    /// Whether the visible table changed.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`handle_command`]; the table is left unchanged.
    pub fn dispatch(&mut self, command: &Command) -> Result<bool> {
        let (render, actions) = handle_command(&mut self.table, command)?;
        for action in actions {
            self.execute(action);
        }
        Ok(render)
    }

    fn execute(&mut self, action: Action) {
        match action {
            Action::Notify(notification) => {
                let called = self.events.emit(notification.topic(), &notification);
                tracing::trace!(topic = notification.topic(), called, "notification published");
            }
        }
    }

    /// Exports the current page, reusing a cached export when neither the
    /// data nor the view changed since it was produced.
    ///
    /// # Errors
    ///
    /// Returns [`VuegeError::Json`](crate::VuegeError::Json) if a row fails to
    /// serialize.
    pub fn export(&mut self, format: ExportFormat) -> Result<Export> {
        let key = format!("{}:{format}", self.table.fingerprint());
        if let Some(hit) = self.cache.get(&key) {
            tracing::debug!(format = format.as_str(), "export served from cache");
            return Ok(hit);
        }
        let export = self.table.export_data(format)?;
        self.cache.set(key, export.clone());
        Ok(export)
    }

    pub const fn table(&self) -> &TableManager<T> {
        &self.table
    }

    /// Direct access to the table for mutations that have no command, such as
    /// loading new data.
    pub fn table_mut(&mut self) -> &mut TableManager<T> {
        &mut self.table
    }

    pub const fn events(&self) -> &EventManager<Notification> {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut EventManager<Notification> {
        &mut self.events
    }

    pub const fn cache(&self) -> &CacheManager<Export> {
        &self.cache
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RowKey;
    use crate::table::Column;
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};

    fn session() -> TableSession<Value> {
        let rows = vec![
            json!({ "id": 1, "name": "Tver" }),
            json!({ "id": 2, "name": "Tula" }),
            json!({ "id": 3, "name": "Pskov" }),
        ];
        let table = TableManager::new(rows, vec![Column::new("name", "Name").field("name").sortable()]);
        TableSession::new(table, EventManager::new(), CacheManager::default())
    }

    #[test]
    fn notifications_reach_subscribers() {
        let mut session = session();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&seen);
        session.events_mut().on("selection", 0, move |n: &Notification| {
            log.lock().unwrap().push(n.clone());
            Ok(())
        });

        session.dispatch(&Command::ToggleRow(RowKey::Int(2))).unwrap();
        session.dispatch(&Command::Search("t".into())).unwrap();

        assert_eq!(
            *seen.lock().unwrap(),
            vec![Notification::SelectionChanged {
                selected: 1,
                select_all: false,
                indeterminate: true,
            }]
        );
    }

    #[test]
    fn exports_are_memoized_per_view() {
        let mut session = session();
        let first = session.export(ExportFormat::Json).unwrap();
        let again = session.export(ExportFormat::Json).unwrap();
        assert_eq!(first, again);
        assert_eq!(session.cache().stats().hits, 1);

        session.dispatch(&Command::HeaderClick("name".into())).unwrap();
        let sorted = session.export(ExportFormat::Csv).unwrap();
        assert_eq!(sorted.body, "Name\n\"Pskov\"\n\"Tula\"\n\"Tver\"");
        assert_eq!(session.cache().stats().misses, 2);

        session.table_mut().add_data(vec![json!({ "id": 4, "name": "Orel" })]);
        let grown = session.export(ExportFormat::Csv).unwrap();
        assert!(grown.body.starts_with("Name\n\"Orel\""));
    }
}

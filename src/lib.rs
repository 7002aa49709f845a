//! Vuege: record tables with search, filters, sorting, paging and selection.
//!
//! Vuege keeps an in-memory set of rows and derives the page a table control
//! shows from it:
//! - Free-text search across searchable columns (substring or fuzzy)
//! - Filters with eight comparison operators, combined with AND
//! - A single stable sort with loose value ordering
//! - Page-scoped selection and per-row expansion tracked by row key
//! - CSV and JSON export of the current page, cached per view
//! - Prioritized event subscriptions and a TTL/LRU cache
//!
//! # Architecture
//!
//! The crate follows a layered architecture pattern:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  CLI (main.rs)                                      │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← Commands
//! │  - Command handling                                 │  ← Notifications
//! │  - Action dispatching                               │
//! │  - Session with export caching                      │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ Table Layer   │   │ Cache Layer   │   │ Event Layer   │
//! │ (table/)      │   │ (cache/)      │   │ (events/)     │
//! │ - Pipeline    │   │ - TTL expiry  │   │ - Priorities  │
//! │ - Columns     │   │ - LRU evict   │   │ - Once        │
//! │ - Export      │   │ - Stats       │   │ - Stats       │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!         │                    │                    │
//! ┌─────────────────────────────────────────────────────┐
//! │  Domain Layer (domain/)                             │
//! │  - Error types and codes                            │
//! │  - Record trait and row keys                        │
//! │  - Value coercion and ordering                      │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │
//! │  - tracing subscriber setup                         │
//! │  - Rotating log file                                │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: Commands, notifications and [`TableSession`]
//! - [`cache`]: Key/value cache with TTL, LRU eviction and statistics
//! - [`domain`]: Errors, the [`Record`] trait and value semantics
//! - [`events`]: Topic-based event manager with priorities
//! - [`observability`]: Tracing initialization and log rotation
//! - [`table`]: Columns and the [`TableManager`] pipeline
//!
//! # Examples
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
//! let columns = vec![Column::new("name", "Name").field("name").filterable()];
//! let mut table = TableManager::new(rows, columns).with_page_size(2);
//! assert_eq!(table.page().len(), 2);
//!
//! table.add_filter(FilterConfig::equals("name", "B"));
//! assert_eq!(table.pagination().total, 1);
//! ```

#![allow(clippy::multiple_crate_versions)]

pub mod app;
pub mod cache;
pub mod domain;
pub mod events;
pub mod observability;
pub mod table;

pub use app::TableSession;
pub use domain::{ErrorCode, Record, Result, RowKey, RowKeySource, VuegeError};
pub use table::{Column, TableManager};

use cache::{CacheConfig, CacheManager};
use events::EventManager;
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use table::{CellFormat, SearchMode, DEFAULT_PAGE_SIZE};

/// Configuration for a Vuege table, read from a TOML file.
///
/// Every field is optional in the file; missing fields take the defaults
/// below.
///
/// # Example
///
/// ```toml
/// row_key = "id"
/// page_size = 25
/// search_mode = "fuzzy"
/// trace_level = "vuege=debug"
/// log_file = "/tmp/vuege.log"
///
/// [cache]
/// max_size = 100
/// default_ttl_secs = 60
///
/// [[columns]]
/// key = "name"
/// label = "Name"
/// sortable = true
/// filterable = true
///
/// [[columns]]
/// key = "founded"
/// label = "Founded"
/// format = { kind = "year" }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Row property holding the row key.
    ///
    /// Default: `"id"`
    pub row_key: Option<String>,

    /// Rows per page.
    ///
    /// Default: 10
    pub page_size: usize,

    /// How the search text is matched against cells.
    ///
    /// Default: `substring`
    pub search_mode: SearchMode,

    /// Tracing filter directive (e.g. `"debug"`, `"vuege=trace"`).
    ///
    /// `RUST_LOG` takes precedence when set. Default: `"info"`
    pub trace_level: Option<String>,

    /// File receiving log output instead of stderr.
    pub log_file: Option<PathBuf>,

    /// Export cache settings.
    pub cache: CacheSettings,

    /// Column definitions, in display order.
    ///
    /// When empty, columns are derived from the keys of the first row.
    pub columns: Vec<ColumnSpec>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            row_key: None,
            page_size: DEFAULT_PAGE_SIZE,
            search_mode: SearchMode::default(),
            trace_level: None,
            log_file: None,
            cache: CacheSettings::default(),
            columns: Vec::new(),
        }
    }
}

/// The `[cache]` table of a [`Config`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheSettings {
    pub max_size: usize,
    pub default_ttl_secs: u64,
    pub enable_stats: bool,
}

impl Default for CacheSettings {
    fn default() -> Self {
        let defaults = CacheConfig::default();
        Self {
            max_size: defaults.max_size,
            default_ttl_secs: defaults.default_ttl.as_secs(),
            enable_stats: defaults.enable_stats,
        }
    }
}

impl From<CacheSettings> for CacheConfig {
    fn from(settings: CacheSettings) -> Self {
        Self::new()
            .with_max_size(settings.max_size)
            .with_default_ttl(Duration::from_secs(settings.default_ttl_secs))
            .with_stats(settings.enable_stats)
    }
}

/// One `[[columns]]` entry of a [`Config`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColumnSpec {
    pub key: String,
    /// Header text; defaults to the key.
    pub label: Option<String>,
    /// Row property read for the cell; defaults to the key.
    pub field: Option<String>,
    #[serde(default)]
    pub sortable: bool,
    #[serde(default)]
    pub filterable: bool,
    #[serde(default)]
    pub hidden: bool,
    pub format: Option<CellFormat>,
}

impl ColumnSpec {
    /// Builds the table column this entry describes.
    pub fn to_column<T>(&self) -> Column<T> {
        let label = self.label.as_deref().unwrap_or(&self.key);
        let mut column = Column::new(self.key.as_str(), label)
            .field(self.field.as_deref().unwrap_or(&self.key));
        if self.sortable {
            column = column.sortable();
        }
        if self.filterable {
            column = column.filterable();
        }
        if self.hidden {
            column = column.hidden();
        }
        if let Some(format) = self.format {
            column = column.format(format);
        }
        column
    }
}

impl Config {
    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`VuegeError::Config`] on malformed TOML, unknown keys or a
    /// zero page size.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)
            .map_err(|e| VuegeError::Config(format!("Failed to parse config TOML: {e}")))?;
        if config.page_size == 0 {
            return Err(VuegeError::Config("page_size must be at least 1".to_string()));
        }
        Ok(config)
    }

    /// Loads a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`VuegeError::Config`] if the file cannot be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            VuegeError::Config(format!("Failed to read config file {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&contents)
    }

    /// Columns for `rows`: the configured ones, or one sortable and
    /// filterable column per key of the first row.
    pub fn columns_for(&self, rows: &[Value]) -> Vec<Column<Value>> {
        if !self.columns.is_empty() {
            return self.columns.iter().map(ColumnSpec::to_column).collect();
        }
        rows.first()
            .and_then(Value::as_object)
            .map(|first| {
                first
                    .keys()
                    .map(|key| Column::new(key.as_str(), key.as_str()).field(key.as_str()).sortable().filterable())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn row_key_source<T>(&self) -> RowKeySource<T> {
        self.row_key
            .as_ref()
            .map_or_else(RowKeySource::default, |key| RowKeySource::Field(key.clone()))
    }
}

/// Builds a session over JSON rows as described by `config`.
///
/// The table starts on page 1 with no search, sort or filters.
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use vuege::{initialize, Config};
///
/// let config = Config::from_toml_str("page_size = 2")?;
/// let rows = vec![json!({ "id": 1 }), json!({ "id": 2 }), json!({ "id": 3 })];
/// let session = initialize(&config, rows);
/// assert_eq!(session.table().total_pages(), 2);
/// # Ok::<(), vuege::VuegeError>(())
/// ```
pub fn initialize(config: &Config, rows: Vec<Value>) -> TableSession<Value> {
    let columns = config.columns_for(&rows);
    tracing::debug!(
        rows = rows.len(),
        columns = columns.len(),
        page_size = config.page_size,
        search_mode = ?config.search_mode,
        "initializing table session"
    );

    let mut table = TableManager::with_row_key(rows, columns, config.row_key_source())
        .with_page_size(config.page_size);
    table.set_search_mode(config.search_mode);

    TableSession::new(
        table,
        EventManager::new(),
        CacheManager::new(config.cache.into()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_config_uses_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.page_size, 10);
        assert_eq!(config.cache.default_ttl_secs, 300);
    }

    #[test]
    fn parses_columns_and_cache() {
        let config = Config::from_toml_str(
            r#"
            row_key = "code"
            search_mode = "fuzzy"

            [cache]
            max_size = 5

            [[columns]]
            key = "founded"
            label = "Founded"
            sortable = true
            format = { kind = "year" }

            [[columns]]
            key = "title"
            field = "name"
            format = { kind = "truncate", max_len = 4 }
            "#,
        )
        .unwrap();

        assert_eq!(config.search_mode, SearchMode::Fuzzy);
        assert_eq!(config.cache.max_size, 5);
        assert!(config.cache.enable_stats);
        assert_eq!(config.columns[0].format, Some(CellFormat::Year));
        assert_eq!(config.columns[1].format, Some(CellFormat::Truncate { max_len: 4 }));

        let columns = config.columns_for(&[]);
        let row = json!({ "code": "TVR", "founded": "1796-12-12", "name": "Tver Governorate" });
        assert_eq!(columns[0].display(&row), "1796");
        assert_eq!(columns[1].label, "title");
        assert_eq!(columns[1].display(&row), "Tver...");
        assert!(columns[0].sortable && !columns[0].filterable);
    }

    #[test]
    fn rejects_bad_config() {
        assert!(matches!(Config::from_toml_str("page_size = 0"), Err(VuegeError::Config(_))));
        assert!(matches!(Config::from_toml_str("colour = 1"), Err(VuegeError::Config(_))));
        assert!(matches!(
            Config::from_toml_str("search_mode = \"regex\""),
            Err(VuegeError::Config(_))
        ));
    }

    #[test]
    fn derives_columns_from_first_row() {
        let rows = vec![json!({ "id": 1, "name": "Tver" })];
        let columns = Config::default().columns_for(&rows);
        let keys: Vec<&str> = columns.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, ["id", "name"]);
        assert!(columns.iter().all(|c| c.sortable && c.filterable));
    }

    #[test]
    fn initialize_applies_row_key_and_page_size() {
        let config = Config {
            row_key: Some("code".to_string()),
            page_size: 1,
            ..Config::default()
        };
        let rows = vec![json!({ "code": "a" }), json!({ "code": "b" })];
        let session = initialize(&config, rows);
        assert_eq!(session.table().visible_keys(), [RowKey::from("a")]);
        assert_eq!(session.table().total_pages(), 2);
        assert_eq!(session.cache().config().max_size, 1000);
    }
}

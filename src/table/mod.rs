//! Client-side table pipeline.
//!
//! # Organization
//!
//! - [`column`]: Column definitions and cell formatters
//! - [`query`]: Sort, filter, pagination and search-mode types
//! - [`filter`]: Filter operators and free-text search matching
//! - [`selection`]: Selected keys and header checkbox flags
//! - [`manager`]: [`TableManager`], the pipeline itself
//! - [`export`]: CSV, JSON and Excel-placeholder export
//! - [`view`]: Render-ready snapshots and statistics

pub mod column;
pub mod export;
pub mod filter;
pub mod manager;
pub mod query;
pub mod selection;
pub mod view;

pub use column::{CellFormat, Column, Field, Formatter};
pub use export::{Export, ExportFormat};
pub use manager::TableManager;
pub use query::{FilterConfig, FilterOperator, Pagination, SearchMode, SortConfig, SortDirection, DEFAULT_PAGE_SIZE};
pub use selection::Selection;
pub use view::{HeaderCell, TableStats, TableView, ViewRow};

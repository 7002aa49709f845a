//! Domain layer for Vuege tables.
//!
//! Core types that do not depend on any table state: errors, the row model and
//! the loose value semantics the pipeline is built on.
//!
//! # Organization
//!
//! - [`error`]: Error types, result alias and HTTP status messages
//! - [`record`]: The [`Record`] trait and row keys
//! - [`value`]: Text/number coercion, equality and ordering of cells
//!
//! # Examples
//!
//! ```
//! use serde_json::json;
//! use vuege::domain::{Record, RowKey, RowKeySource};
//!
//! let row = json!({ "id": 7, "name": "Kazan Governorate" });
//! let key = RowKeySource::default().key_of(&row);
//! assert_eq!(key, RowKey::Int(7));
//! assert_eq!(row.field("name"), json!("Kazan Governorate"));
//! ```

pub mod error;
pub mod record;
pub mod value;

pub use error::{http_status_message, ErrorCode, Result, VuegeError};
pub use record::{KeyFn, Record, RowKey, RowKeySource};

//! Application layer coordinating commands, tables and notifications.
//!
//! This module sits between the table controls (or the CLI) and the
//! [`table`](crate::table) pipeline. It implements the command-driven flow that
//! keeps a table and its subscribers in sync.
//!
//! # Architecture
//!
//! The application layer follows a unidirectional data flow pattern:
//!
//! ```text
//! Control → Command → Command Handler → Table Mutations → Actions → Event Subscribers
//!                                              ↓
//!                                   Export Cache (by view fingerprint)
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effects emitted by the command handler
//! - [`handler`]: Command processing and state transitions
//! - [`session`]: A table bound to injected event and cache managers
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//! use vuege::app::{handle_command, Command};
//! use vuege::table::{Column, TableManager};
//!
//! let mut table = TableManager::new(vec![json!({ "id": 1 })], Vec::<Column<_>>::new());
//! let (render, _actions) = handle_command(&mut table, &Command::NextPage)?;
//! assert!(!render);
//! # Ok::<(), vuege::VuegeError>(())
//! ```

pub mod actions;
pub mod handler;
pub mod session;

pub use actions::{Action, Notification};
pub use handler::{handle_command, Command};
pub use session::TableSession;

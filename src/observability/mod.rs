//! Structured logging with an optional rotating log file.
//!
//! Every layer of the crate reports through `tracing` spans and events; this
//! module installs the subscriber that filters and writes them.
//!
//! # Architecture
//!
//! ```text
//! tracing macros → EnvFilter → fmt layer → stderr | RotatingFileWriter → log file
//! ```
//!
//! # Features
//!
//! - **Level Filtering**: `EnvFilter` directives such as `vuege=debug`
//! - **Automatic Rotation**: Files rotate at 10MB with 3-backup retention
//!
//! # Configuration
//!
//! Trace level is controlled via:
//! 1. `RUST_LOG` environment variable (highest priority)
//! 2. `trace_level` config option
//! 3. Default: `"info"`
//!
//! # Modules
//!
//! - [`init`]: Tracing initialization and subscriber setup
//! - [`file_writer`]: Rotating file writer with size-based rotation

mod file_writer;
mod init;

pub use file_writer::{RotatingFileWriter, MAX_BACKUP_FILES, MAX_FILE_SIZE_BYTES};
pub use init::{env_filter, init_tracing, DEFAULT_TRACE_LEVEL};

//! Tracing initialization and subscriber setup.
//!
//! This module configures the tracing subscriber, wiring the `tracing` macros
//! used across the crate to either stderr or a rotating log file.

use super::file_writer::RotatingFileWriter;
use crate::domain::error::Result;
use crate::Config;
use std::fs;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter directive when neither `RUST_LOG` nor the config sets one.
pub const DEFAULT_TRACE_LEVEL: &str = "info";

/// Resolves the filter directive.
///
/// # Trace Level Resolution
///
/// 1. `RUST_LOG` environment variable, if set and valid
/// 2. `config.trace_level` if set
/// 3. Default: `"info"`
pub fn env_filter(config: &Config) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(config.trace_level.as_deref().unwrap_or(DEFAULT_TRACE_LEVEL))
    })
}

/// Initializes the global tracing subscriber.
///
/// Sets up a subscriber pipeline that:
/// 1. Filters spans and events by the resolved trace level
/// 2. Formats them as text lines
/// 3. Writes to `config.log_file` (rotated at 10 MB, 3 backups kept) or, when
///    no file is configured, to stderr
///
/// # Parameters
///
/// * `config` - Configuration holding `trace_level` and `log_file`
///
/// # Initialization Behavior
///
/// - Creates the log file's directory if it doesn't exist
/// - Idempotent: Safe to call multiple times (only first call takes effect)
///
/// # Errors
///
/// Returns [`VuegeError::Io`](crate::VuegeError::Io) if the log directory
/// cannot be created.
///
/// # Example
///
/// ```rust
/// use vuege::observability::init_tracing;
/// use vuege::Config;
///
/// let config = Config {
///     trace_level: Some("debug".to_string()),
///     ..Default::default()
/// };
///
/// init_tracing(&config)?;
///
/// tracing::debug!("tracing is now active");
/// # Ok::<(), vuege::VuegeError>(())
/// ```
pub fn init_tracing(config: &Config) -> Result<()> {
    let filter = env_filter(config);
    let registry = tracing_subscriber::registry().with(filter);

    match &config.log_file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            let layer = fmt::layer()
                .with_ansi(false)
                .with_writer(RotatingFileWriter::new(path.clone()));
            let _ = registry.with(layer).try_init();
        }
        None => {
            let layer = fmt::layer().with_writer(std::io::stderr);
            let _ = registry.with(layer).try_init();
        }
    }

    Ok(())
}

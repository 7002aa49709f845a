//! Error types for Vuege tables.
//!
//! This module defines the centralized error type [`VuegeError`], the
//! [`Result`] alias used across the crate, and the mapping from HTTP status codes
//! to user-facing messages that the record pages show when a request fails.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Machine-readable category carried by [`VuegeError::App`].
///
/// Codes serialize to the same names [`ErrorCode::as_str`] returns, so they can
/// be matched by callers that only see the JSON form of an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    /// Input failed validation.
    #[serde(rename = "VALIDATION_ERROR")]
    Validation,
    /// The caller is not authenticated or not allowed.
    #[serde(rename = "UNAUTHORIZED")]
    Unauthorized,
    /// The requested record does not exist.
    #[serde(rename = "NOT_FOUND")]
    NotFound,
    /// The transport failed before a response arrived.
    #[serde(rename = "NETWORK_ERROR")]
    Network,
    /// Anything not covered above.
    #[serde(rename = "UNKNOWN_ERROR")]
    Unknown,
}

impl ErrorCode {
    /// Returns the wire name of the code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "VALIDATION_ERROR",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::NotFound => "NOT_FOUND",
            Self::Network => "NETWORK_ERROR",
            Self::Unknown => "UNKNOWN_ERROR",
        }
    }

    /// Picks the code that corresponds to an HTTP status.
    #[must_use]
    pub const fn from_status(status: u16) -> Self {
        match status {
            401 | 403 => Self::Unauthorized,
            404 => Self::NotFound,
            400 | 422 => Self::Validation,
            _ => Self::Unknown,
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The main error type for Vuege operations.
///
/// Most variants wrap a failure from a lower layer (filesystem, JSON, TOML).
/// [`VuegeError::App`] is the coded application error: it carries a
/// [`ErrorCode`] and optional structured details for validation, auth and
/// not-found cases.
#[derive(Debug, Error)]
pub enum VuegeError {
    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Row data or an export could not be (de)serialized as JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A filter could not be built or parsed.
    ///
    /// Raised for unknown operator names and for operands of the wrong shape
    /// (for example a `between` filter whose value is not a two-element array).
    #[error("Filter error: {0}")]
    Filter(String),

    /// Export to the requested format failed.
    #[error("Export error: {0}")]
    Export(String),

    /// No row carries the given key.
    #[error("Row not found: {0}")]
    RowNotFound(String),

    /// Coded application error.
    #[error("{code}: {message}")]
    App {
        /// Machine-readable category.
        code: ErrorCode,
        /// Human-readable message.
        message: String,
        /// Optional structured context (field errors, ids).
        details: Option<serde_json::Value>,
    },
}

impl VuegeError {
    /// Builds a coded application error without details.
    pub fn app(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::App {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Builds the coded error a failed HTTP response maps to.
    ///
    /// The message is the user-facing text from [`http_status_message`].
    #[must_use]
    pub fn from_status(status: u16, message: Option<&str>) -> Self {
        Self::app(
            ErrorCode::from_status(status),
            http_status_message(status, message),
        )
    }

    /// Attaches structured details to an [`VuegeError::App`]; other variants are
    /// returned unchanged.
    #[must_use]
    pub fn with_details(self, details: serde_json::Value) -> Self {
        match self {
            Self::App { code, message, .. } => Self::App {
                code,
                message,
                details: Some(details),
            },
            other => other,
        }
    }

    /// Returns the machine-readable code of this error.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::App { code, .. } => *code,
            Self::Config(_) | Self::Filter(_) => ErrorCode::Validation,
            Self::RowNotFound(_) => ErrorCode::NotFound,
            Self::Io(_) | Self::Json(_) | Self::Export(_) => ErrorCode::Unknown,
        }
    }
}

/// Converts an HTTP status into the message shown to the user.
///
/// `400` and unmapped statuses prefer the server-provided `message`; the other
/// mapped statuses always use the fixed text.
///
/// # Examples
///
/// ```
/// use vuege::domain::error::http_status_message;
///
/// assert_eq!(http_status_message(404, Some("gone")), "Resource not found.");
/// assert_eq!(http_status_message(400, Some("bad date")), "bad date");
/// assert_eq!(http_status_message(418, None), "Unknown error.");
/// ```
#[must_use]
pub fn http_status_message(status: u16, message: Option<&str>) -> String {
    let fixed = match status {
        400 => return message.unwrap_or("Bad request.").to_string(),
        401 => "Authorization required.",
        403 => "Access denied.",
        404 => "Resource not found.",
        422 => "Data validation error.",
        500 => "Server error. Try again later.",
        _ => return message.unwrap_or("Unknown error.").to_string(),
    };
    fixed.to_string()
}

/// A specialized `Result` type for Vuege operations.
pub type Result<T> = std::result::Result<T, VuegeError>;

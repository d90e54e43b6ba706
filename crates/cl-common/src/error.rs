//! Error types for chem light reporting.
//!
//! Errors carry a stable numeric code and a category so that log consumers
//! can group failures without parsing messages. None of these errors escape
//! the controller's send/remove operations; they surface through the log
//! stream and through the fallible helper constructors only.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for chem light operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Environment or configuration problems detected at setup time.
    Config,
    /// Building a geomessage document or encoding one of its fields.
    Document,
    /// Handing a finished message to a sink.
    Delivery,
    /// File I/O.
    Io,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Config => write!(f, "config"),
            ErrorCategory::Document => write!(f, "document"),
            ErrorCategory::Delivery => write!(f, "delivery"),
            ErrorCategory::Io => write!(f, "io"),
        }
    }
}

/// Unified error type for chem light reporting.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors (10-19)
    #[error("configuration error: {0}")]
    Config(String),

    #[error("document factory unavailable: {0}")]
    DocumentFactory(String),

    // Document errors (20-29)
    #[error("cannot encode color 0x{argb:08X}: {reason}")]
    ColorEncoding { argb: u32, reason: String },

    #[error("invalid field name: {0:?}")]
    InvalidFieldName(String),

    #[error("failed to render geomessage: {0}")]
    Render(String),

    // Delivery errors (30-39)
    #[error("message delivery failed: {0}")]
    Delivery(String),

    #[error("collaborator panicked: {0}")]
    CollaboratorPanic(String),

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns the stable error code for this error.
    ///
    /// - 10-19: configuration
    /// - 20-29: document construction
    /// - 30-39: delivery
    /// - 60-69: I/O
    pub fn code(&self) -> u32 {
        match self {
            Error::Config(_) => 10,
            Error::DocumentFactory(_) => 11,
            Error::ColorEncoding { .. } => 20,
            Error::InvalidFieldName(_) => 21,
            Error::Render(_) => 22,
            Error::Delivery(_) => 30,
            Error::CollaboratorPanic(_) => 31,
            Error::Io(_) => 60,
        }
    }

    /// Returns the error category for grouping and filtering.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Config(_) | Error::DocumentFactory(_) => ErrorCategory::Config,
            Error::ColorEncoding { .. } | Error::InvalidFieldName(_) | Error::Render(_) => {
                ErrorCategory::Document
            }
            Error::Delivery(_) | Error::CollaboratorPanic(_) => ErrorCategory::Delivery,
            Error::Io(_) => ErrorCategory::Io,
        }
    }

    /// Build an error from a caught panic payload.
    ///
    /// Panic payloads are `&str` or `String` for `panic!` with a message;
    /// anything else is reported generically.
    pub fn from_panic(payload: &(dyn std::any::Any + Send)) -> Self {
        let detail = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_string()
        };
        Error::CollaboratorPanic(detail)
    }
}

//! Unified error handling for mailioc.
//!
//! A `thiserror`-based model with:
//!   * Typed variants for the failure domains we actually hit
//!     (configuration, message parsing, delivery, I/O)
//!   * A coarse categorization layer (`ErrorCategory`) for reporting
//!   * Helper constructors
//!   * `From` conversions for common lower-level errors
//!
//! Note that decode failures (headers, body parts) never show up here:
//! those are recovered locally with replacement characters and are not
//! errors from the caller's point of view. Only message-level failures
//! (unreadable file, unparseable message) and collaborator failures
//! (Elasticsearch delivery, output file write) are represented.

use std::io;

use thiserror::Error;

/// High-level classification for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Parse,
    Network,
    Internal,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ErrorCategory::Input => "input",
            ErrorCategory::Parse => "parse",
            ErrorCategory::Network => "network",
            ErrorCategory::Internal => "internal",
        };
        f.write_str(s)
    }
}

/// Primary application error type.
#[derive(Error, Debug)]
pub enum MailIocError {
    // ------------------------ Input / Validation ----------------------------
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Invalid Elastic Cloud ID '{value}': {reason}")]
    InvalidCloudId { value: String, reason: String },

    // ---------------------------- Parsing -----------------------------------
    #[error("Failed to parse message {file_name}: {reason}")]
    MessageParse { file_name: String, reason: String },

    // ----------------------------- Network ----------------------------------
    #[error("Delivery failed during {operation} for '{target}': {reason}")]
    Delivery {
        operation: String,
        target: String,
        reason: String,
    },

    // ----------------------------- I/O / FS ---------------------------------
    #[error("I/O error during {operation} on {path}: {source}")]
    Io {
        path: String,
        operation: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write output document {path}: {reason}")]
    OutputWrite { path: String, reason: String },

    // ---------------------------- Internal ----------------------------------
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl MailIocError {
    /// Categorize the error for reporting.
    pub fn category(&self) -> ErrorCategory {
        use MailIocError::*;
        match self {
            Configuration { .. } | InvalidCloudId { .. } => ErrorCategory::Input,
            MessageParse { .. } => ErrorCategory::Parse,
            Delivery { .. } => ErrorCategory::Network,
            Io { .. } | OutputWrite { .. } | Internal { .. } => ErrorCategory::Internal,
        }
    }

    // ---------------------------- Constructors -----------------------------

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn invalid_cloud_id(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidCloudId {
            value: value.into(),
            reason: reason.into(),
        }
    }

    pub fn message_parse(file_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MessageParse {
            file_name: file_name.into(),
            reason: reason.into(),
        }
    }

    pub fn delivery(
        operation: impl Into<String>,
        target: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Delivery {
            operation: operation.into(),
            target: target.into(),
            reason: reason.into(),
        }
    }

    pub fn io(path: impl Into<String>, operation: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            operation: operation.into(),
            source,
        }
    }

    pub fn output_write(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::OutputWrite {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            source: None,
        }
    }
}

/// Public result alias.
pub type Result<T> = std::result::Result<T, MailIocError>;

impl From<reqwest::Error> for MailIocError {
    fn from(e: reqwest::Error) -> Self {
        MailIocError::Delivery {
            operation: "request".into(),
            target: e
                .url()
                .map(|u| u.to_string())
                .unwrap_or_else(|| "<unknown>".into()),
            reason: e.to_string(),
        }
    }
}

/// Extension trait for enriching IO results with path + operation context.
pub trait IoResultExt<T> {
    fn with_path(self, path: impl Into<String>, operation: impl Into<String>) -> Result<T>;
}

impl<T> IoResultExt<T> for std::result::Result<T, io::Error> {
    fn with_path(self, path: impl Into<String>, operation: impl Into<String>) -> Result<T> {
        self.map_err(|e| MailIocError::io(path.into(), operation.into(), e))
    }
}

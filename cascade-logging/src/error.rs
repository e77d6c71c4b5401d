//! Error types for the logging subsystem

use thiserror::Error;

/// Errors raised by a [`ConfigSource`](crate::config::ConfigSource) lookup
///
/// These are only ever constructed by the configuration source itself.
/// Validators catch them while probing keys for an enabled backend and
/// re-raise them as [`ValidationError`], preserving the message verbatim.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required key is absent from the configuration
    #[error("section/key [{section}/{key}] not found in config")]
    NotFound { section: String, key: String },

    /// A value could not be parsed as a boolean
    ///
    /// Downstream consumers match on this exact wording.
    #[error("The value for configuration option \"{section}:{key}\" is not a boolean (received \"{value}\").")]
    NotABoolean {
        section: String,
        key: String,
        value: String,
    },
}

/// Errors raised by backend configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    /// The remote log folder does not carry the backend's URI scheme
    #[error("{folder_key}: {value} is not valid {kind} name. Valid name should match regex: {pattern}")]
    InvalidRemoteFolder {
        folder_key: &'static str,
        value: String,
        kind: &'static str,
        pattern: String,
    },

    /// A configuration lookup failed while probing an enabled backend
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors raised by a remote blob-store backend
///
/// This is the only error the task log handler treats as recoverable:
/// a read failure falls back to local disk, a write failure during close
/// is logged and dropped.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No blob exists at the requested path
    #[error("blob not found: {0}")]
    NotFound(String),

    /// The backend rejected or failed the operation
    #[error("backend error: {0}")]
    Backend(String),
}

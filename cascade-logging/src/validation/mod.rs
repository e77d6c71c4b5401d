//! Backend configuration validation
//!
//! One validator per remote backend, all sharing the same shape: a
//! disabled backend passes unconditionally; an enabled backend must carry
//! a scheme-prefixed remote folder and a connection identifier, plus any
//! backend-specific extras. Validation is purely syntactic; no I/O is
//! performed against the remote service.
//!
//! Validators are selected by [`BackendKind`] through [`validator_for`],
//! not by inheritance; each implementation is stateless aside from its
//! fixed key names.

mod elasticsearch;
mod s3;
mod wasb;

// Re-export implementations
pub use elasticsearch::ElasticsearchValidator;
pub use s3::S3Validator;
pub use wasb::WasbValidator;

use crate::config::ConfigSource;
use crate::error::ValidationError;

/// Configuration section holding all backend keys
pub const REMOTE_LOGGING_SECTION: &str = "remote_logging";

/// The remote backends task logs can be persisted to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    ObjectStorage,
    BlobStorage,
    SearchIndex,
}

impl BackendKind {
    /// Declared evaluation order. When several backends are enabled for
    /// the same channel, the later backend wins (last-writer-wins).
    pub const ALL: [BackendKind; 3] = [
        BackendKind::ObjectStorage,
        BackendKind::BlobStorage,
        BackendKind::SearchIndex,
    ];

    /// Configuration key prefix for this backend
    pub fn prefix(self) -> &'static str {
        match self {
            BackendKind::ObjectStorage => "s3",
            BackendKind::BlobStorage => "wasb",
            BackendKind::SearchIndex => "elasticsearch",
        }
    }

    /// Required URI scheme for the backend's remote log folder
    pub fn scheme(self) -> &'static str {
        match self {
            BackendKind::ObjectStorage => "s3://",
            BackendKind::BlobStorage => "wasb://",
            BackendKind::SearchIndex => "es://",
        }
    }

    /// Human-readable name used in validation messages
    pub fn kind_name(self) -> &'static str {
        match self {
            BackendKind::ObjectStorage => "S3 bucket",
            BackendKind::BlobStorage => "WASB container",
            BackendKind::SearchIndex => "Elasticsearch index",
        }
    }

    /// Implementation identifier the logging dispatcher resolves to a
    /// handler for this backend
    pub fn handler_class(self) -> &'static str {
        match self {
            BackendKind::ObjectStorage => "cascade_logging::handler::S3TaskLogHandler",
            BackendKind::BlobStorage => "cascade_logging::handler::WasbTaskLogHandler",
            BackendKind::SearchIndex => "cascade_logging::handler::ElasticsearchTaskLogHandler",
        }
    }

    /// `{backend}_enabled` key
    pub fn enabled_key(self) -> String {
        format!("{}_enabled", self.prefix())
    }

    /// `{backend}_remote_log_folder` key
    pub fn remote_log_folder_key(self) -> String {
        format!("{}_remote_log_folder", self.prefix())
    }

    /// `{backend}_remote_log_conn_id` key
    pub fn remote_log_conn_id_key(self) -> String {
        format!("{}_remote_log_conn_id", self.prefix())
    }
}

/// Validates one backend's configuration
pub trait BackendValidator: Send + Sync {
    /// Checks the backend's required keys and format constraints
    ///
    /// Returns `Ok(())` when the backend is disabled, regardless of the
    /// state of any other key. Any failure aborts validation for this
    /// backend; no handler is registered for it.
    fn validate(&self, config: &dyn ConfigSource) -> Result<(), ValidationError>;
}

/// Returns the validator for the given backend
pub fn validator_for(kind: BackendKind) -> Box<dyn BackendValidator> {
    match kind {
        BackendKind::ObjectStorage => Box::new(S3Validator::new()),
        BackendKind::BlobStorage => Box::new(WasbValidator::new()),
        BackendKind::SearchIndex => Box::new(ElasticsearchValidator::new()),
    }
}

/// Checks that the backend's remote log folder carries its URI scheme
///
/// Prefix match only; existence of the remote location is never checked.
pub(crate) fn check_remote_log_folder(
    kind: BackendKind,
    config: &dyn ConfigSource,
    folder_key: &'static str,
) -> Result<String, ValidationError> {
    let value = config.get(REMOTE_LOGGING_SECTION, folder_key)?;
    if !value.starts_with(kind.scheme()) {
        return Err(ValidationError::InvalidRemoteFolder {
            folder_key,
            value,
            kind: kind.kind_name(),
            pattern: format!("^({}).*", kind.scheme()),
        });
    }
    Ok(value)
}

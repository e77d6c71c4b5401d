//! Blob-storage (WASB) backend validator

use crate::config::ConfigSource;
use crate::error::ValidationError;

use super::{BackendKind, BackendValidator, check_remote_log_folder, REMOTE_LOGGING_SECTION};

const WASB_ENABLED: &str = "wasb_enabled";
const WASB_REMOTE_LOG_FOLDER: &str = "wasb_remote_log_folder";
const WASB_REMOTE_LOG_CONN_ID: &str = "wasb_remote_log_conn_id";
const WASB_LOGGING_CONFIG_CLASS: &str = "wasb_logging_config_class";

/// Validates the blob-storage backend configuration
///
/// Required keys when enabled: `wasb_remote_log_folder` (must start with
/// `wasb://`), `wasb_remote_log_conn_id` and `wasb_logging_config_class`.
pub struct WasbValidator;

impl WasbValidator {
    pub fn new() -> Self {
        Self
    }
}

impl Default for WasbValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl BackendValidator for WasbValidator {
    fn validate(&self, config: &dyn ConfigSource) -> Result<(), ValidationError> {
        let is_enabled =
            config.get_bool_with_default(REMOTE_LOGGING_SECTION, WASB_ENABLED, false)?;
        if !is_enabled {
            return Ok(());
        }

        check_remote_log_folder(BackendKind::BlobStorage, config, WASB_REMOTE_LOG_FOLDER)?;
        config.get(REMOTE_LOGGING_SECTION, WASB_REMOTE_LOG_CONN_ID)?;
        config.get(REMOTE_LOGGING_SECTION, WASB_LOGGING_CONFIG_CLASS)?;

        Ok(())
    }
}

//! Search-index (Elasticsearch) backend validator

use crate::config::ConfigSource;
use crate::error::ValidationError;

use super::{BackendKind, BackendValidator, check_remote_log_folder, REMOTE_LOGGING_SECTION};

const ELASTICSEARCH_ENABLED: &str = "elasticsearch_enabled";
const ELASTICSEARCH_REMOTE_LOG_FOLDER: &str = "elasticsearch_remote_log_folder";
const ELASTICSEARCH_REMOTE_LOG_CONN_ID: &str = "elasticsearch_remote_log_conn_id";

/// Validates the search-index backend configuration
///
/// Required keys when enabled: `elasticsearch_remote_log_folder` (must
/// start with `es://`) and `elasticsearch_remote_log_conn_id`.
pub struct ElasticsearchValidator;

impl ElasticsearchValidator {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ElasticsearchValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl BackendValidator for ElasticsearchValidator {
    fn validate(&self, config: &dyn ConfigSource) -> Result<(), ValidationError> {
        let is_enabled =
            config.get_bool_with_default(REMOTE_LOGGING_SECTION, ELASTICSEARCH_ENABLED, false)?;
        if !is_enabled {
            return Ok(());
        }

        check_remote_log_folder(
            BackendKind::SearchIndex,
            config,
            ELASTICSEARCH_REMOTE_LOG_FOLDER,
        )?;
        config.get(REMOTE_LOGGING_SECTION, ELASTICSEARCH_REMOTE_LOG_CONN_ID)?;

        Ok(())
    }
}

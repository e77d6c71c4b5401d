//! Object-storage (S3) backend validator

use crate::config::ConfigSource;
use crate::error::ValidationError;

use super::{BackendKind, BackendValidator, check_remote_log_folder, REMOTE_LOGGING_SECTION};

const S3_ENABLED: &str = "s3_enabled";
const S3_REMOTE_LOG_FOLDER: &str = "s3_remote_log_folder";
const S3_REMOTE_LOG_CONN_ID: &str = "s3_remote_log_conn_id";
const S3_ENCRYPT_LOGS: &str = "s3_encrypt_logs";

/// Validates the object-storage backend configuration
///
/// Required keys when enabled: `s3_remote_log_folder` (must start with
/// `s3://`) and `s3_remote_log_conn_id`. `s3_encrypt_logs` is optional
/// and defaults to false.
pub struct S3Validator;

impl S3Validator {
    pub fn new() -> Self {
        Self
    }
}

impl Default for S3Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl BackendValidator for S3Validator {
    fn validate(&self, config: &dyn ConfigSource) -> Result<(), ValidationError> {
        let is_enabled =
            config.get_bool_with_default(REMOTE_LOGGING_SECTION, S3_ENABLED, false)?;
        if !is_enabled {
            return Ok(());
        }

        check_remote_log_folder(BackendKind::ObjectStorage, config, S3_REMOTE_LOG_FOLDER)?;
        config.get(REMOTE_LOGGING_SECTION, S3_REMOTE_LOG_CONN_ID)?;
        config.get_bool_with_default(REMOTE_LOGGING_SECTION, S3_ENCRYPT_LOGS, false)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InMemoryConfig;

    fn valid_config() -> InMemoryConfig {
        InMemoryConfig::new()
            .with("remote_logging", "s3_enabled", "true")
            .with(
                "remote_logging",
                "s3_remote_log_folder",
                "s3://my_test_bucket/task_logs",
            )
            .with("remote_logging", "s3_encrypt_logs", "false")
            .with("remote_logging", "s3_remote_log_conn_id", "aws_task_logs")
    }

    #[test]
    fn test_valid_config_passes() {
        let validator = S3Validator::new();
        assert!(validator.validate(&valid_config()).is_ok());
    }

    #[test]
    fn test_disabled_ignores_other_keys() {
        let validator = S3Validator::new();

        // Missing, absent enabled flag
        assert!(validator.validate(&InMemoryConfig::new()).is_ok());

        // Explicitly disabled with a malformed folder and no conn id
        let config = InMemoryConfig::new()
            .with("remote_logging", "s3_enabled", "false")
            .with("remote_logging", "s3_remote_log_folder", "not-a-bucket");
        assert!(validator.validate(&config).is_ok());
    }

    #[test]
    fn test_invalid_remote_log_folder() {
        let validator = S3Validator::new();
        for folder in [
            "my_test_bucket/task_logs",
            "s2://my_test_bucket/task_logs",
            "http://my_test_bucket/task_logs",
        ] {
            let config = valid_config().with("remote_logging", "s3_remote_log_folder", folder);
            let err = validator.validate(&config).unwrap_err();
            assert_eq!(
                err.to_string(),
                format!(
                    "s3_remote_log_folder: {} is not valid S3 bucket name. Valid name should match regex: ^(s3://).*",
                    folder
                )
            );
        }
    }

    #[test]
    fn test_non_boolean_encrypt_logs() {
        let validator = S3Validator::new();
        for value in ["y", "yes", "no", "-1", "10", "maybe"] {
            let config = valid_config().with("remote_logging", "s3_encrypt_logs", value);
            let err = validator.validate(&config).unwrap_err();
            assert_eq!(
                err.to_string(),
                format!(
                    "The value for configuration option \"remote_logging:s3_encrypt_logs\" is not a boolean (received \"{}\").",
                    value
                )
            );
        }
    }

    #[test]
    fn test_missing_conn_id() {
        let validator = S3Validator::new();
        let config = InMemoryConfig::new()
            .with("remote_logging", "s3_enabled", "true")
            .with(
                "remote_logging",
                "s3_remote_log_folder",
                "s3://my_test_bucket/task_logs",
            )
            .with("remote_logging", "s3_encrypt_logs", "false");

        let err = validator.validate(&config).unwrap_err();
        assert!(matches!(err, ValidationError::Config(_)));
        assert_eq!(
            err.to_string(),
            "section/key [remote_logging/s3_remote_log_conn_id] not found in config"
        );
    }
}

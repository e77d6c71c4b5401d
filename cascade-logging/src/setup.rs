//! Logging configuration assembly
//!
//! Runs once, synchronously, at log-subsystem startup. The builder
//! produces the default local-only configuration from a [`ConfigSource`];
//! the configurator then decides whether remote logging is active, runs
//! the matching backend validator, and merges the remote handler
//! descriptor into the configuration before it is handed to the external
//! logging dispatcher. No I/O is performed against any remote service.

use serde_json::{Value, json};
use tracing::info;

use cascade_core::domain::log::LoggingConfig;

use crate::config::ConfigSource;
use crate::error::ValidationError;
use crate::validation::{BackendKind, REMOTE_LOGGING_SECTION, validator_for};

/// Configuration section holding the shared logging keys
pub const LOGGING_SECTION: &str = "logging";

/// Logical channel task handlers are registered under
pub const TASK_CHANNEL: &str = "task";

/// Shared formatter name referenced by every handler descriptor
pub const FORMATTER_NAME: &str = "cascade";

/// Merges remote-logging handler descriptors into a [`LoggingConfig`]
pub struct RemoteLogConfigurator;

impl RemoteLogConfigurator {
    pub fn new() -> Self {
        Self
    }

    /// Configures remote task logging, mutating `logging_config` in place
    ///
    /// Returns without modification when the global `remote_logging` flag
    /// is off. Otherwise each enabled backend is validated (fail-fast on
    /// the first failure) and its handler descriptor merged under the
    /// `task` channel. When several backends are enabled, the later
    /// backend in declared order wins the channel; the dispatch config
    /// format cannot express two handlers for one channel.
    pub fn configure(
        &self,
        logging_config: &mut LoggingConfig,
        config: &dyn ConfigSource,
    ) -> Result<(), ValidationError> {
        let remote_logging =
            config.get_bool_with_default(LOGGING_SECTION, "remote_logging", false)?;
        if !remote_logging {
            return Ok(());
        }

        let filename_template = config.get(LOGGING_SECTION, "log_filename_template")?;
        let base_log_folder = config.get(LOGGING_SECTION, "base_log_folder")?;

        for kind in BackendKind::ALL {
            let enabled =
                config.get_bool_with_default(REMOTE_LOGGING_SECTION, &kind.enabled_key(), false)?;
            if !enabled {
                continue;
            }

            validator_for(kind).validate(config)?;

            let descriptor =
                handler_descriptor(kind, config, &base_log_folder, &filename_template)?;
            logging_config
                .handlers
                .insert(TASK_CHANNEL.to_string(), descriptor);

            info!(
                "Remote task logging enabled via {} backend",
                kind.prefix()
            );
        }

        Ok(())
    }
}

impl Default for RemoteLogConfigurator {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds the handler descriptor the dispatcher uses to construct the
/// backend's task log handler
fn handler_descriptor(
    kind: BackendKind,
    config: &dyn ConfigSource,
    base_log_folder: &str,
    filename_template: &str,
) -> Result<Value, ValidationError> {
    let remote_folder = config.get(REMOTE_LOGGING_SECTION, &kind.remote_log_folder_key())?;

    let mut descriptor = serde_json::Map::new();
    descriptor.insert("class".to_string(), json!(kind.handler_class()));
    descriptor.insert("formatter".to_string(), json!(FORMATTER_NAME));
    descriptor.insert(
        "base_log_folder".to_string(),
        json!(expand_user(base_log_folder)),
    );
    descriptor.insert(format!("{}_log_folder", kind.prefix()), json!(remote_folder));
    descriptor.insert("filename_template".to_string(), json!(filename_template));

    if kind == BackendKind::BlobStorage {
        descriptor.insert("wasb_container".to_string(), json!("cascade-logs"));
        descriptor.insert("delete_local_copy".to_string(), json!(false));
    }

    Ok(Value::Object(descriptor))
}

/// Builds the complete logging configuration on demand
///
/// Replaces any module-level configuration state: all keys are read from
/// the given source when [`build`](Self::build) is called, local-only
/// defaults first, then the remote configurator on top.
pub struct LoggingConfigBuilder<'a> {
    config: &'a dyn ConfigSource,
}

impl<'a> LoggingConfigBuilder<'a> {
    pub fn new(config: &'a dyn ConfigSource) -> Self {
        Self { config }
    }

    /// Assembles the logging configuration handed to the dispatcher
    pub fn build(&self) -> Result<LoggingConfig, ValidationError> {
        let log_level = self.config.get(LOGGING_SECTION, "logging_level")?.to_uppercase();
        let log_format = self.config.get(LOGGING_SECTION, "log_format")?;
        let base_log_folder = self.config.get(LOGGING_SECTION, "base_log_folder")?;
        let filename_template = self.config.get(LOGGING_SECTION, "log_filename_template")?;

        let mut logging_config = LoggingConfig::new();

        logging_config
            .formatters
            .insert(FORMATTER_NAME.to_string(), json!({ "format": log_format }));

        logging_config.handlers.insert(
            "console".to_string(),
            json!({
                "class": "cascade_logging::handler::ConsoleHandler",
                "formatter": FORMATTER_NAME,
                "stream": "stdout",
            }),
        );
        logging_config.handlers.insert(
            TASK_CHANNEL.to_string(),
            json!({
                "class": "cascade_logging::handler::LocalTaskLogHandler",
                "formatter": FORMATTER_NAME,
                "base_log_folder": expand_user(&base_log_folder),
                "filename_template": filename_template,
            }),
        );

        logging_config.loggers.insert(
            "cascade.task".to_string(),
            json!({
                "handlers": [TASK_CHANNEL],
                "level": log_level,
                "propagate": false,
            }),
        );

        RemoteLogConfigurator::new().configure(&mut logging_config, self.config)?;

        Ok(logging_config)
    }
}

fn expand_user(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest).display().to_string();
        }
    }
    path.to_string()
}

//! Cascade Logging
//!
//! Task-log persistence for the Cascade workflow system.
//!
//! This crate decides, per task run, where log output is written (local
//! disk, and optionally one remote backend), validates the operator-supplied
//! configuration for the selected backend before any task runs, and serves
//! log reads by preferring the remote copy and falling back to local disk.
//!
//! Architecture:
//! - Config: Typed key/value access over named configuration sections
//! - Validation: Per-backend configuration validators (S3, WASB, Elasticsearch)
//! - Setup: Remote-log configurator and logging-config builder
//! - Store: Blob-store capability contract for remote backends
//! - Handler: Per-task-run log sinks with upload-on-close and
//!   remote-first reads
//!
//! The assembled [`LoggingConfig`](cascade_core::domain::log::LoggingConfig)
//! is the sole artifact handed to the external logging dispatcher; this
//! crate never emits log records through the dispatcher itself.

pub mod config;
pub mod error;
pub mod handler;
pub mod setup;
pub mod store;
pub mod validation;

// Re-export commonly used types
pub use config::{ConfigSource, InMemoryConfig};
pub use error::{ConfigError, StoreError, ValidationError};
pub use handler::{LocalTaskLogHandler, RemoteTaskLogHandler};
pub use setup::{LoggingConfigBuilder, RemoteLogConfigurator};
pub use store::{BlobStore, InMemoryBlobStore};
pub use validation::{BackendKind, BackendValidator};

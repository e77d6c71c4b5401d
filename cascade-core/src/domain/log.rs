//! Logging configuration domain types

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The logging configuration handed to the external logging dispatcher
///
/// A nested mapping with three top-level sections, each keyed by a logical
/// name. Handler names are unique per section by construction; inserting a
/// handler descriptor for a channel that already has one replaces it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub formatters: HashMap<String, serde_json::Value>,
    pub handlers: HashMap<String, serde_json::Value>,
    pub loggers: HashMap<String, serde_json::Value>,
}

impl LoggingConfig {
    /// Creates an empty logging configuration
    pub fn new() -> Self {
        Self::default()
    }
}

/// Metadata returned alongside log text by a read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogReadMetadata {
    /// Whether the returned text is the complete log (no further content
    /// is expected for this attempt).
    pub end_of_log: bool,
}

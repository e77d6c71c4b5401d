//! Configuration source contract
//!
//! Typed key/value access over named configuration sections. The generic
//! configuration store is an external collaborator; this module defines
//! the contract the logging subsystem consumes, plus an in-memory
//! implementation for tests and embedded use.

use std::collections::HashMap;

use crate::error::ConfigError;

/// Typed accessor over named configuration sections
///
/// Implementations must raise [`ConfigError::NotFound`] for absent keys and
/// [`ConfigError::NotABoolean`] for values that cannot be parsed as
/// booleans. Validators re-surface these messages verbatim, so the wording
/// is part of the contract.
pub trait ConfigSource: Send + Sync {
    /// Returns the raw string value for `section`/`key`
    fn get(&self, section: &str, key: &str) -> Result<String, ConfigError>;

    /// Returns the boolean value for `section`/`key`
    ///
    /// Accepted spellings (case-insensitive): `true`, `false`, `t`, `f`,
    /// `1`, `0`. Anything else is not a boolean.
    fn get_bool(&self, section: &str, key: &str) -> Result<bool, ConfigError> {
        let value = self.get(section, key)?;
        parse_boolean(section, key, &value)
    }

    /// Returns the boolean value for `section`/`key`, or `default` when the
    /// key is absent
    ///
    /// A key that is present but not parseable as a boolean still fails;
    /// only absence falls back to the default.
    fn get_bool_with_default(
        &self,
        section: &str,
        key: &str,
        default: bool,
    ) -> Result<bool, ConfigError> {
        match self.get(section, key) {
            Ok(value) => parse_boolean(section, key, &value),
            Err(ConfigError::NotFound { .. }) => Ok(default),
            Err(err) => Err(err),
        }
    }
}

fn parse_boolean(section: &str, key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "t" | "1" => Ok(true),
        "false" | "f" | "0" => Ok(false),
        _ => Err(ConfigError::NotABoolean {
            section: section.to_string(),
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

/// In-memory implementation of [`ConfigSource`]
///
/// Backed by a flat map keyed by (section, key) pairs.
#[derive(Debug, Clone, Default)]
pub struct InMemoryConfig {
    values: HashMap<(String, String), String>,
}

impl InMemoryConfig {
    /// Creates an empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a value, replacing any previous value for the same key
    pub fn set(&mut self, section: &str, key: &str, value: &str) {
        self.values
            .insert((section.to_string(), key.to_string()), value.to_string());
    }

    /// Builder-style [`set`](Self::set)
    pub fn with(mut self, section: &str, key: &str, value: &str) -> Self {
        self.set(section, key, value);
        self
    }
}

impl ConfigSource for InMemoryConfig {
    fn get(&self, section: &str, key: &str) -> Result<String, ConfigError> {
        self.values
            .get(&(section.to_string(), key.to_string()))
            .cloned()
            .ok_or_else(|| ConfigError::NotFound {
                section: section.to_string(),
                key: key.to_string(),
            })
    }
}

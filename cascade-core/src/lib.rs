//! Cascade Core
//!
//! Core types and abstractions for the Cascade workflow system.
//!
//! This crate contains:
//! - Domain types: Core business entities (TaskRun, LoggingConfig, etc.)
//!
//! These types are shared between the logging subsystem (which configures
//! and operates task-log persistence) and the components that consume the
//! assembled logging configuration.

pub mod domain;

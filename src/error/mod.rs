// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Error types for rulekit.
//!
//! Failed rules are not errors here: they are data inside a
//! [`ValidationResult`](crate::rules::ValidationResult). This module covers
//! everything else, split so callers can tell "the record is invalid" apart
//! from "the rule document is broken" and "the validator itself failed".

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for rulekit operations.
#[derive(Error, Debug)]
pub enum RkError {
    // Rule-set loading errors
    #[error("Rule set error: {0}")]
    Load(#[from] LoadError),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    // Rule repository errors
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    // Record input errors (CLI only)
    #[error("Failed to read record {path}: {message}")]
    Record { path: PathBuf, message: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // UI/Interactive errors
    #[error("UI error: {0}")]
    Ui(String),

    // One or more records failed validation
    #[error("Validation failed: {count} invalid record(s)")]
    Invalid { count: usize },

    // Anything the pipeline did not anticipate
    #[error("Internal error: {0}")]
    Internal(String),

    // Generic error with context
    #[error("{context}: {message}")]
    WithContext { context: String, message: String },
}

impl From<dialoguer::Error> for RkError {
    fn from(err: dialoguer::Error) -> Self {
        RkError::Ui(err.to_string())
    }
}

/// Errors raised while resolving or parsing a rule set.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    #[error("Rule set not found: {identifier} (searched: {})", .searched.join(", "))]
    NotFound {
        identifier: String,
        searched: Vec<String>,
    },

    #[error("Malformed rule set '{identifier}': {reason}")]
    Malformed { identifier: String, reason: String },
}

impl LoadError {
    /// The identifier of the rule set that failed to load.
    pub fn identifier(&self) -> &str {
        match self {
            LoadError::NotFound { identifier, .. } => identifier,
            LoadError::Malformed { identifier, .. } => identifier,
        }
    }

    pub(crate) fn malformed(identifier: &str, reason: impl Into<String>) -> Self {
        LoadError::Malformed {
            identifier: identifier.to_string(),
            reason: reason.into(),
        }
    }
}

/// Configuration-related errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Failed to parse configuration: {message}")]
    ParseError { message: String },

    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    #[error("Configuration file already exists: {path}")]
    AlreadyExists { path: PathBuf },
}

/// Rule repository errors.
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Invalid rule document name: '{name}'")]
    InvalidName { name: String },

    #[error("Rule document not found: {name}")]
    NotFound { name: String },

    #[error("Failed to initialize rules directory {path}: {message}")]
    InitFailed { path: PathBuf, message: String },

    #[error("Failed to write rule document '{name}': {message}")]
    WriteFailed { name: String, message: String },

    #[error("Failed to delete rule document '{name}': {message}")]
    DeleteFailed { name: String, message: String },

    #[error("Rules location '{location}' is temporary; set [rules] location to a directory to {action} rule documents")]
    Temporary { location: String, action: String },
}

/// Result type alias for rulekit operations.
pub type Result<T> = std::result::Result<T, RkError>;

/// Extension trait for adding context to errors.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T, E: std::error::Error + 'static> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| RkError::WithContext {
            context: context.into(),
            message: e.to_string(),
        })
    }
}

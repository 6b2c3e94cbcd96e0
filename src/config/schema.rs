// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Configuration schema definitions.
//!
//! Defines all configuration structures that can be loaded from rk.toml.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// Namespace searched in the bundle when the primary location misses.
pub const DEFAULT_NAMESPACE: &str = "validation/";

/// The main configuration structure for rk.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RkConfig {
    /// Rule document configuration.
    pub rules: RulesConfig,

    /// Record kind to rule-set identifier.
    pub registry: BTreeMap<String, String>,

    /// Output configuration.
    pub output: OutputConfig,
}

impl RkConfig {
    /// Load configuration from the default locations.
    pub fn load() -> crate::error::Result<Self> {
        super::loader::load_config()
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &std::path::Path) -> crate::error::Result<Self> {
        super::loader::load_config_from(path)
    }
}

/// Rule document configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Primary rules location: `bundled:<namespace>`, `file:<dir>` or a
    /// plain directory.
    pub location: String,

    /// Default rule document seeded into a temporary repository.
    pub file: String,

    /// Whether parsed rule sets are cached per identifier.
    pub cache: bool,

    /// On-disk root of the bundled namespace.
    pub resources: Option<PathBuf>,
}

impl RulesConfig {
    /// Parsed primary location. An empty string means the default.
    pub fn location(&self) -> crate::error::Result<RulesLocation> {
        self.location.parse()
    }
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            location: format!("bundled:{}", DEFAULT_NAMESPACE),
            file: "validation-rules.yml".to_string(),
            cache: true,
            resources: None,
        }
    }
}

/// Output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Whether to use colors.
    pub color: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { color: true }
    }
}

/// Where rule documents are looked up first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RulesLocation {
    /// A namespace inside the [`Bundle`](crate::engine::Bundle), e.g. `validation/`.
    Bundled { namespace: String },
    /// A filesystem directory.
    Directory(PathBuf),
}

impl Default for RulesLocation {
    fn default() -> Self {
        RulesLocation::Bundled {
            namespace: DEFAULT_NAMESPACE.to_string(),
        }
    }
}

impl std::str::FromStr for RulesLocation {
    type Err = crate::error::RkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(RulesLocation::default());
        }

        if let Some(namespace) = s.strip_prefix("bundled:") {
            return Ok(RulesLocation::Bundled {
                namespace: namespace.to_string(),
            });
        }

        let dir = s.strip_prefix("file:").unwrap_or(s);
        if dir.is_empty() {
            return Err(crate::error::ConfigError::InvalidValue {
                key: "rules.location".to_string(),
                message: "'file:' needs a directory".to_string(),
            }
            .into());
        }

        Ok(RulesLocation::Directory(PathBuf::from(dir)))
    }
}

impl fmt::Display for RulesLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RulesLocation::Bundled { namespace } => write!(f, "bundled:{}", namespace),
            RulesLocation::Directory(dir) => write!(f, "file:{}", dir.display()),
        }
    }
}

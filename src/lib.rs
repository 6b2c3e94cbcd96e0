// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! RK - Declarative record validation
//!
//! Validates structured records against rule documents (YAML or JSON) that
//! list field rules: `notblank`, `notnull`, `size`, `min`, `pattern`, `enum`.
//!
//! # Features
//!
//! - **Rule Documents**: Ordered field rules, checked when the document loads
//! - **Nested Fields**: Dotted paths such as `address.zipCode`
//! - **Layered Lookup**: Configured location, bundled defaults, then a direct path
//! - **Typed Records**: Validate your own types through [`Inspectable`]
//! - **Rule Repository**: List, read, save and delete stored rule documents
//!
//! # Example
//!
//! ```no_run
//! use rulekit::config::RkConfig;
//! use rulekit::engine::{Bundle, ValidationEngine};
//!
//! let config = RkConfig::load().unwrap();
//! let engine = ValidationEngine::from_config(&config, Bundle::new()).unwrap();
//!
//! let record = serde_json::json!({ "username": "john_doe", "password": "Secret123" });
//! let result = engine.validate_json(Some(&record), "user-validation.yml").unwrap();
//!
//! for error in result.errors() {
//!     println!("{}", error);
//! }
//! ```

// Module declarations
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod record;
pub mod repository;
pub mod rules;

// Re-exports for convenience
pub use config::RkConfig;
pub use engine::ValidationEngine;
pub use error::{Result, RkError};
pub use record::{Inspectable, Node};
pub use rules::ValidationResult;

/// Version information embedded at compile time.
pub mod version {
    /// The current version of rk.
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");

    /// The git SHA at compile time (if available).
    pub const GIT_SHA: Option<&str> = non_empty(option_env!("VERGEN_GIT_SHA"));

    /// The git branch at compile time (if available).
    pub const GIT_BRANCH: Option<&str> = non_empty(option_env!("VERGEN_GIT_BRANCH"));

    /// The git commit date at compile time (if available).
    pub const GIT_COMMIT_DATE: Option<&str> = non_empty(option_env!("VERGEN_GIT_COMMIT_DATE"));

    // Outside a git checkout vergen emits empty or placeholder values.
    const fn non_empty(value: Option<&'static str>) -> Option<&'static str> {
        match value {
            Some(v) if !v.is_empty() && !is_placeholder(v) => Some(v),
            _ => None,
        }
    }

    const fn is_placeholder(value: &str) -> bool {
        let a = value.as_bytes();
        let b = b"VERGEN_IDEMPOTENT_OUTPUT";
        if a.len() != b.len() {
            return false;
        }
        let mut i = 0;
        while i < a.len() {
            if a[i] != b[i] {
                return false;
            }
            i += 1;
        }
        true
    }

    /// Get a formatted version string.
    pub fn version_string() -> String {
        match (GIT_SHA, GIT_COMMIT_DATE) {
            (Some(sha), Some(date)) => {
                format!("{} ({} {})", VERSION, &sha[..7.min(sha.len())], date)
            }
            (Some(sha), None) => {
                format!("{} ({})", VERSION, &sha[..7.min(sha.len())])
            }
            _ => VERSION.to_string(),
        }
    }
}

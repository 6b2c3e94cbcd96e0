// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Validation result types.

use crate::cli::args::OutputFormat;
use console::style;
use serde::Serialize;

/// Outcome of validating one record.
///
/// Errors are kept in rule declaration order. The result cannot be changed
/// once built, and `is_valid()` is always `errors().is_empty()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    valid: bool,
    errors: Vec<String>,
}

impl ValidationResult {
    /// Build a result from the collected error messages.
    pub fn from_errors(errors: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }

    /// A passing result.
    pub fn ok() -> Self {
        Self::from_errors(Vec::new())
    }

    /// A result with a single error.
    pub fn failure(message: impl Into<String>) -> Self {
        Self::from_errors(vec![message.into()])
    }

    /// Check if the validation passed (no errors).
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Error messages in rule order.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Consume the result, returning its error messages.
    pub fn into_errors(self) -> Vec<String> {
        self.errors
    }

    /// Print the result to stdout.
    pub fn print(&self, label: &str, format: Option<OutputFormat>) {
        match format {
            Some(OutputFormat::Json) => println!("{}", self.to_json(label)),
            _ => println!("{}", self.render_text(label)),
        }
    }

    /// Render as text: a status header followed by one line per error.
    pub fn render_text(&self, label: &str) -> String {
        let status = if self.valid {
            style("✓").green().bold()
        } else {
            style("✗").red().bold()
        };

        let mut output = format!("{} {} {}", status, style(label).cyan(), self.summary());
        for error in &self.errors {
            output.push_str(&format!("\n  {} {}", style("-").red(), error));
        }
        output
    }

    /// JSON object tagged with `label`.
    pub fn to_json_value(&self, label: &str) -> serde_json::Value {
        serde_json::json!({
            "record": label,
            "valid": self.valid,
            "errors": self.errors,
        })
    }

    /// Render as a JSON object tagged with `label`.
    pub fn to_json(&self, label: &str) -> String {
        serde_json::to_string_pretty(&self.to_json_value(label)).unwrap_or_default()
    }

    /// Get a summary string.
    pub fn summary(&self) -> String {
        match self.errors.len() {
            0 => "Valid".to_string(),
            1 => "Invalid (1 error)".to_string(),
            n => format!("Invalid ({} errors)", n),
        }
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::ok()
    }
}

impl FromIterator<String> for ValidationResult {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self::from_errors(iter.into_iter().collect())
    }
}

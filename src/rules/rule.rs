// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Parsed rule definitions.

use fancy_regex::Regex;
use std::fmt;

use super::kind::RuleKind;

/// A dot-separated path into a record, e.g. `address.zipCode`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath {
    raw: String,
    segments: Vec<String>,
}

impl FieldPath {
    /// Parse a dot-separated path. Every segment must be non-empty.
    pub fn parse(raw: &str) -> Result<Self, String> {
        if raw.is_empty() {
            return Err("field path is empty".to_string());
        }

        let segments: Vec<String> = raw.split('.').map(str::to_string).collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Err(format!("field path '{}' has an empty segment", raw));
        }

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    /// Path segments, left to right.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().map(String::as_str)
    }

    /// The path as written in the rule document.
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Kind-specific rule parameters, checked when the document is loaded.
#[derive(Debug, Clone)]
pub enum Params {
    /// `notblank` and `notnull` take no parameters.
    None,
    /// Inclusive length bounds.
    Size { min: usize, max: usize },
    /// Smallest accepted integer.
    Min { value: i64 },
    /// Anchored regular expression plus the source it was built from.
    Pattern { source: String, regex: Regex },
    /// Accepted text values.
    Enum { values: Vec<String> },
}

/// A single rule from a rule document.
#[derive(Debug, Clone)]
pub struct FieldRule {
    /// Path of the field the rule applies to.
    pub field: FieldPath,
    /// Declared rule kind.
    pub kind: RuleKind,
    /// Message reported when the rule fails.
    pub message: String,
    /// Kind-specific parameters.
    pub params: Params,
}

impl FieldRule {
    /// Short one-line description, used by `rk check`.
    pub fn describe(&self) -> String {
        let params = match &self.params {
            Params::None => String::new(),
            Params::Size { min, max } => format!(" [{}..={}]", min, max),
            Params::Min { value } => format!(" >= {}", value),
            Params::Pattern { source, .. } => format!(" /{}/", source),
            Params::Enum { values } => format!(" {{{}}}", values.join(", ")),
        };
        format!("{} {}{}", self.field, self.kind, params)
    }
}

/// An ordered, immutable list of rules identified by a string key.
#[derive(Debug, Clone)]
pub struct RuleSet {
    identifier: String,
    rules: Vec<FieldRule>,
}

impl RuleSet {
    /// Create a rule set. Rule order is evaluation and reporting order.
    pub fn new(identifier: impl Into<String>, rules: Vec<FieldRule>) -> Self {
        Self {
            identifier: identifier.into(),
            rules,
        }
    }

    /// The identifier this rule set was loaded under.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Rules in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, FieldRule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a FieldRule;
    type IntoIter = std::slice::Iter<'a, FieldRule>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_path_segments() {
        let path = FieldPath::parse("address.zipCode").unwrap();
        assert_eq!(path.segments().collect::<Vec<_>>(), vec!["address", "zipCode"]);
        assert_eq!(path.to_string(), "address.zipCode");
    }

    #[test]
    fn test_field_path_rejects_empty_segments() {
        assert!(FieldPath::parse("").is_err());
        assert!(FieldPath::parse("address.").is_err());
        assert!(FieldPath::parse(".zip").is_err());
        assert!(FieldPath::parse("a..b").is_err());
    }

    #[test]
    fn test_describe() {
        let rule = FieldRule {
            field: FieldPath::parse("name").unwrap(),
            kind: RuleKind::Size,
            message: "len".to_string(),
            params: Params::Size { min: 2, max: 50 },
        };
        assert_eq!(rule.describe(), "name size [2..=50]");
    }
}

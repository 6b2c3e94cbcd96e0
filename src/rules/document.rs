// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Rule document parsing.
//!
//! A document is YAML or JSON with a top-level `rules` sequence:
//!
//! ```yaml
//! rules:
//!   - field: "address.zipCode"
//!     type: "size"
//!     min: 5
//!     max: 5
//!     message: "Zip code must be 5 digits"
//! ```
//!
//! Every entry is checked here, so a broken document fails as a whole before
//! any record is validated against it.

use serde_json::{Map, Value};

use crate::error::LoadError;

use super::builtin::spec_for;
use super::kind::RuleKind;
use super::rule::{FieldPath, FieldRule, RuleSet};

/// Serialization format of a rule document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Yaml,
    Json,
}

impl DocumentFormat {
    /// Guess the format from a document name. Anything but `.json` is YAML.
    pub fn from_name(name: &str) -> Self {
        let is_json = std::path::Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        if is_json {
            DocumentFormat::Json
        } else {
            DocumentFormat::Yaml
        }
    }
}

/// Parse a rule document, inferring the format from `identifier`.
pub fn parse_rule_set(identifier: &str, bytes: &[u8]) -> Result<RuleSet, LoadError> {
    parse_rule_set_as(identifier, bytes, DocumentFormat::from_name(identifier))
}

/// Parse a rule document in the given format.
pub fn parse_rule_set_as(
    identifier: &str,
    bytes: &[u8],
    format: DocumentFormat,
) -> Result<RuleSet, LoadError> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| LoadError::malformed(identifier, format!("document is not UTF-8: {}", e)))?;

    let document: Value = match format {
        DocumentFormat::Json => serde_json::from_str(text)
            .map_err(|e| LoadError::malformed(identifier, format!("invalid JSON: {}", e)))?,
        DocumentFormat::Yaml => serde_yaml::from_str(text)
            .map_err(|e| LoadError::malformed(identifier, format!("invalid YAML: {}", e)))?,
    };

    let entries = document
        .as_object()
        .and_then(|top| top.get("rules"))
        .and_then(Value::as_array)
        .ok_or_else(|| {
            LoadError::malformed(
                identifier,
                "top-level document must be a mapping with a 'rules' sequence",
            )
        })?;

    let rules = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            parse_rule(entry).map_err(|reason| {
                LoadError::malformed(identifier, format!("rule #{}: {}", index + 1, reason))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(RuleSet::new(identifier, rules))
}

/// Parse one entry of the `rules` sequence.
fn parse_rule(entry: &Value) -> Result<FieldRule, String> {
    let entry = entry
        .as_object()
        .ok_or_else(|| "expected a mapping".to_string())?;

    let field = required_str(entry, "field")?;
    let type_name = required_str(entry, "type")?;
    let message = required_str(entry, "message")?;

    let field = FieldPath::parse(field)?;
    if message.is_empty() {
        return Err(format!("'message' for field '{}' is empty", field));
    }

    let kind: RuleKind = type_name
        .parse()
        .map_err(|_| format!("unknown rule type '{}' for field '{}'", type_name, field))?;
    let spec = spec_for(kind)
        .ok_or_else(|| format!("rule type '{}' has no registered validator", kind))?;
    let params = (spec.parse)(entry).map_err(|e| format!("{} rule on '{}': {}", kind, field, e))?;

    Ok(FieldRule {
        field,
        kind,
        message: message.to_string(),
        params,
    })
}

fn required_str<'a>(entry: &'a Map<String, Value>, key: &str) -> Result<&'a str, String> {
    match entry.get(key) {
        Some(Value::String(s)) => Ok(s.as_str()),
        Some(Value::Null) | None => Err(format!("missing '{}'", key)),
        Some(_) => Err(format!("'{}' must be a string", key)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Params;

    const USER_RULES: &str = r#"
rules:
  - field: "username"
    type: "notblank"
    message: "Username is required"
  - field: "username"
    type: "pattern"
    pattern: "^[a-zA-Z0-9_]+$"
    message: "Invalid username format"
  - field: "address.zipCode"
    type: "size"
    min: 5
    max: 5
    message: "Zip code must be 5 digits"
  - field: "age"
    type: "Min"
    value: 0
    message: "Age must be positive"
  - field: "address.state"
    type: "ENUM"
    values: ["NY", "CA"]
    message: "Invalid state"
    note: "extra keys are ignored"
"#;

    fn reason(err: LoadError) -> String {
        match err {
            LoadError::Malformed { reason, .. } => reason,
            other => panic!("expected Malformed, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_yaml_document() {
        let set = parse_rule_set("user-validation.yml", USER_RULES.as_bytes()).unwrap();
        assert_eq!(set.identifier(), "user-validation.yml");
        assert_eq!(set.len(), 5);

        let kinds: Vec<_> = set.iter().map(|r| r.kind).collect();
        assert_eq!(
            kinds,
            vec![
                RuleKind::NotBlank,
                RuleKind::Pattern,
                RuleKind::Size,
                RuleKind::Min,
                RuleKind::Enum
            ]
        );

        let zip = set.iter().nth(2).unwrap();
        assert_eq!(zip.field.as_str(), "address.zipCode");
        assert!(matches!(zip.params, Params::Size { min: 5, max: 5 }));
    }

    #[test]
    fn test_parse_json_document() {
        let json = r#"{"rules": [{"field": "name", "type": "notnull", "message": "required"}]}"#;
        let set = parse_rule_set("rules.json", json.as_bytes()).unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.iter().next().unwrap().message, "required");
    }

    #[test]
    fn test_empty_rule_list() {
        let set = parse_rule_set("empty.yml", b"rules: []").unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn test_top_level_shape() {
        for doc in ["- a\n- b", "rules: nope", "other: []", "42"] {
            let err = parse_rule_set("bad.yml", doc.as_bytes()).unwrap_err();
            assert!(reason(err).contains("'rules' sequence"), "doc: {}", doc);
        }
    }

    #[test]
    fn test_missing_required_keys() {
        let doc = "rules:\n  - field: name\n    type: notnull\n";
        let err = parse_rule_set("bad.yml", doc.as_bytes()).unwrap_err();
        assert_eq!(reason(err), "rule #1: missing 'message'");

        let doc = "rules:\n  - type: notnull\n    message: m\n";
        let err = parse_rule_set("bad.yml", doc.as_bytes()).unwrap_err();
        assert_eq!(reason(err), "rule #1: missing 'field'");
    }

    #[test]
    fn test_empty_message_is_rejected() {
        let doc = "rules:\n  - field: name\n    type: notnull\n    message: \"\"\n";
        let err = parse_rule_set("bad.yml", doc.as_bytes()).unwrap_err();
        assert!(reason(err).contains("'message' for field 'name' is empty"));
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let doc = r#"
rules:
  - field: name
    type: notnull
    message: ok
  - field: email
    type: email
    message: bad email
"#;
        let err = parse_rule_set("bad.yml", doc.as_bytes()).unwrap_err();
        assert_eq!(reason(err), "rule #2: unknown rule type 'email' for field 'email'");
    }

    #[test]
    fn test_bad_params_are_rejected() {
        let doc = "rules:\n  - field: zip\n    type: size\n    min: 5\n    message: m\n";
        let err = parse_rule_set("bad.yml", doc.as_bytes()).unwrap_err();
        assert_eq!(reason(err), "rule #1: size rule on 'zip': missing 'max'");
    }

    #[test]
    fn test_look_around_pattern_loads() {
        let doc = r#"
rules:
  - field: password
    type: pattern
    pattern: "^(?=.*[A-Z])(?=.*[0-9]).{8,}$"
    message: weak password
"#;
        let set = parse_rule_set("pw.yml", doc.as_bytes()).unwrap();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_invalid_syntax() {
        let err = parse_rule_set("bad.json", b"{ not json").unwrap_err();
        assert!(reason(err).starts_with("invalid JSON"));
    }

    #[test]
    fn test_format_from_name() {
        assert_eq!(DocumentFormat::from_name("a.json"), DocumentFormat::Json);
        assert_eq!(DocumentFormat::from_name("a.JSON"), DocumentFormat::Json);
        assert_eq!(DocumentFormat::from_name("a.yml"), DocumentFormat::Yaml);
        assert_eq!(DocumentFormat::from_name("user"), DocumentFormat::Yaml);
    }
}

// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Built-in rule kinds.
//!
//! Each [`RuleKind`] is registered once in [`RULE_TABLE`] with a parameter
//! parser (run at load time) and a check (run per record). Adding a kind
//! means adding a variant and a table entry.

use fancy_regex::Regex;
use serde_json::{Map, Value};
use tracing::warn;

use crate::record::Node;

use super::kind::RuleKind;
use super::rule::{FieldRule, Params};

/// Parses the kind-specific keys of a rule entry.
pub type ParamParser = fn(&Map<String, Value>) -> Result<Params, String>;

/// Checks one resolved value, returning an error message on failure.
pub type Check = fn(&FieldRule, &Node<'_>) -> Option<String>;

/// Registration of a rule kind.
pub struct RuleSpec {
    pub kind: RuleKind,
    pub parse: ParamParser,
    pub check: Check,
}

/// Every supported rule kind.
pub static RULE_TABLE: &[RuleSpec] = &[
    RuleSpec {
        kind: RuleKind::NotBlank,
        parse: parse_none,
        check: check_not_blank,
    },
    RuleSpec {
        kind: RuleKind::NotNull,
        parse: parse_none,
        check: check_not_null,
    },
    RuleSpec {
        kind: RuleKind::Size,
        parse: parse_size,
        check: check_size,
    },
    RuleSpec {
        kind: RuleKind::Min,
        parse: parse_min,
        check: check_min,
    },
    RuleSpec {
        kind: RuleKind::Pattern,
        parse: parse_pattern,
        check: check_pattern,
    },
    RuleSpec {
        kind: RuleKind::Enum,
        parse: parse_enum,
        check: check_enum,
    },
];

/// Look up the registration for a rule kind.
pub fn spec_for(kind: RuleKind) -> Option<&'static RuleSpec> {
    RULE_TABLE.iter().find(|spec| spec.kind == kind)
}

/// Evaluate one rule against the value resolved for its field.
pub fn evaluate(rule: &FieldRule, value: &Node<'_>) -> Option<String> {
    let spec = spec_for(rule.kind)?;
    (spec.check)(rule, value)
}

fn parse_none(_: &Map<String, Value>) -> Result<Params, String> {
    Ok(Params::None)
}

fn parse_size(entry: &Map<String, Value>) -> Result<Params, String> {
    let min = non_negative(entry, "min")?;
    let max = non_negative(entry, "max")?;
    if min > max {
        return Err(format!("'min' ({}) is greater than 'max' ({})", min, max));
    }
    Ok(Params::Size { min, max })
}

fn parse_min(entry: &Map<String, Value>) -> Result<Params, String> {
    let value = entry
        .get("value")
        .ok_or_else(|| "missing 'value'".to_string())?
        .as_i64()
        .ok_or_else(|| "'value' must be an integer".to_string())?;
    Ok(Params::Min { value })
}

fn parse_pattern(entry: &Map<String, Value>) -> Result<Params, String> {
    let source = entry
        .get("pattern")
        .ok_or_else(|| "missing 'pattern'".to_string())?
        .as_str()
        .ok_or_else(|| "'pattern' must be a string".to_string())?;

    // The whole value has to match, not just a substring.
    let regex = Regex::new(&format!("^(?:{})$", source))
        .map_err(|e| format!("invalid 'pattern' {:?}: {}", source, e))?;

    Ok(Params::Pattern {
        source: source.to_string(),
        regex,
    })
}

fn parse_enum(entry: &Map<String, Value>) -> Result<Params, String> {
    let values = entry
        .get("values")
        .ok_or_else(|| "missing 'values'".to_string())?
        .as_array()
        .ok_or_else(|| "'values' must be a sequence".to_string())?
        .iter()
        .map(|v| match v {
            Value::String(s) => Ok(s.clone()),
            Value::Number(n) => Ok(n.to_string()),
            Value::Bool(b) => Ok(b.to_string()),
            other => Err(format!("'values' entries must be scalars, found {}", other)),
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Params::Enum { values })
}

fn non_negative(entry: &Map<String, Value>, key: &str) -> Result<usize, String> {
    entry
        .get(key)
        .ok_or_else(|| format!("missing '{}'", key))?
        .as_u64()
        .and_then(|n| usize::try_from(n).ok())
        .ok_or_else(|| format!("'{}' must be a non-negative integer", key))
}

/// Fails when the value is absent or whitespace-only.
fn check_not_blank(rule: &FieldRule, value: &Node<'_>) -> Option<String> {
    match value.text() {
        Some(text) if !text.trim().is_empty() => None,
        _ => Some(rule.message.clone()),
    }
}

/// Fails when the value is absent.
fn check_not_null(rule: &FieldRule, value: &Node<'_>) -> Option<String> {
    value.is_absent().then(|| rule.message.clone())
}

fn check_size(rule: &FieldRule, value: &Node<'_>) -> Option<String> {
    let Params::Size { min, max } = &rule.params else {
        return None;
    };
    let len = value.text()?.chars().count();
    (len < *min || len > *max).then(|| rule.message.clone())
}

fn check_min(rule: &FieldRule, value: &Node<'_>) -> Option<String> {
    let Params::Min { value: min } = &rule.params else {
        return None;
    };
    match value.text()?.parse::<i64>() {
        Ok(n) if n < *min => Some(rule.message.clone()),
        Ok(_) => None,
        Err(_) => Some(format!("Invalid number format for field: {}", rule.field)),
    }
}

fn check_pattern(rule: &FieldRule, value: &Node<'_>) -> Option<String> {
    let Params::Pattern { regex, .. } = &rule.params else {
        return None;
    };
    let text = value.text()?;
    match regex.is_match(&text) {
        Ok(matched) => (!matched).then(|| rule.message.clone()),
        Err(e) => {
            // Backtracking limit hit; the value is treated as not matching.
            warn!(field = %rule.field, error = %e, "pattern could not be evaluated");
            Some(rule.message.clone())
        }
    }
}

fn check_enum(rule: &FieldRule, value: &Node<'_>) -> Option<String> {
    let Params::Enum { values } = &rule.params else {
        return None;
    };
    let text = value.text()?;
    (!values.iter().any(|v| *v == *text)).then(|| rule.message.clone())
}

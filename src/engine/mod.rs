// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Validation engine.
//!
//! Ties the pieces together: the [`RuleSetLoader`] finds and parses rule
//! documents, [`resolve`](crate::record::resolve) finds each rule's field in
//! the record, and [`evaluate`](crate::rules::evaluate) checks it.

mod bundle;
mod cache;
mod loader;
mod registry;

pub use bundle::Bundle;
pub use cache::RuleSetCache;
pub use loader::RuleSetLoader;
pub use registry::KindRegistry;

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::config::RkConfig;
use crate::error::{Result, RkError};
use crate::record::{self, Inspectable, Node};
use crate::rules::{self, RuleSet, ValidationResult};

/// Error reported for a missing record.
pub const NULL_RECORD: &str = "Cannot validate null data";

/// Validates records against rule sets.
#[derive(Debug)]
pub struct ValidationEngine {
    loader: RuleSetLoader,
    registry: KindRegistry,
}

impl ValidationEngine {
    /// Create an engine from a loader and a kind registry.
    pub fn new(loader: RuleSetLoader, registry: KindRegistry) -> Self {
        Self { loader, registry }
    }

    /// Create an engine from configuration and a set of bundled documents.
    ///
    /// `rules.resources`, when set, becomes the bundle's on-disk root.
    pub fn from_config(config: &RkConfig, bundle: Bundle) -> Result<Self> {
        let bundle = match &config.rules.resources {
            Some(root) if bundle.root().is_none() => bundle.with_root(root),
            _ => bundle,
        };

        let loader =
            RuleSetLoader::new(config.rules.location()?, bundle).with_cache(config.rules.cache);
        let registry = config.registry.iter().collect();

        Ok(Self::new(loader, registry))
    }

    /// The rule-set loader.
    pub fn loader(&self) -> &RuleSetLoader {
        &self.loader
    }

    /// The kind registry.
    pub fn registry(&self) -> &KindRegistry {
        &self.registry
    }

    /// Load the rule set for `identifier`.
    pub fn load_rule_set(&self, identifier: &str) -> Result<Arc<RuleSet>> {
        self.loader.resolve(identifier)
    }

    /// Validate `record` against the rule set named `identifier`.
    ///
    /// A missing record or a rule set that cannot be loaded produces a single
    /// error in the result. `Err` is reserved for internal failures.
    pub fn validate(&self, record: Option<Node<'_>>, identifier: &str) -> Result<ValidationResult> {
        let root = match record {
            Some(node) if !node.is_absent() => node,
            _ => return Ok(ValidationResult::failure(NULL_RECORD)),
        };

        let rule_set = match self.loader.resolve(identifier) {
            Ok(rule_set) => rule_set,
            Err(RkError::Load(e)) => {
                warn!(identifier, error = %e, "rule set could not be loaded");
                return Ok(ValidationResult::failure(format!("Error during validation: {}", e)));
            }
            Err(e) => return Err(e),
        };

        let result = apply(&rule_set, &root);
        debug!(
            identifier,
            rules = rule_set.len(),
            errors = result.errors().len(),
            "validated record"
        );
        Ok(result)
    }

    /// Validate a JSON record against the rule set named `identifier`.
    pub fn validate_json(&self, record: Option<&Value>, identifier: &str) -> Result<ValidationResult> {
        self.validate(record.map(Node::from_json), identifier)
    }

    /// Validate a JSON record whose kind is known, looking the rule set up
    /// in the registry.
    pub fn validate_json_as(&self, record: Option<&Value>, kind: &str) -> Result<ValidationResult> {
        if record.map_or(true, Value::is_null) {
            return Ok(ValidationResult::failure(NULL_RECORD));
        }
        match self.registry.lookup(kind) {
            Some(identifier) => self.validate_json(record, identifier),
            None => Ok(unregistered(kind)),
        }
    }

    /// Validate a typed object, looking its rule set up by
    /// [`Inspectable::kind`].
    pub fn validate_object(&self, record: Option<&dyn Inspectable>) -> Result<ValidationResult> {
        let Some(object) = record else {
            return Ok(ValidationResult::failure(NULL_RECORD));
        };
        match self.registry.lookup(object.kind()) {
            Some(identifier) => self.validate(Some(Node::object(object)), identifier),
            None => Ok(unregistered(object.kind())),
        }
    }
}

/// Evaluate every rule of `rule_set` against `root`, in declaration order.
pub fn apply(rule_set: &RuleSet, root: &Node<'_>) -> ValidationResult {
    rule_set
        .iter()
        .filter_map(|rule| {
            let value = record::resolve(root, &rule.field);
            rules::evaluate(rule, &value)
        })
        .collect()
}

fn unregistered(kind: &str) -> ValidationResult {
    ValidationResult::failure(format!("No validation rules specified for kind: {}", kind))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RulesLocation;
    use serde_json::json;
    use std::fs;
    use std::path::Path;

    const SCENARIO_A: &str = r#"
rules:
  - field: username
    type: notblank
    message: bad user
  - field: username
    type: pattern
    pattern: "^[a-zA-Z0-9_]+$"
    message: bad format
  - field: password
    type: size
    min: 8
    max: 100
    message: too short
  - field: password
    type: pattern
    pattern: ".*[A-Z].*"
    message: needs upper
  - field: password
    type: pattern
    pattern: ".*[0-9].*"
    message: needs digit
"#;

    const SCENARIO_B: &str = r#"
rules:
  - field: name
    type: notblank
    message: blank
  - field: name
    type: size
    min: 2
    max: 50
    message: len
"#;

    const SCENARIO_C: &str = "rules:\n  - field: age\n    type: min\n    value: 0\n    message: neg\n";

    const SCENARIO_D: &str = r#"
rules:
  - field: state
    type: enum
    values: ["NY", "CA"]
    message: bad state
"#;

    const SCENARIO_E: &str = r#"
rules:
  - field: address.zipCode
    type: pattern
    pattern: "\\d{5}"
    message: bad zip
  - field: address.zipCode
    type: notnull
    message: required
"#;

    fn engine_with(dir: &Path, docs: &[(&str, &str)]) -> ValidationEngine {
        for (name, content) in docs {
            fs::write(dir.join(name), content).unwrap();
        }
        let loader = RuleSetLoader::new(RulesLocation::Directory(dir.to_path_buf()), Bundle::new())
            .with_cache(true);
        ValidationEngine::new(loader, KindRegistry::new().with("user", "a.yml"))
    }

    fn errors(result: ValidationResult) -> Vec<String> {
        assert_eq!(result.is_valid(), result.errors().is_empty());
        result.into_errors()
    }

    #[test]
    fn test_scenario_a_errors_follow_rule_order() {
        let dir = tempfile::tempdir().unwrap();
        let engine = engine_with(dir.path(), &[("a.yml", SCENARIO_A)]);

        let record = json!({"username": "john@doe", "password": "password"});
        let result = engine.validate_json(Some(&record), "a.yml").unwrap();
        // "password" is 8 characters, so the size rule passes.
        assert_eq!(errors(result), vec!["bad format", "needs upper", "needs digit"]);

        let record = json!({"username": "john@doe", "password": "pass"});
        let result = engine.validate_json(Some(&record), "a.yml").unwrap();
        assert_eq!(
            errors(result),
            vec!["bad format", "too short", "needs upper", "needs digit"]
        );
    }

    #[test]
    fn test_scenario_b_empty_string_fails_both() {
        let dir = tempfile::tempdir().unwrap();
        let engine = engine_with(dir.path(), &[("b.yml", SCENARIO_B)]);

        let record = json!({"name": ""});
        let result = engine.validate_json(Some(&record), "b.yml").unwrap();
        assert_eq!(errors(result), vec!["blank", "len"]);
    }

    #[test]
    fn test_scenario_c_number_format() {
        let dir = tempfile::tempdir().unwrap();
        let engine = engine_with(dir.path(), &[("c.yml", SCENARIO_C)]);

        let record = json!({"age": "abc"});
        let result = engine.validate_json(Some(&record), "c.yml").unwrap();
        assert_eq!(errors(result), vec!["Invalid number format for field: age"]);

        let record = json!({"age": -1});
        let result = engine.validate_json(Some(&record), "c.yml").unwrap();
        assert_eq!(errors(result), vec!["neg"]);

        let record = json!({"age": 25});
        assert!(engine.validate_json(Some(&record), "c.yml").unwrap().is_valid());
    }

    #[test]
    fn test_scenario_d_enum() {
        let dir = tempfile::tempdir().unwrap();
        let engine = engine_with(dir.path(), &[("d.yml", SCENARIO_D)]);

        let record = json!({"state": "XX"});
        let result = engine.validate_json(Some(&record), "d.yml").unwrap();
        assert_eq!(errors(result), vec!["bad state"]);

        let record = json!({"state": "NY"});
        assert!(engine.validate_json(Some(&record), "d.yml").unwrap().is_valid());
    }

    #[test]
    fn test_scenario_e_missing_nested_object() {
        let dir = tempfile::tempdir().unwrap();
        let engine = engine_with(dir.path(), &[("e.yml", SCENARIO_E)]);

        let record = json!({"username": "john"});
        let result = engine.validate_json(Some(&record), "e.yml").unwrap();
        assert_eq!(errors(result), vec!["required"]);
    }

    #[test]
    fn test_null_record() {
        let dir = tempfile::tempdir().unwrap();
        let engine = engine_with(dir.path(), &[("b.yml", SCENARIO_B)]);

        let result = engine.validate_json(None, "b.yml").unwrap();
        assert_eq!(errors(result), vec![NULL_RECORD]);

        let result = engine.validate_json(Some(&Value::Null), "b.yml").unwrap();
        assert_eq!(errors(result), vec![NULL_RECORD]);

        let result = engine.validate_object(None).unwrap();
        assert_eq!(errors(result), vec![NULL_RECORD]);
    }

    #[test]
    fn test_missing_rule_set_is_a_single_error() {
        let dir = tempfile::tempdir().unwrap();
        let engine = engine_with(dir.path(), &[]);

        let record = json!({"name": "x"});
        let result = engine.validate_json(Some(&record), "nope.yml").unwrap();
        let errors = errors(result);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("Error during validation: Rule set not found: nope.yml"));
    }

    #[test]
    fn test_malformed_rule_set_is_a_single_error() {
        let dir = tempfile::tempdir().unwrap();
        let engine = engine_with(
            dir.path(),
            &[("bad.yml", "rules:\n  - field: name\n    type: notblank\n")],
        );

        let record = json!({"name": "x"});
        let result = engine.validate_json(Some(&record), "bad.yml").unwrap();
        let errors = errors(result);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("Malformed rule set 'bad.yml'"));
    }

    #[test]
    fn test_validate_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let engine = engine_with(dir.path(), &[("a.yml", SCENARIO_A)]);

        let record = json!({"username": "john@doe", "password": "pass"});
        let first = engine.validate_json(Some(&record), "a.yml").unwrap();
        let second = engine.validate_json(Some(&record), "a.yml").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_errors_stay_in_rule_order_across_fields() {
        let dir = tempfile::tempdir().unwrap();
        let doc = r#"
rules:
  - field: b
    type: notnull
    message: b1
  - field: a
    type: notnull
    message: a1
  - field: b
    type: notblank
    message: b2
"#;
        let engine = engine_with(dir.path(), &[("o.yml", doc)]);
        let record = json!({});
        let result = engine.validate_json(Some(&record), "o.yml").unwrap();
        assert_eq!(errors(result), vec!["b1", "a1", "b2"]);
    }

    struct Address {
        state: String,
        zip_code: String,
    }

    impl Inspectable for Address {
        fn kind(&self) -> &str {
            "address"
        }

        fn member(&self, name: &str) -> Node<'_> {
            match name {
                "state" => (&self.state).into(),
                "zipCode" => (&self.zip_code).into(),
                _ => Node::Absent,
            }
        }
    }

    struct User {
        username: String,
        password: String,
        address: Option<Address>,
    }

    impl Inspectable for User {
        fn kind(&self) -> &str {
            "user"
        }

        fn member(&self, name: &str) -> Node<'_> {
            match name {
                "username" => (&self.username).into(),
                "password" => (&self.password).into(),
                "address" => Node::nested(self.address.as_ref()),
                _ => Node::Absent,
            }
        }
    }

    #[test]
    fn test_validate_object_through_registry() {
        let dir = tempfile::tempdir().unwrap();
        let engine = engine_with(dir.path(), &[("a.yml", SCENARIO_A)]);

        let user = User {
            username: "john_doe".to_string(),
            password: "Password123".to_string(),
            address: Some(Address {
                state: "NY".to_string(),
                zip_code: "10001".to_string(),
            }),
        };
        assert!(engine.validate_object(Some(&user)).unwrap().is_valid());

        let user = User {
            username: "john@doe".to_string(),
            password: "password".to_string(),
            address: None,
        };
        let result = engine.validate_object(Some(&user)).unwrap();
        assert_eq!(errors(result), vec!["bad format", "needs upper", "needs digit"]);
    }

    #[test]
    fn test_unregistered_kind() {
        let dir = tempfile::tempdir().unwrap();
        let engine = engine_with(dir.path(), &[]);

        let address = Address {
            state: "NY".to_string(),
            zip_code: "10001".to_string(),
        };
        let result = engine.validate_object(Some(&address)).unwrap();
        assert_eq!(
            errors(result),
            vec!["No validation rules specified for kind: address"]
        );

        let record = json!({"x": 1});
        let result = engine.validate_json_as(Some(&record), "order").unwrap();
        assert_eq!(
            errors(result),
            vec!["No validation rules specified for kind: order"]
        );
    }

    #[test]
    fn test_null_record_wins_over_unregistered_kind() {
        let dir = tempfile::tempdir().unwrap();
        let engine = engine_with(dir.path(), &[]);

        let result = engine.validate_json_as(Some(&Value::Null), "order").unwrap();
        assert_eq!(errors(result), vec![NULL_RECORD]);

        let result = engine.validate_json_as(None, "order").unwrap();
        assert_eq!(errors(result), vec![NULL_RECORD]);
    }

    #[test]
    fn test_validate_json_as_registered_kind() {
        let dir = tempfile::tempdir().unwrap();
        let engine = engine_with(dir.path(), &[("a.yml", SCENARIO_A)]);

        let record = json!({"username": "", "password": "Secret123"});
        let result = engine.validate_json_as(Some(&record), "user").unwrap();
        assert_eq!(errors(result), vec!["bad user", "bad format"]);
    }

    #[test]
    fn test_from_config() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.yml"), SCENARIO_B).unwrap();

        let mut config = RkConfig::default();
        config.rules.location = format!("file:{}", dir.path().display());
        config.rules.cache = false;
        config
            .registry
            .insert("person".to_string(), "b.yml".to_string());

        let engine = ValidationEngine::from_config(&config, Bundle::new()).unwrap();
        assert!(!engine.loader().is_caching());
        assert_eq!(engine.registry().lookup("person"), Some("b.yml"));

        let record = json!({"name": "A"});
        let result = engine.validate_json_as(Some(&record), "person").unwrap();
        assert_eq!(errors(result), vec!["len"]);
    }

    #[test]
    fn test_concurrent_validation_shares_rule_set() {
        let dir = tempfile::tempdir().unwrap();
        let engine = engine_with(dir.path(), &[("a.yml", SCENARIO_A)]);
        let record = json!({"username": "john@doe", "password": "pass"});

        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| scope.spawn(|| engine.validate_json(Some(&record), "a.yml").unwrap()))
                .collect();
            for handle in handles {
                assert_eq!(handle.join().unwrap().errors().len(), 4);
            }
        });
    }
}

// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Rule definitions and evaluation.
//!
//! This module parses rule documents into ordered [`RuleSet`]s and evaluates
//! single rules against resolved record values.

mod builtin;
mod document;
mod kind;
mod rule;
mod validator;

pub use builtin::{evaluate, spec_for, Check, ParamParser, RuleSpec, RULE_TABLE};
pub use document::{parse_rule_set, parse_rule_set_as, DocumentFormat};
pub use kind::RuleKind;
pub use rule::{FieldPath, FieldRule, Params, RuleSet};
pub use validator::ValidationResult;

// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! The closed set of rule kinds.

/// Rule kind declared by the `type` key of a rule document entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    NotBlank,
    NotNull,
    Size,
    Min,
    Pattern,
    Enum,
}

impl RuleKind {
    /// Get the document name of the rule kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleKind::NotBlank => "notblank",
            RuleKind::NotNull => "notnull",
            RuleKind::Size => "size",
            RuleKind::Min => "min",
            RuleKind::Pattern => "pattern",
            RuleKind::Enum => "enum",
        }
    }

    /// Get a description of the rule kind.
    pub fn description(&self) -> &'static str {
        match self {
            RuleKind::NotBlank => "Value must be present and not whitespace-only",
            RuleKind::NotNull => "Value must be present",
            RuleKind::Size => "Text length must lie within [min, max]",
            RuleKind::Min => "Value must be an integer no smaller than `value`",
            RuleKind::Pattern => "Whole value must match the regular expression",
            RuleKind::Enum => "Value must be one of `values`",
        }
    }

    /// Get all rule kinds.
    pub fn all() -> &'static [RuleKind] {
        &[
            RuleKind::NotBlank,
            RuleKind::NotNull,
            RuleKind::Size,
            RuleKind::Min,
            RuleKind::Pattern,
            RuleKind::Enum,
        ]
    }
}

impl std::str::FromStr for RuleKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase();
        RuleKind::all()
            .iter()
            .copied()
            .find(|kind| kind.as_str() == name)
            .ok_or(())
    }
}

impl std::fmt::Display for RuleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_kind_from_str_is_case_insensitive() {
        assert_eq!("notblank".parse::<RuleKind>(), Ok(RuleKind::NotBlank));
        assert_eq!("NotBlank".parse::<RuleKind>(), Ok(RuleKind::NotBlank));
        assert_eq!("PATTERN".parse::<RuleKind>(), Ok(RuleKind::Pattern));
        assert_eq!("Enum".parse::<RuleKind>(), Ok(RuleKind::Enum));
        assert!("email".parse::<RuleKind>().is_err());
        assert!("".parse::<RuleKind>().is_err());
    }

    #[test]
    fn test_rule_kind_display_round_trips() {
        for kind in RuleKind::all() {
            assert_eq!(kind.to_string().parse::<RuleKind>(), Ok(*kind));
        }
    }
}

//! Core types for the rule database.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single makefile rule: a target, its dependencies, and a recipe.
///
/// Dependencies and recipe lines are stored as written; the engine expands
/// variable references in both at build time. Duplicate definitions for the
/// same target are kept as independent rules — the store decides which one
/// is visible.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rule {
    /// Target name, expanded at parse time.
    pub target: String,

    /// Dependency names in file order.
    #[serde(default)]
    pub deps: Vec<String>,

    /// Recipe lines, verbatim (leading tab retained).
    #[serde(default)]
    pub recipe: Vec<String>,

    /// Target contains `%`. Pattern rules are stored but never matched.
    #[serde(default)]
    pub is_pattern: bool,
}

impl Rule {
    /// Create an empty rule for `target`.
    pub fn new(target: impl Into<String>) -> Self {
        let target = target.into();
        let is_pattern = target.contains('%');
        Rule {
            target,
            deps: Vec::new(),
            recipe: Vec::new(),
            is_pattern,
        }
    }
}

/// Tri-state classification of a rule, decided after its dependencies have
/// been satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Empty recipe and every dependency already satisfied.
    NothingToDo,
    /// Recipe present, target file exists and is not older than any
    /// dependency file.
    UpToDate,
    /// Work required.
    NeedsBuild,
}

impl fmt::Display for Disposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NothingToDo => write!(f, "nothing-to-do"),
            Self::UpToDate => write!(f, "up-to-date"),
            Self::NeedsBuild => write!(f, "needs-build"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_new_plain_target() {
        let r = Rule::new("app");
        assert_eq!(r.target, "app");
        assert!(r.deps.is_empty());
        assert!(r.recipe.is_empty());
        assert!(!r.is_pattern);
    }

    #[test]
    fn test_rule_new_detects_pattern() {
        assert!(Rule::new("%.o").is_pattern);
        assert!(Rule::new("src/%.c").is_pattern);
        assert!(!Rule::new("main.o").is_pattern);
    }

    #[test]
    fn test_disposition_display() {
        assert_eq!(Disposition::NothingToDo.to_string(), "nothing-to-do");
        assert_eq!(Disposition::UpToDate.to_string(), "up-to-date");
        assert_eq!(Disposition::NeedsBuild.to_string(), "needs-build");
    }

    #[test]
    fn test_rule_serde_roundtrip() {
        let mut r = Rule::new("app");
        r.deps = vec!["main.o".to_string(), "util.o".to_string()];
        r.recipe = vec!["\tcc -o app main.o util.o".to_string()];
        let json = serde_json::to_string(&r).unwrap();
        let back: Rule = serde_json::from_str(&json).unwrap();
        assert_eq!(back.target, "app");
        assert_eq!(back.deps.len(), 2);
        assert_eq!(back.recipe.len(), 1);
    }
}

//! Rule store: every parsed definition, in file order.

use crate::core::types::Rule;
use serde::Serialize;

/// All rules from one makefile.
///
/// Duplicate definitions for a target are kept as independent entries; the
/// one `find` returns — the last in file order — is the visible definition.
/// `.PHONY` is captured into its own slot and never enters the general
/// collection.
#[derive(Debug, Default, Serialize)]
pub struct RuleStore {
    rules: Vec<Rule>,
    phony: Option<Rule>,
}

impl RuleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parsed rule, in file order.
    pub fn add(&mut self, rule: Rule) {
        if rule.target == ".PHONY" {
            self.phony = Some(rule);
            return;
        }
        self.rules.push(rule);
    }

    /// The visible definition of `target`: the last non-pattern rule with
    /// that exact name. Pattern rules are never matched.
    pub fn find(&self, target: &str) -> Option<&Rule> {
        self.rules
            .iter()
            .rev()
            .find(|r| !r.is_pattern && r.target == target)
    }

    /// The default target: the first non-pattern rule in file order.
    pub fn default_target(&self) -> Option<&Rule> {
        self.rules.iter().find(|r| !r.is_pattern)
    }

    /// True iff `target` appears in `.PHONY`'s dependency list.
    pub fn is_phony(&self, target: &str) -> bool {
        self.phony
            .as_ref()
            .is_some_and(|p| p.deps.iter().any(|d| d == target))
    }

    /// The captured `.PHONY` rule, if the makefile declared one.
    pub fn phony(&self) -> Option<&Rule> {
        self.phony.as_ref()
    }

    /// Iterate every stored rule in file order (`.PHONY` excluded).
    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

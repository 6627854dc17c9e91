//! Drug/condition interaction rule engine.
//!
//! Evaluation algorithm:
//!
//! 1. Collect the ids of the selected medicines.
//! 2. Iterate rules in declaration order.
//! 3. Every rule whose predicate holds appends its warning.
//!
//! No short-circuiting, deduplication, or suppression: the output is a pure
//! function of the rule set, the selection, and the profile.

mod rule;

pub use rule::*;

use std::collections::HashSet;

use tracing::debug;

use crate::models::{InteractionWarning, MedicineRecord, PatientProfile};

/// An ordered list of interaction rules.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleSet {
    rules: Vec<InteractionRule>,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::builtin()
    }
}

impl RuleSet {
    /// The built-in rules only.
    pub fn builtin() -> Self {
        Self {
            rules: builtin_rules(),
        }
    }

    /// A rule set with exactly `rules`, in the given order.
    pub fn from_rules(rules: Vec<InteractionRule>) -> Self {
        Self { rules }
    }

    /// Append rules after the existing ones.
    pub fn with_extra(mut self, extra: impl IntoIterator<Item = InteractionRule>) -> Self {
        self.rules.extend(extra);
        self
    }

    /// Evaluate every rule against `meds` and `profile`.
    pub fn check<'a>(
        &self,
        meds: impl IntoIterator<Item = &'a MedicineRecord>,
        profile: &PatientProfile,
    ) -> Vec<InteractionWarning> {
        let selected: HashSet<&str> = meds.into_iter().map(|m| m.id.as_str()).collect();

        self.rules
            .iter()
            .filter(|rule| rule.matches(&selected, profile))
            .map(|rule| {
                debug!(rule_id = %rule.id, "interaction rule fired");
                InteractionWarning {
                    rule_id: rule.id.clone(),
                    message: rule.message.clone(),
                }
            })
            .collect()
    }

    /// Get a rule by id.
    pub fn get(&self, id: &str) -> Option<&InteractionRule> {
        self.rules.iter().find(|r| r.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &InteractionRule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Evaluate the built-in rules against `meds` and `profile`.
pub fn check_interactions<'a>(
    meds: impl IntoIterator<Item = &'a MedicineRecord>,
    profile: &PatientProfile,
) -> Vec<InteractionWarning> {
    RuleSet::builtin().check(meds, profile)
}

//! Interaction rule types.
//!
//! A rule is plain data: an id, the message it emits, and a conjunctive
//! predicate over the selected medicine ids and the patient profile. Built-in
//! rules and rules loaded from configuration share this type.
//!
//! Example in TOML:
//! ```toml
//! [[rules]]
//! id = "diclofenac-ulcer"
//! message = "Diclofenac with ulcer history: high risk of gastric bleeding."
//! requires_all = ["diclofenac"]
//! profile_flag = "ulcer"
//! ```

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::models::PatientProfile;

/// Reference medicine ids the built-in rules anchor on.
pub mod reference {
    pub const IBUPROFEN: &str = "ibuprofen";
    pub const AMOXICLAV: &str = "amoxiclav";
    pub const PARACETAMOL: &str = "paracetamol";
    pub const PENICILLIN: &str = "penicillin";
}

/// A boolean profile condition a rule can require.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProfileFlag {
    Liver,
    Ulcer,
}

impl ProfileFlag {
    pub fn is_set(&self, profile: &PatientProfile) -> bool {
        match self {
            ProfileFlag::Liver => profile.liver,
            ProfileFlag::Ulcer => profile.ulcer,
        }
    }
}

/// A single interaction rule.
///
/// Every present condition must hold for the rule to fire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionRule {
    /// Stable identifier carried on the emitted warning
    pub id: String,
    /// Message shown when the rule fires
    pub message: String,
    /// Medicine ids that must all be selected
    #[serde(default)]
    pub requires_all: Vec<String>,
    /// Profile flag that must be set
    #[serde(default)]
    pub profile_flag: Option<ProfileFlag>,
    /// Allergen the patient must list
    #[serde(default)]
    pub allergen: Option<String>,
    /// Minimum patient age
    #[serde(default)]
    pub min_age: Option<u32>,
}

impl InteractionRule {
    /// Create a rule that fires when all `ids` are selected.
    pub fn new(
        id: impl Into<String>,
        message: impl Into<String>,
        ids: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            id: id.into(),
            message: message.into(),
            requires_all: ids.into_iter().map(Into::into).collect(),
            profile_flag: None,
            allergen: None,
            min_age: None,
        }
    }

    pub fn with_profile_flag(mut self, flag: ProfileFlag) -> Self {
        self.profile_flag = Some(flag);
        self
    }

    pub fn with_allergen(mut self, allergen: impl Into<String>) -> Self {
        self.allergen = Some(allergen.into());
        self
    }

    pub fn with_min_age(mut self, age: u32) -> Self {
        self.min_age = Some(age);
        self
    }

    /// Check whether the rule fires for the selected ids and profile.
    pub fn matches(&self, selected: &HashSet<&str>, profile: &PatientProfile) -> bool {
        let meds_present = self
            .requires_all
            .iter()
            .all(|id| selected.contains(id.as_str()));
        let flag_set = self.profile_flag.map_or(true, |flag| flag.is_set(profile));
        let allergic = self
            .allergen
            .as_deref()
            .map_or(true, |allergen| profile.is_allergic_to(allergen));
        let old_enough = self.min_age.map_or(true, |age| profile.age >= age);

        meds_present && flag_set && allergic && old_enough
    }
}

/// The built-in rules, in evaluation order.
pub fn builtin_rules() -> Vec<InteractionRule> {
    use reference::*;

    vec![
        InteractionRule::new(
            "nsaid-antibiotic-gastric",
            "Ibuprofen with Amoxiclav: NSAID plus antibiotic can aggravate gastric \
             irritation. Take with food and monitor for stomach upset.",
            [IBUPROFEN, AMOXICLAV],
        ),
        InteractionRule::new(
            "paracetamol-liver",
            "Paracetamol with liver disease: use the lowest effective dose and do not \
             exceed 2 g/day without medical advice.",
            [PARACETAMOL],
        )
        .with_profile_flag(ProfileFlag::Liver),
        InteractionRule::new(
            "amoxiclav-penicillin-allergy",
            "Amoxiclav contains a penicillin: avoid it with a penicillin allergy and ask \
             for a non-penicillin alternative.",
            [AMOXICLAV],
        )
        .with_allergen(PENICILLIN),
        InteractionRule::new(
            "nsaid-ulcer",
            "Ibuprofen with ulcer history: NSAIDs raise the risk of gastric bleeding. \
             Consider paracetamol instead.",
            [IBUPROFEN],
        )
        .with_profile_flag(ProfileFlag::Ulcer),
    ]
}

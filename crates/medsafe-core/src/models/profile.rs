//! Patient profile models.

use serde::{Deserialize, Serialize};

/// Default patient age when none is configured.
pub const DEFAULT_AGE: u32 = 21;

/// Default region code for brand lookups.
pub const DEFAULT_REGION: &str = "IN";

/// The patient context the engine evaluates a selection against.
///
/// Any field missing from a serialized profile takes its default, so a
/// partial `[profile]` table or JSON object is valid.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct PatientProfile {
    /// Age in years
    pub age: u32,
    /// Region code used for local brand lookups
    pub region: String,
    /// Known allergens (matched case-insensitively)
    pub allergies: Vec<String>,
    /// History of peptic ulcer
    pub ulcer: bool,
    /// Liver disease
    pub liver: bool,
    /// Presentation-only: show the brand mapper panel
    pub brand_mapper: bool,
    /// Presentation-only: show explanations
    pub explain: bool,
    /// Presentation-only: show cost comparisons
    pub cost: bool,
    /// Presentation-only: display language
    pub lang: String,
}

impl Default for PatientProfile {
    fn default() -> Self {
        Self {
            age: DEFAULT_AGE,
            region: DEFAULT_REGION.to_string(),
            allergies: Vec::new(),
            ulcer: false,
            liver: false,
            brand_mapper: true,
            explain: true,
            cost: true,
            lang: "en".to_string(),
        }
    }
}

impl PatientProfile {
    /// Check if the patient lists `allergen`, ignoring case and padding.
    pub fn is_allergic_to(&self, allergen: &str) -> bool {
        let allergen = allergen.trim();
        self.allergies
            .iter()
            .any(|a| a.trim().eq_ignore_ascii_case(allergen))
    }

    /// Add an allergen unless it is already listed.
    pub fn add_allergy(&mut self, allergen: impl Into<String>) {
        let allergen = allergen.into();
        if !self.is_allergic_to(&allergen) {
            self.allergies.push(allergen);
        }
    }
}

//! Engine output models: warnings, risk profile, substitutions.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::MedicineRecord;

/// A human-readable interaction warning.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InteractionWarning {
    /// Id of the rule that fired
    pub rule_id: String,
    /// Message shown to the user
    pub message: String,
}

impl fmt::Display for InteractionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// One axis of the aggregate risk score.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum RiskDimension {
    Sedation,
    Gastro,
    Liver,
    Kidney,
    Interactions,
    Allergy,
}

impl RiskDimension {
    /// All dimensions, in display order.
    pub const ALL: [RiskDimension; 6] = [
        RiskDimension::Sedation,
        RiskDimension::Gastro,
        RiskDimension::Liver,
        RiskDimension::Kidney,
        RiskDimension::Interactions,
        RiskDimension::Allergy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskDimension::Sedation => "Sedation",
            RiskDimension::Gastro => "Gastro",
            RiskDimension::Liver => "Liver",
            RiskDimension::Kidney => "Kidney",
            RiskDimension::Interactions => "Interactions",
            RiskDimension::Allergy => "Allergy",
        }
    }
}

impl fmt::Display for RiskDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-dimension clinical risk, each value in `0..=100`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct RiskProfile {
    pub sedation: u8,
    pub gastro: u8,
    pub liver: u8,
    pub kidney: u8,
    pub interactions: u8,
    pub allergy: u8,
}

impl RiskProfile {
    /// Value for a single dimension.
    pub fn get(&self, dimension: RiskDimension) -> u8 {
        match dimension {
            RiskDimension::Sedation => self.sedation,
            RiskDimension::Gastro => self.gastro,
            RiskDimension::Liver => self.liver,
            RiskDimension::Kidney => self.kidney,
            RiskDimension::Interactions => self.interactions,
            RiskDimension::Allergy => self.allergy,
        }
    }

    /// `(dimension, value)` pairs in display order.
    pub fn dimensions(&self) -> [(RiskDimension, u8); 6] {
        RiskDimension::ALL.map(|d| (d, self.get(d)))
    }

    /// Highest value across all dimensions.
    pub fn peak(&self) -> u8 {
        self.dimensions()
            .iter()
            .map(|(_, v)| *v)
            .max()
            .unwrap_or(0)
    }
}

/// Equivalents and the cheapest option for one target medicine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubstitutionResult {
    /// Lowest-priced record among the target and its same-class records
    pub cheapest: MedicineRecord,
    /// Records with exactly the target's ingredient set
    pub exact_generic: Vec<MedicineRecord>,
    /// Records sharing the target's class
    pub same_class: Vec<MedicineRecord>,
    /// Target brand names sold in the patient's region
    pub local_brands: Vec<String>,
}

impl SubstitutionResult {
    /// Saving per unit from switching the target to the cheapest option.
    pub fn saving_over(&self, target: &MedicineRecord) -> f64 {
        (target.price_inr - self.cheapest.price_inr).max(0.0)
    }
}

/// Brand equivalents of one medicine between two regions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BrandMapping {
    pub id: String,
    pub name: String,
    pub generic: String,
    #[serde(rename = "class")]
    pub class_name: String,
    /// Brands sold in the source region (or globally)
    pub from: Vec<String>,
    /// Brands sold in the destination region (or globally)
    pub to: Vec<String>,
}

/// What the surrounding UI renders after every selection/profile change.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Assessment {
    pub warnings: Vec<InteractionWarning>,
    pub risk: RiskProfile,
}

impl Assessment {
    /// Check if any interaction rule fired.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

//! Aggregate clinical risk scoring.
//!
//! Points per dimension:
//! - Sedation: +25 per medicine with a sedating side effect
//! - Gastro: +40 per NSAID, +30 for ulcer history
//! - Liver: +40 per paracetamol/acetaminophen product, +30 for liver disease
//! - Kidney: +20 per medicine contraindicated in kidney disease
//! - Interactions: +25 per interaction warning
//! - Allergy: 100 for amoxiclav with a penicillin allergy
//!
//! Points compound across medicines; each dimension is clamped to 0-100 only
//! at the end.

use crate::interactions::{reference, RuleSet};
use crate::models::{MedicineRecord, PatientProfile, RiskProfile};

const SEDATING_EFFECTS: &[&str] = &["drowsiness", "sedation", "fatigue"];
const HEPATIC_INGREDIENTS: &[&str] = &["paracetamol", "acetaminophen"];
const RENAL_TERMS: &[&str] = &["kidney", "renal"];

const SEDATION_POINTS: i64 = 25;
const NSAID_GASTRO_POINTS: i64 = 40;
const HEPATIC_LIVER_POINTS: i64 = 40;
const RENAL_KIDNEY_POINTS: i64 = 20;
const ULCER_GASTRO_POINTS: i64 = 30;
const LIVER_DISEASE_POINTS: i64 = 30;
const POINTS_PER_INTERACTION: i64 = 25;
const ALLERGY_POINTS: i64 = 100;

const MAX_SCORE: i64 = 100;

/// Score `selection` against `profile`, counting warnings from `rules`.
pub fn risk_score(
    selection: &[&MedicineRecord],
    profile: &PatientProfile,
    rules: &RuleSet,
) -> RiskProfile {
    let mut sedation = 0;
    let mut gastro = 0;
    let mut liver = 0;
    let mut kidney = 0;

    for med in selection {
        if any_mentions(&med.side_effects, SEDATING_EFFECTS) {
            sedation += SEDATION_POINTS;
        }
        if med.is_class("nsaid") {
            gastro += NSAID_GASTRO_POINTS;
        }
        if any_mentions(&med.ingredients, HEPATIC_INGREDIENTS) {
            liver += HEPATIC_LIVER_POINTS;
        }
        if any_mentions(&med.contraindications, RENAL_TERMS) {
            kidney += RENAL_KIDNEY_POINTS;
        }
    }

    if profile.ulcer {
        gastro += ULCER_GASTRO_POINTS;
    }
    if profile.liver {
        liver += LIVER_DISEASE_POINTS;
    }

    let warning_count = rules.check(selection.iter().copied(), profile).len() as i64;
    let interactions = POINTS_PER_INTERACTION.saturating_mul(warning_count);

    let has_amoxiclav = selection.iter().any(|m| m.id == reference::AMOXICLAV);
    let allergy = if has_amoxiclav && profile.is_allergic_to(reference::PENICILLIN) {
        ALLERGY_POINTS
    } else {
        0
    };

    RiskProfile {
        sedation: clamp(sedation),
        gastro: clamp(gastro),
        liver: clamp(liver),
        kidney: clamp(kidney),
        interactions: clamp(interactions),
        allergy: clamp(allergy),
    }
}

fn clamp(points: i64) -> u8 {
    // Bounded to 0..=100, so the cast is lossless
    points.clamp(0, MAX_SCORE) as u8
}

/// Check if any entry contains any of `needles`, case-insensitively.
///
/// `needles` must already be lowercase.
fn any_mentions(entries: &[String], needles: &[&str]) -> bool {
    entries.iter().any(|entry| {
        let lower = entry.to_lowercase();
        needles.iter().any(|needle| lower.contains(needle))
    })
}

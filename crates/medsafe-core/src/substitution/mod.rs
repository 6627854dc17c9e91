//! Substitution optimizer.
//!
//! For one target medicine, finds same-class alternatives, exact generic
//! equivalents (same ingredient set), the cheapest option, and the target's
//! brands sold in the patient's region.

mod brands;

pub use brands::*;

use std::cmp::Ordering;

use crate::catalog::Catalog;
use crate::models::{MedicineRecord, PatientProfile, SubstitutionResult};

/// Compute substitutes and the cheapest option for `target`.
///
/// Deterministic given the catalog and `profile.region`. The target itself
/// (by id) never appears in `same_class` or `exact_generic`.
pub fn substitute_and_optimize(
    catalog: &Catalog,
    target: &MedicineRecord,
    profile: &PatientProfile,
) -> SubstitutionResult {
    let same_class: Vec<MedicineRecord> = others(catalog, target)
        .filter(|r| r.class_name == target.class_name)
        .cloned()
        .collect();

    let exact_generic: Vec<MedicineRecord> = others(catalog, target)
        .filter(|r| target.has_same_ingredients(r))
        .cloned()
        .collect();

    let cheapest = cheapest_of(std::iter::once(target).chain(same_class.iter()))
        .unwrap_or(target)
        .clone();

    SubstitutionResult {
        cheapest,
        exact_generic,
        same_class,
        local_brands: target.brands_in(&profile.region),
    }
}

/// Catalog records other than `target`, in catalog order.
fn others<'a>(
    catalog: &'a Catalog,
    target: &'a MedicineRecord,
) -> impl Iterator<Item = &'a MedicineRecord> + 'a {
    catalog.iter().filter(move |r| r.id != target.id)
}

/// Lowest-priced record; the first one wins ties.
fn cheapest_of<'a>(
    records: impl IntoIterator<Item = &'a MedicineRecord>,
) -> Option<&'a MedicineRecord> {
    records.into_iter().fold(None, |best, candidate| match best {
        Some(current)
            if candidate.price_inr.partial_cmp(&current.price_inr) != Some(Ordering::Less) =>
        {
            Some(current)
        }
        _ => Some(candidate),
    })
}

//! Property tests over generated catalogs, selections, and profiles.

use proptest::prelude::*;

use medsafe_core::models::{Brand, MedicineRecord, PatientProfile};
use medsafe_core::search::SearchIndex;
use medsafe_core::session::SelectionState;
use medsafe_core::{check_interactions, risk_score, substitute_and_optimize, Catalog, RuleSet};

const IDS: &[&str] = &[
    "ibuprofen",
    "amoxiclav",
    "paracetamol",
    "cetirizine",
    "diclofenac",
    "omeprazole",
];
const CLASSES: &[&str] = &["NSAID", "nsaid", "Antibiotic", "Analgesic", ""];
const TERMS: &[&str] = &[
    "Drowsiness",
    "fatigue",
    "Renal impairment",
    "kidney disease",
    "Paracetamol",
    "Acetaminophen",
    "Nausea",
    "Ibuprofen",
];
const REGIONS: &[&str] = &["IN", "US", "GLOBAL"];
const ALLERGENS: &[&str] = &["Penicillin", "penicillin", "Sulfa"];

fn term() -> impl Strategy<Value = String> {
    prop::sample::select(TERMS).prop_map(str::to_string)
}

fn record(id: &'static str) -> impl Strategy<Value = MedicineRecord> {
    (
        prop::sample::select(CLASSES),
        prop::collection::vec(term(), 0..3),
        prop::collection::vec((term(), prop::sample::select(REGIONS)), 0..3),
        prop::collection::vec(term(), 0..3),
        prop::collection::vec(term(), 0..3),
        0u32..500,
    )
        .prop_map(
            move |(class_name, ingredients, brands, side_effects, contraindications, price)| {
                let mut record = MedicineRecord::new(id, id.to_uppercase(), id);
                record.class_name = class_name.to_string();
                record.ingredients = ingredients;
                record.brands = brands
                    .into_iter()
                    .map(|(brand, region)| Brand::new(brand, region))
                    .collect();
                record.side_effects = side_effects;
                record.contraindications = contraindications;
                record.price_inr = f64::from(price);
                record
            },
        )
}

fn catalog() -> impl Strategy<Value = Catalog> {
    IDS.iter()
        .map(|id| record(id))
        .collect::<Vec<_>>()
        .prop_flat_map(|records| {
            let len = records.len();
            prop::sample::subsequence(records, 0..=len)
        })
        .prop_map(Catalog::from_records)
}

fn profile() -> impl Strategy<Value = PatientProfile> {
    (
        1u32..100,
        any::<bool>(),
        any::<bool>(),
        prop::collection::vec(prop::sample::select(ALLERGENS), 0..2),
    )
        .prop_map(|(age, ulcer, liver, allergies)| PatientProfile {
            age,
            ulcer,
            liver,
            allergies: allergies.into_iter().map(str::to_string).collect(),
            ..Default::default()
        })
}

proptest! {
    #[test]
    fn search_results_are_catalog_members_containing_query(
        catalog in catalog(),
        query in "[a-zA-Z ]{0,6}",
    ) {
        let index = SearchIndex::new(&catalog);
        let results = index.search(&query);
        let query_lower = query.to_lowercase();

        prop_assert!(results.len() <= catalog.len());
        for record in &results {
            prop_assert!(catalog.contains(&record.id));
            prop_assert!(record
                .search_keys()
                .any(|key| key.to_lowercase().contains(&query_lower)));
        }

        // Catalog order, no duplicates
        let positions: Vec<usize> = results
            .iter()
            .map(|r| catalog.iter().position(|c| c.id == r.id).unwrap())
            .collect();
        prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn empty_query_matches_nothing(catalog in catalog()) {
        prop_assert!(SearchIndex::new(&catalog).search("").is_empty());
    }

    #[test]
    fn interaction_check_is_deterministic(catalog in catalog(), profile in profile()) {
        let selection: Vec<&MedicineRecord> = catalog.iter().collect();
        let first = check_interactions(selection.iter().copied(), &profile);
        let second = check_interactions(selection.iter().copied(), &profile);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn risk_values_within_bounds(catalog in catalog(), profile in profile()) {
        let selection: Vec<&MedicineRecord> = catalog.iter().collect();
        let risk = risk_score(&selection, &profile, &RuleSet::builtin());

        for (_, value) in risk.dimensions() {
            prop_assert!(value <= 100);
        }
        let warnings = check_interactions(selection.iter().copied(), &profile);
        prop_assert_eq!(
            u32::from(risk.interactions),
            (25 * warnings.len() as u32).min(100)
        );
    }

    #[test]
    fn cheapest_is_lowest_priced(catalog in catalog(), profile in profile()) {
        for target in catalog.iter() {
            let result = substitute_and_optimize(&catalog, target, &profile);

            prop_assert!(result.cheapest.price_inr <= target.price_inr);
            for candidate in &result.same_class {
                prop_assert!(result.cheapest.price_inr <= candidate.price_inr);
                prop_assert!(candidate.id != target.id);
            }
            for candidate in &result.exact_generic {
                prop_assert!(candidate.id != target.id);
                prop_assert!(target.has_same_ingredients(candidate));
            }
        }
    }

    #[test]
    fn selection_add_is_idempotent(ids in prop::collection::vec(prop::sample::select(IDS), 0..10)) {
        let mut once = SelectionState::new();
        let mut twice = SelectionState::new();
        for id in &ids {
            once.add(*id);
            twice.add(*id);
            twice.add(*id);
        }
        prop_assert_eq!(once.to_ordered_list(), twice.to_ordered_list());

        let list = once.to_ordered_list();
        for (i, id) in list.iter().enumerate() {
            prop_assert!(!list[i + 1..].contains(id));
        }
    }
}

//! Cross-region brand mapping.

use std::collections::HashSet;

use crate::catalog::Catalog;
use crate::models::{BrandMapping, MedicineRecord};
use crate::search::{SearchIndex, DEFAULT_FUZZY_LIMIT};

/// Region code for brands sold everywhere.
pub const GLOBAL_REGION: &str = "GLOBAL";

/// Map the medicines a free-text `query` refers to onto their brands in
/// `region_from` and `region_to`.
///
/// The query is fuzzy-matched against catalog names; every record whose
/// name, generic, or brand equals a suggested name is mapped once, in
/// suggestion order.
pub fn map_brands(
    catalog: &Catalog,
    query: &str,
    region_from: &str,
    region_to: &str,
) -> Vec<BrandMapping> {
    let index = SearchIndex::new(catalog);
    let mut seen: HashSet<&str> = HashSet::new();
    let mut mappings = Vec::new();

    for suggestion in index.fuzzy_find(query, DEFAULT_FUZZY_LIMIT) {
        for record in index.rows_for_name(&suggestion.name) {
            if seen.insert(record.id.as_str()) {
                mappings.push(brand_mapping(record, region_from, region_to));
            }
        }
    }

    mappings
}

/// Brands of `record` sold in `region_from` and `region_to` (global brands
/// count for both).
pub fn brand_mapping(record: &MedicineRecord, region_from: &str, region_to: &str) -> BrandMapping {
    let sold_in = |region: &str| -> Vec<String> {
        record
            .brands
            .iter()
            .filter(|b| b.is_sold_in(region) || b.is_sold_in(GLOBAL_REGION))
            .map(|b| b.brand.clone())
            .collect()
    };

    BrandMapping {
        id: record.id.clone(),
        name: record.name.clone(),
        generic: record.generic.clone(),
        class_name: record.class_name.clone(),
        from: sold_in(region_from.trim()),
        to: sold_in(region_to.trim()),
    }
}

//! Free-text lookup over the catalog.
//!
//! Two lookups are provided:
//! - [`SearchIndex::search`]: case-insensitive substring match, catalog order
//! - [`SearchIndex::fuzzy_find`]: similarity-ranked name suggestions

mod fuzzy;

pub use fuzzy::*;

use crate::catalog::Catalog;
use crate::models::MedicineRecord;

/// Search index borrowing a catalog.
pub struct SearchIndex<'a> {
    catalog: &'a Catalog,
}

impl<'a> SearchIndex<'a> {
    /// Create a new index over `catalog`.
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// Records whose brand, generic, display name, or ingredient contains
    /// `query` (case-insensitive).
    ///
    /// The empty query matches nothing. Results keep catalog order.
    pub fn search(&self, query: &str) -> Vec<&'a MedicineRecord> {
        if query.is_empty() {
            return Vec::new();
        }
        let query_lower = query.to_lowercase();

        self.catalog
            .iter()
            .filter(|record| matches_query(record, &query_lower))
            .collect()
    }

    /// First record matching `query`, if any.
    pub fn first_match(&self, query: &str) -> Option<&'a MedicineRecord> {
        if query.is_empty() {
            return None;
        }
        let query_lower = query.to_lowercase();
        self.catalog
            .iter()
            .find(|record| matches_query(record, &query_lower))
    }

    /// Records whose display name, generic, or any brand equals `name`
    /// (case-insensitive). Deduplicated, catalog order.
    pub fn rows_for_name(&self, name: &str) -> Vec<&'a MedicineRecord> {
        let name = name.trim();
        if name.is_empty() {
            return Vec::new();
        }

        self.catalog
            .iter()
            .filter(|record| {
                record.name.eq_ignore_ascii_case(name)
                    || record.generic.eq_ignore_ascii_case(name)
                    || record.brands.iter().any(|b| b.brand.eq_ignore_ascii_case(name))
            })
            .collect()
    }

    /// The underlying catalog.
    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }
}

/// `query_lower` must already be lowercase.
fn matches_query(record: &MedicineRecord, query_lower: &str) -> bool {
    record
        .search_keys()
        .any(|key| key.to_lowercase().contains(query_lower))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Brand;

    fn setup_catalog() -> Catalog {
        let mut paracetamol = MedicineRecord::new("paracetamol", "Paracetamol 650", "Paracetamol");
        paracetamol.ingredients = vec!["Paracetamol".into()];
        paracetamol.brands = vec![Brand::new("Crocin", "IN"), Brand::new("Tylenol", "US")];

        let mut combo = MedicineRecord::new("combiflam", "Combiflam", "Ibuprofen + Paracetamol");
        combo.ingredients = vec!["Ibuprofen".into(), "Paracetamol".into()];

        let mut ibuprofen = MedicineRecord::new("ibuprofen", "Ibuprofen 400", "Ibuprofen");
        ibuprofen.ingredients = vec!["Ibuprofen".into()];
        ibuprofen.brands = vec![Brand::new("Brufen", "IN")];

        Catalog::from_records(vec![paracetamol, combo, ibuprofen])
    }

    fn ids(records: &[&MedicineRecord]) -> Vec<String> {
        records.iter().map(|r| r.id.clone()).collect()
    }

    #[test]
    fn test_empty_query_matches_nothing() {
        let catalog = setup_catalog();
        let index = SearchIndex::new(&catalog);
        assert!(index.search("").is_empty());
        assert!(index.first_match("").is_none());
    }

    #[test]
    fn test_matches_brand_case_insensitive() {
        let catalog = setup_catalog();
        let index = SearchIndex::new(&catalog);
        assert_eq!(ids(&index.search("CROC")), vec!["paracetamol"]);
        assert_eq!(ids(&index.search("brufen")), vec!["ibuprofen"]);
    }

    #[test]
    fn test_matches_ingredient_in_catalog_order() {
        let catalog = setup_catalog();
        let index = SearchIndex::new(&catalog);
        assert_eq!(ids(&index.search("ibu")), vec!["combiflam", "ibuprofen"]);
        assert_eq!(ids(&index.search("paracetamol")), vec!["paracetamol", "combiflam"]);
    }

    #[test]
    fn test_no_match_is_empty() {
        let catalog = setup_catalog();
        let index = SearchIndex::new(&catalog);
        assert!(index.search("warfarin").is_empty());
        assert!(SearchIndex::new(&Catalog::empty()).search("ibu").is_empty());
    }

    #[test]
    fn test_first_match() {
        let catalog = setup_catalog();
        let index = SearchIndex::new(&catalog);
        assert_eq!(index.first_match("tylenol").unwrap().id, "paracetamol");
        assert!(index.first_match("warfarin").is_none());
    }

    #[test]
    fn test_rows_for_name_exact_only() {
        let catalog = setup_catalog();
        let index = SearchIndex::new(&catalog);
        assert_eq!(ids(&index.rows_for_name("brufen")), vec!["ibuprofen"]);
        assert_eq!(ids(&index.rows_for_name("Paracetamol")), vec!["paracetamol"]);
        assert!(index.rows_for_name("Paracet").is_empty());
        assert!(index.rows_for_name("  ").is_empty());
    }
}

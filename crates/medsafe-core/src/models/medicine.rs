//! Medicine catalog models.

use serde::{Deserialize, Deserializer, Serialize};

/// A single medicine in the reference catalog.
///
/// Collection fields default to empty when absent from the source document,
/// so consumers never have to special-case a missing list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MedicineRecord {
    /// Catalog key - unique across the catalog
    pub id: String,
    /// Display name
    pub name: String,
    /// Generic (non-proprietary) name
    pub generic: String,
    /// Therapeutic class (e.g., "NSAID", "Antibiotic")
    #[serde(rename = "class", default, deserialize_with = "null_as_default")]
    pub class_name: String,
    /// Active ingredients, in label order
    #[serde(default, deserialize_with = "null_as_default")]
    pub ingredients: Vec<String>,
    /// Brand names by region
    #[serde(default, deserialize_with = "null_as_default")]
    pub brands: Vec<Brand>,
    /// Known side effects (free text)
    #[serde(rename = "sideEffects", default, deserialize_with = "null_as_default")]
    pub side_effects: Vec<String>,
    /// Contraindications (free text)
    #[serde(default, deserialize_with = "null_as_default")]
    pub contraindications: Vec<String>,
    /// Unit price in INR
    #[serde(rename = "priceINR", default, deserialize_with = "null_as_default")]
    pub price_inr: f64,
}

/// A brand name sold in a given region.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Brand {
    pub brand: String,
    /// Region code (e.g., "IN", "US", "GLOBAL")
    pub region: String,
}

impl Brand {
    pub fn new(brand: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            brand: brand.into(),
            region: region.into(),
        }
    }

    /// Check if this brand is sold in the given region.
    pub fn is_sold_in(&self, region: &str) -> bool {
        self.region.eq_ignore_ascii_case(region)
    }
}

impl MedicineRecord {
    /// Create a new record with required fields.
    pub fn new(id: impl Into<String>, name: impl Into<String>, generic: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            generic: generic.into(),
            class_name: String::new(),
            ingredients: Vec::new(),
            brands: Vec::new(),
            side_effects: Vec::new(),
            contraindications: Vec::new(),
            price_inr: 0.0,
        }
    }

    /// Check if the class matches, ignoring case.
    pub fn is_class(&self, class_name: &str) -> bool {
        self.class_name.eq_ignore_ascii_case(class_name)
    }

    /// Brand names sold in `region`, in record order.
    pub fn brands_in(&self, region: &str) -> Vec<String> {
        self.brands
            .iter()
            .filter(|b| b.is_sold_in(region))
            .map(|b| b.brand.clone())
            .collect()
    }

    /// Check if the ingredient list is the same set as `other`'s.
    ///
    /// Same cardinality and every ingredient of `self` present in `other`.
    /// Ingredient order and case are ignored.
    pub fn has_same_ingredients(&self, other: &MedicineRecord) -> bool {
        if self.ingredients.len() != other.ingredients.len() {
            return false;
        }
        self.ingredients.iter().all(|ingredient| {
            other
                .ingredients
                .iter()
                .any(|candidate| candidate.eq_ignore_ascii_case(ingredient))
        })
    }

    /// Every string the search index matches a query against.
    pub fn search_keys(&self) -> impl Iterator<Item = &str> {
        self.brands
            .iter()
            .map(|b| b.brand.as_str())
            .chain([self.generic.as_str(), self.name.as_str()])
            .chain(self.ingredients.iter().map(String::as_str))
    }
}

/// Treat an explicit `null` the same as an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_optional_fields_default_to_empty() {
        let json = r#"{"id":"x","name":"X","generic":"x"}"#;
        let record: MedicineRecord = serde_json::from_str(json).unwrap();

        assert!(record.ingredients.is_empty());
        assert!(record.brands.is_empty());
        assert!(record.side_effects.is_empty());
        assert!(record.contraindications.is_empty());
        assert_eq!(record.class_name, "");
        assert_eq!(record.price_inr, 0.0);
    }

    #[test]
    fn test_null_optional_fields_default_to_empty() {
        let json = r#"{"id":"x","name":"X","generic":"x","class":null,"sideEffects":null,"priceINR":null}"#;
        let record: MedicineRecord = serde_json::from_str(json).unwrap();

        assert!(record.side_effects.is_empty());
        assert_eq!(record.class_name, "");
        assert_eq!(record.price_inr, 0.0);
    }

    #[test]
    fn test_source_field_names() {
        let json = r#"{
            "id": "ibuprofen", "name": "Ibuprofen", "generic": "Ibuprofen",
            "class": "NSAID", "ingredients": ["Ibuprofen"],
            "brands": [{"brand": "Brufen", "region": "IN"}],
            "sideEffects": ["Stomach upset"], "contraindications": ["Kidney disease"],
            "priceINR": 18.5
        }"#;
        let record: MedicineRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.class_name, "NSAID");
        assert_eq!(record.side_effects, vec!["Stomach upset".to_string()]);
        assert_eq!(record.price_inr, 18.5);
        assert_eq!(record.brands[0], Brand::new("Brufen", "IN"));
    }

    #[test]
    fn test_same_ingredients_ignores_order_and_case() {
        let mut a = MedicineRecord::new("a", "A", "a");
        a.ingredients = vec!["Amoxicillin".into(), "Clavulanic Acid".into()];
        let mut b = MedicineRecord::new("b", "B", "b");
        b.ingredients = vec!["clavulanic acid".into(), "amoxicillin".into()];
        let mut c = MedicineRecord::new("c", "C", "c");
        c.ingredients = vec!["Amoxicillin".into()];

        assert!(a.has_same_ingredients(&b));
        assert!(!a.has_same_ingredients(&c));
        assert!(!c.has_same_ingredients(&a));
    }

    #[test]
    fn test_brands_in_region() {
        let mut record = MedicineRecord::new("p", "Paracetamol", "Paracetamol");
        record.brands = vec![
            Brand::new("Crocin", "IN"),
            Brand::new("Tylenol", "US"),
            Brand::new("Dolo 650", "in"),
        ];

        assert_eq!(record.brands_in("IN"), vec!["Crocin", "Dolo 650"]);
        assert!(record.brands_in("UK").is_empty());
    }
}

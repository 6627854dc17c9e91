//! Immutable medicine catalog.
//!
//! The catalog is the leaf data provider for every engine operation. It is
//! loaded once from a JSON array and never mutated afterwards.

mod loader;

use std::collections::HashMap;

use thiserror::Error;
use tracing::warn;

use crate::models::MedicineRecord;

/// Catalog loading errors.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Ordered collection of medicine records keyed by id.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: Vec<MedicineRecord>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// An empty catalog. Every engine operation is total over it.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a catalog from records, keeping the first record for each id.
    pub fn from_records(records: impl IntoIterator<Item = MedicineRecord>) -> Self {
        let mut catalog = Self::empty();
        for record in records {
            if catalog.index.contains_key(&record.id) {
                warn!(id = %record.id, "duplicate catalog id, keeping first occurrence");
                continue;
            }
            catalog.index.insert(record.id.clone(), catalog.records.len());
            catalog.records.push(record);
        }
        catalog
    }

    /// Get a record by id.
    pub fn get(&self, id: &str) -> Option<&MedicineRecord> {
        self.index.get(id).map(|&i| &self.records[i])
    }

    /// Check if a record with `id` exists.
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Records in catalog (insertion) order.
    pub fn iter(&self) -> impl Iterator<Item = &MedicineRecord> {
        self.records.iter()
    }

    /// Records in catalog order, as a slice.
    pub fn records(&self) -> &[MedicineRecord] {
        &self.records
    }

    /// Resolve ids to records, skipping ids not in the catalog.
    pub fn resolve<'a, I, S>(&'a self, ids: I) -> Vec<&'a MedicineRecord>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        ids.into_iter()
            .filter_map(|id| self.get(id.as_ref()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<MedicineRecord> for Catalog {
    fn from_iter<T: IntoIterator<Item = MedicineRecord>>(iter: T) -> Self {
        Self::from_records(iter)
    }
}

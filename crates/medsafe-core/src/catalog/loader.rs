//! Catalog loading from JSON documents.

use std::path::Path;

use tracing::{debug, info, warn};

use super::{Catalog, CatalogError, CatalogResult};
use crate::models::MedicineRecord;

/// Demo catalog shipped with the crate.
const BUNDLED_CATALOG: &str = include_str!("../../data/medicine_data.json");

impl Catalog {
    /// Parse a JSON array of medicine records.
    ///
    /// Fails only when the document itself is not a JSON array. Entries that
    /// do not match the record schema are skipped with a warning.
    pub fn from_json_str(json: &str) -> CatalogResult<Self> {
        let entries: Vec<serde_json::Value> = serde_json::from_str(json)?;
        let total = entries.len();

        let records: Vec<MedicineRecord> = entries
            .into_iter()
            .enumerate()
            .filter_map(|(index, entry)| match serde_json::from_value(entry) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!(index, error = %e, "skipping malformed catalog entry");
                    None
                }
            })
            .collect();

        let catalog = Self::from_records(records);
        debug!(total, loaded = catalog.len(), "parsed catalog");
        Ok(catalog)
    }

    /// Read and parse a catalog file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> CatalogResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let catalog = Self::from_json_str(&contents)?;
        info!(path = %path.display(), medicines = catalog.len(), "loaded catalog");
        Ok(catalog)
    }

    /// Load a catalog file, degrading to an empty catalog on any failure.
    pub fn load_or_empty<P: AsRef<Path>>(path: P) -> Self {
        Self::from_path(path.as_ref()).unwrap_or_else(|e| {
            warn!(path = %path.as_ref().display(), error = %e, "catalog unavailable, using empty catalog");
            Self::empty()
        })
    }

    /// Parse a JSON document, degrading to an empty catalog on failure.
    pub fn from_json_or_empty(json: &str) -> Self {
        Self::from_json_str(json).unwrap_or_else(|e| {
            warn!(error = %e, "invalid catalog document, using empty catalog");
            Self::empty()
        })
    }

    /// The demo catalog bundled with the crate.
    pub fn bundled() -> Self {
        Self::from_json_or_empty(BUNDLED_CATALOG)
    }
}

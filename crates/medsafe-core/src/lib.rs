//! Medsafe Core Library
//!
//! Local clinical decision support over a static medicine catalog.
//!
//! # Architecture
//!
//! ```text
//!   Catalog (JSON) ──► Search Index ──► UI pick / detected-name merge
//!                                                 │
//!                                         [Selection State]
//!                                                 │
//!                     ┌───────────────────────────┼───────────────────────────┐
//!                     │                           │                           │
//!                     ▼                           ▼                           ▼
//!             Interaction Rules            Risk Scoring             Substitution Optimizer
//!                     │                           │                           │
//!                     └──────────────► Assessment (rendered externally) ◄─────┘
//! ```
//!
//! # Core Principle
//!
//! **Every engine operation is total.** Missing optional fields, unknown ids,
//! empty queries, and an empty catalog all produce empty results or zeroed
//! scores, never errors.
//!
//! # Modules
//!
//! - [`catalog`]: Immutable catalog and JSON loading
//! - [`models`]: Domain types (MedicineRecord, PatientProfile, RiskProfile, etc.)
//! - [`search`]: Substring search and fuzzy name lookup
//! - [`interactions`]: Ordered interaction rule engine
//! - [`substitution`]: Substitutes, cheapest option, brand mapping
//! - [`risk`]: Per-dimension risk scoring
//! - [`session`]: Selection state and the session context
//! - [`config`]: TOML configuration
//! - [`export`]: Session report export

pub mod catalog;
pub mod config;
pub mod export;
pub mod interactions;
pub mod models;
pub mod risk;
pub mod search;
pub mod session;
pub mod substitution;

// Re-export commonly used types
pub use catalog::{Catalog, CatalogError};
pub use config::{ConfigError, EngineConfig};
pub use export::SessionReport;
pub use interactions::{check_interactions, InteractionRule, RuleSet};
pub use models::{
    Assessment, Brand, BrandMapping, InteractionWarning, MedicineRecord, PatientProfile,
    RiskDimension, RiskProfile, SubstitutionResult,
};
pub use risk::risk_score;
pub use search::SearchIndex;
pub use session::{SelectionState, Session};
pub use substitution::{map_brands, substitute_and_optimize};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
#[uniffi(flat_error)]
pub enum MedsafeError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Catalog error: {0}")]
    CatalogError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Session error: {0}")]
    SessionError(String),
}

impl From<config::ConfigError> for MedsafeError {
    fn from(e: config::ConfigError) -> Self {
        MedsafeError::ConfigError(e.to_string())
    }
}

impl From<catalog::CatalogError> for MedsafeError {
    fn from(e: catalog::CatalogError) -> Self {
        MedsafeError::CatalogError(e.to_string())
    }
}

impl From<serde_json::Error> for MedsafeError {
    fn from(e: serde_json::Error) -> Self {
        MedsafeError::SerializationError(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for MedsafeError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        MedsafeError::SessionError(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Start a session over the bundled demo catalog.
#[uniffi::export]
pub fn open_bundled_catalog() -> Arc<MedsafeCore> {
    MedsafeCore::wrap(Session::new(Catalog::bundled()))
}

/// Start a session over a JSON catalog document.
///
/// An unparseable document yields a session over an empty catalog.
#[uniffi::export]
pub fn open_catalog_json(json: String) -> Arc<MedsafeCore> {
    MedsafeCore::wrap(Session::new(Catalog::from_json_or_empty(&json)))
}

/// Start a session from a TOML configuration file.
#[uniffi::export]
pub fn open_with_config(path: String) -> Result<Arc<MedsafeCore>, MedsafeError> {
    let config = EngineConfig::from_file(std::path::Path::new(&path))?;
    Ok(MedsafeCore::wrap(config.start_session()))
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe session wrapper for FFI.
#[derive(uniffi::Object)]
pub struct MedsafeCore {
    session: Arc<Mutex<Session>>,
}

impl MedsafeCore {
    fn wrap(session: Session) -> Arc<Self> {
        Arc::new(Self {
            session: Arc::new(Mutex::new(session)),
        })
    }
}

#[uniffi::export]
impl MedsafeCore {
    // =========================================================================
    // Catalog Operations
    // =========================================================================

    /// Free-text catalog search.
    pub fn search(&self, query: String) -> Result<Vec<FfiMedicine>, MedsafeError> {
        let session = self.session.lock()?;
        Ok(session.search(&query).into_iter().map(FfiMedicine::from).collect())
    }

    /// Get a catalog medicine by id.
    pub fn get_medicine(&self, id: String) -> Result<Option<FfiMedicine>, MedsafeError> {
        let session = self.session.lock()?;
        Ok(session.catalog().get(&id).map(FfiMedicine::from))
    }

    // =========================================================================
    // Selection Operations
    // =========================================================================

    /// Select a medicine. Returns whether the selection changed.
    pub fn add_to_selection(&self, id: String) -> Result<bool, MedsafeError> {
        let mut session = self.session.lock()?;
        Ok(session.add(&id))
    }

    /// Deselect a medicine. Returns whether it was selected.
    pub fn remove_from_selection(&self, id: String) -> Result<bool, MedsafeError> {
        let mut session = self.session.lock()?;
        Ok(session.remove(&id))
    }

    /// Deselect everything.
    pub fn clear_selection(&self) -> Result<(), MedsafeError> {
        let mut session = self.session.lock()?;
        session.clear();
        Ok(())
    }

    /// Selected ids in selection order.
    pub fn selection(&self) -> Result<Vec<String>, MedsafeError> {
        let session = self.session.lock()?;
        Ok(session.selection().to_ordered_list())
    }

    /// Merge backend-detected medicine names. Returns the ids added.
    pub fn merge_detected(&self, names: Vec<String>) -> Result<Vec<String>, MedsafeError> {
        let mut session = self.session.lock()?;
        Ok(session.merge_detected(names))
    }

    // =========================================================================
    // Profile Operations
    // =========================================================================

    /// Replace the patient profile.
    pub fn set_profile(&self, profile: FfiProfile) -> Result<(), MedsafeError> {
        let mut session = self.session.lock()?;
        session.set_profile(profile.into());
        Ok(())
    }

    /// Current patient profile.
    pub fn profile(&self) -> Result<FfiProfile, MedsafeError> {
        let session = self.session.lock()?;
        Ok(session.profile().clone().into())
    }

    // =========================================================================
    // Assessment Operations
    // =========================================================================

    /// Warnings and risk profile for the current selection.
    pub fn assessment(&self) -> Result<FfiAssessment, MedsafeError> {
        let session = self.session.lock()?;
        Ok(session.assessment().clone().into())
    }

    /// Substitutes for a medicine, or `None` for an unknown id.
    pub fn substitute(&self, id: String) -> Result<Option<FfiSubstitution>, MedsafeError> {
        let session = self.session.lock()?;
        Ok(session.substitute(&id).map(FfiSubstitution::from))
    }

    /// Brand equivalents between two regions.
    pub fn map_brands(
        &self,
        query: String,
        region_from: String,
        region_to: String,
    ) -> Result<Vec<FfiBrandMapping>, MedsafeError> {
        let session = self.session.lock()?;
        Ok(session
            .map_brands(&query, &region_from, &region_to)
            .into_iter()
            .map(FfiBrandMapping::from)
            .collect())
    }

    // =========================================================================
    // Export Operations
    // =========================================================================

    /// Export the session report as JSON.
    pub fn export_report_json(&self) -> Result<String, MedsafeError> {
        let session = self.session.lock()?;
        Ok(SessionReport::from_session(&session).to_json()?)
    }

    /// Export the selected medicines as CSV.
    pub fn export_report_csv(&self) -> Result<String, MedsafeError> {
        let session = self.session.lock()?;
        Ok(SessionReport::from_session(&session).to_csv())
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe medicine record.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiMedicine {
    pub id: String,
    pub name: String,
    pub generic: String,
    pub class_name: String,
    pub ingredients: Vec<String>,
    pub brands: Vec<FfiBrand>,
    pub side_effects: Vec<String>,
    pub contraindications: Vec<String>,
    pub price_inr: f64,
}

impl From<&MedicineRecord> for FfiMedicine {
    fn from(record: &MedicineRecord) -> Self {
        Self {
            id: record.id.clone(),
            name: record.name.clone(),
            generic: record.generic.clone(),
            class_name: record.class_name.clone(),
            ingredients: record.ingredients.clone(),
            brands: record.brands.iter().map(FfiBrand::from).collect(),
            side_effects: record.side_effects.clone(),
            contraindications: record.contraindications.clone(),
            price_inr: record.price_inr,
        }
    }
}

impl From<MedicineRecord> for FfiMedicine {
    fn from(record: MedicineRecord) -> Self {
        FfiMedicine::from(&record)
    }
}

/// FFI-safe brand.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiBrand {
    pub brand: String,
    pub region: String,
}

impl From<&Brand> for FfiBrand {
    fn from(brand: &Brand) -> Self {
        Self {
            brand: brand.brand.clone(),
            region: brand.region.clone(),
        }
    }
}

/// FFI-safe patient profile (engine-relevant fields only).
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiProfile {
    pub age: u32,
    pub region: String,
    pub allergies: Vec<String>,
    pub ulcer: bool,
    pub liver: bool,
}

impl From<PatientProfile> for FfiProfile {
    fn from(profile: PatientProfile) -> Self {
        Self {
            age: profile.age,
            region: profile.region,
            allergies: profile.allergies,
            ulcer: profile.ulcer,
            liver: profile.liver,
        }
    }
}

impl From<FfiProfile> for PatientProfile {
    fn from(profile: FfiProfile) -> Self {
        PatientProfile {
            age: profile.age,
            region: profile.region,
            allergies: profile.allergies,
            ulcer: profile.ulcer,
            liver: profile.liver,
            ..Default::default()
        }
    }
}

/// FFI-safe interaction warning.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiWarning {
    pub rule_id: String,
    pub message: String,
}

/// FFI-safe risk profile.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiRiskProfile {
    pub sedation: u32,
    pub gastro: u32,
    pub liver: u32,
    pub kidney: u32,
    pub interactions: u32,
    pub allergy: u32,
}

impl From<RiskProfile> for FfiRiskProfile {
    fn from(risk: RiskProfile) -> Self {
        Self {
            sedation: risk.sedation.into(),
            gastro: risk.gastro.into(),
            liver: risk.liver.into(),
            kidney: risk.kidney.into(),
            interactions: risk.interactions.into(),
            allergy: risk.allergy.into(),
        }
    }
}

/// FFI-safe assessment.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiAssessment {
    pub warnings: Vec<FfiWarning>,
    pub risk: FfiRiskProfile,
}

impl From<Assessment> for FfiAssessment {
    fn from(assessment: Assessment) -> Self {
        Self {
            warnings: assessment
                .warnings
                .into_iter()
                .map(|w| FfiWarning {
                    rule_id: w.rule_id,
                    message: w.message,
                })
                .collect(),
            risk: assessment.risk.into(),
        }
    }
}

/// FFI-safe substitution result.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiSubstitution {
    pub cheapest: FfiMedicine,
    pub exact_generic: Vec<FfiMedicine>,
    pub same_class: Vec<FfiMedicine>,
    pub local_brands: Vec<String>,
}

impl From<SubstitutionResult> for FfiSubstitution {
    fn from(result: SubstitutionResult) -> Self {
        Self {
            cheapest: result.cheapest.into(),
            exact_generic: result.exact_generic.into_iter().map(Into::into).collect(),
            same_class: result.same_class.into_iter().map(Into::into).collect(),
            local_brands: result.local_brands,
        }
    }
}

/// FFI-safe brand mapping.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiBrandMapping {
    pub id: String,
    pub name: String,
    pub generic: String,
    pub class_name: String,
    pub from: Vec<String>,
    pub to: Vec<String>,
}

impl From<BrandMapping> for FfiBrandMapping {
    fn from(mapping: BrandMapping) -> Self {
        Self {
            id: mapping.id,
            name: mapping.name,
            generic: mapping.generic,
            class_name: mapping.class_name,
            from: mapping.from,
            to: mapping.to,
        }
    }
}

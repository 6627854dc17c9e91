//! Explicit session context.
//!
//! A [`Session`] owns the catalog, the interaction rules, the patient profile
//! and the selection. Every selection or profile mutation recomputes the
//! interaction warnings and the risk profile, which the surrounding UI reads
//! back through [`Session::assessment`].

mod selection;

pub use selection::*;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::catalog::Catalog;
use crate::interactions::RuleSet;
use crate::models::{
    Assessment, BrandMapping, InteractionWarning, MedicineRecord, PatientProfile, RiskProfile,
    SubstitutionResult,
};
use crate::risk::risk_score;
use crate::search::SearchIndex;
use crate::substitution::{map_brands, substitute_and_optimize};

/// One user session over a loaded catalog.
#[derive(Debug, Clone)]
pub struct Session {
    id: Uuid,
    started_at: DateTime<Utc>,
    catalog: Catalog,
    rules: RuleSet,
    profile: PatientProfile,
    selection: SelectionState,
    assessment: Assessment,
}

impl Session {
    /// Start a session with the built-in rules and a default profile.
    pub fn new(catalog: Catalog) -> Self {
        Self::with_rules(catalog, RuleSet::builtin())
    }

    /// Start a session with a custom rule set.
    pub fn with_rules(catalog: Catalog, rules: RuleSet) -> Self {
        let mut session = Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            catalog,
            rules,
            profile: PatientProfile::default(),
            selection: SelectionState::new(),
            assessment: Assessment::default(),
        };
        session.recompute();
        info!(
            session_id = %session.id,
            medicines = session.catalog.len(),
            rules = session.rules.len(),
            "session started"
        );
        session
    }

    /// Replace the starting profile.
    pub fn with_profile(mut self, profile: PatientProfile) -> Self {
        self.set_profile(profile);
        self
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Select a catalog medicine by id.
    ///
    /// Returns `true` if the selection changed. Already-selected ids are a
    /// no-op; ids not in the catalog are ignored.
    pub fn add(&mut self, id: &str) -> bool {
        if !self.catalog.contains(id) {
            warn!(id, "ignoring selection of unknown medicine");
            return false;
        }
        let added = self.selection.add(id);
        if added {
            debug!(id, selected = self.selection.len(), "medicine selected");
            self.recompute();
        }
        added
    }

    /// Deselect a medicine. Returns `true` if it was selected.
    pub fn remove(&mut self, id: &str) -> bool {
        let removed = self.selection.remove(id);
        if removed {
            debug!(id, selected = self.selection.len(), "medicine deselected");
            self.recompute();
        }
        removed
    }

    /// Deselect everything.
    pub fn clear(&mut self) {
        self.selection.clear();
        self.recompute();
    }

    /// Merge free-text medicine names detected by an external collaborator.
    ///
    /// Each name selects its first search match; names without a match are
    /// skipped. Returns the ids newly added, in order.
    pub fn merge_detected<I, S>(&mut self, names: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let index = SearchIndex::new(&self.catalog);
        let mut to_add: Vec<String> = Vec::new();

        for name in names {
            match index.first_match(name.as_ref()) {
                Some(record) => {
                    if !self.selection.contains(&record.id) && !to_add.contains(&record.id) {
                        to_add.push(record.id.clone());
                    }
                }
                None => debug!(name = name.as_ref(), "no catalog match for detected name"),
            }
        }

        for id in &to_add {
            self.selection.add(id.as_str());
        }
        if !to_add.is_empty() {
            info!(added = to_add.len(), "merged detected medicines");
            self.recompute();
        }
        to_add
    }

    // =========================================================================
    // Profile
    // =========================================================================

    /// Replace the patient profile.
    pub fn set_profile(&mut self, profile: PatientProfile) {
        self.profile = profile;
        self.recompute();
    }

    /// Modify the patient profile in place.
    pub fn update_profile(&mut self, update: impl FnOnce(&mut PatientProfile)) {
        update(&mut self.profile);
        self.recompute();
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Free-text catalog search.
    pub fn search(&self, query: &str) -> Vec<&MedicineRecord> {
        SearchIndex::new(&self.catalog).search(query)
    }

    /// Selected records, in selection order.
    pub fn selected_records(&self) -> Vec<&MedicineRecord> {
        self.catalog.resolve(self.selection.ids())
    }

    /// Substitutes for a catalog medicine, or `None` if the id is unknown.
    pub fn substitute(&self, id: &str) -> Option<SubstitutionResult> {
        self.catalog
            .get(id)
            .map(|target| substitute_and_optimize(&self.catalog, target, &self.profile))
    }

    /// Brand equivalents between two regions for a free-text query.
    pub fn map_brands(&self, query: &str, region_from: &str, region_to: &str) -> Vec<BrandMapping> {
        map_brands(&self.catalog, query, region_from, region_to)
    }

    /// Interaction warnings for the current selection.
    pub fn warnings(&self) -> &[InteractionWarning] {
        &self.assessment.warnings
    }

    /// Risk profile for the current selection.
    pub fn risk(&self) -> RiskProfile {
        self.assessment.risk
    }

    /// Latest warnings and risk profile.
    pub fn assessment(&self) -> &Assessment {
        &self.assessment
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn profile(&self) -> &PatientProfile {
        &self.profile
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// Full recomputation; catalogs and selections are small.
    fn recompute(&mut self) {
        let selected = self.catalog.resolve(self.selection.ids());
        let warnings = self.rules.check(selected.iter().copied(), &self.profile);
        let risk = risk_score(&selected, &self.profile, &self.rules);
        debug!(
            warnings = warnings.len(),
            peak_risk = risk.peak(),
            "assessment recomputed"
        );
        self.assessment = Assessment { warnings, risk };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session::new(Catalog::bundled())
    }

    #[test]
    fn test_add_recomputes_assessment() {
        let mut session = session();
        assert!(!session.assessment().has_warnings());

        session.add("ibuprofen");
        session.add("amoxiclav");

        assert_eq!(session.warnings().len(), 1);
        assert_eq!(session.risk().interactions, 25);
        assert_eq!(session.risk().gastro, 40);
    }

    #[test]
    fn test_add_unknown_id_is_ignored() {
        let mut session = session();
        assert!(!session.add("warfarin"));
        assert!(session.selection().is_empty());
    }

    #[test]
    fn test_add_twice_same_as_once() {
        let mut session = session();
        assert!(session.add("paracetamol"));
        assert!(!session.add("paracetamol"));
        assert_eq!(session.selection().to_ordered_list(), vec!["paracetamol"]);
    }

    #[test]
    fn test_profile_change_recomputes() {
        let mut session = session();
        session.add("paracetamol");
        assert!(session.warnings().is_empty());

        session.update_profile(|p| p.liver = true);
        assert_eq!(session.warnings()[0].rule_id, "paracetamol-liver");
        assert_eq!(session.risk().liver, 70);
    }

    #[test]
    fn test_remove_and_clear_recompute() {
        let mut session = session();
        session.add("ibuprofen");
        session.add("amoxiclav");

        assert!(session.remove("amoxiclav"));
        assert!(session.warnings().is_empty());

        session.clear();
        assert_eq!(session.risk(), RiskProfile::default());
    }

    #[test]
    fn test_merge_detected_takes_first_match() {
        let mut session = session();
        session.add("ibuprofen");

        let added = session.merge_detected(["Brufen", "Augmentin", "unobtainium", "Clavam"]);

        // Brufen maps to the already-selected ibuprofen; Clavam repeats amoxiclav
        assert_eq!(added, vec!["amoxiclav"]);
        assert_eq!(
            session.selection().to_ordered_list(),
            vec!["ibuprofen", "amoxiclav"]
        );
        assert_eq!(session.warnings().len(), 1);
    }

    #[test]
    fn test_selected_records_in_selection_order() {
        let mut session = session();
        session.add("cetirizine");
        session.add("paracetamol");

        let ids: Vec<&str> = session
            .selected_records()
            .iter()
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(ids, vec!["cetirizine", "paracetamol"]);
    }

    #[test]
    fn test_substitute_unknown_id() {
        let session = session();
        assert!(session.substitute("warfarin").is_none());
        assert!(session.substitute("ibuprofen").is_some());
    }

    #[test]
    fn test_empty_catalog_session() {
        let mut session = Session::new(Catalog::empty());
        assert!(session.search("ibu").is_empty());
        assert!(session.merge_detected(["ibuprofen"]).is_empty());
        assert!(session.map_brands("crocin", "IN", "US").is_empty());
        assert_eq!(session.risk(), RiskProfile::default());
    }
}

//! Session report export.

use serde::{Deserialize, Serialize};

use crate::models::{InteractionWarning, PatientProfile, RiskProfile};
use crate::session::Session;

/// Snapshot of a session for hand-off to the rendering layer or a file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    /// Report metadata
    pub metadata: ReportMetadata,
    /// Patient profile the assessment was computed against
    pub profile: PatientProfile,
    /// Selected medicines, in selection order
    pub medicines: Vec<ReportLineItem>,
    /// Interaction warnings, in rule order
    pub warnings: Vec<InteractionWarning>,
    /// Per-dimension risk
    pub risk: RiskProfile,
}

/// Report metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub session_id: String,
    pub session_started_at: String,
    pub generated_at: String,
    /// Sum of unit prices of the selected medicines
    pub total_price_inr: f64,
}

/// Single selected medicine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportLineItem {
    pub id: String,
    pub name: String,
    pub generic: String,
    #[serde(rename = "class")]
    pub class_name: String,
    pub price_inr: f64,
    /// Cheapest same-class option, when it differs from this medicine
    pub cheaper_alternative: Option<String>,
}

impl SessionReport {
    /// Build a report from the session's current state.
    pub fn from_session(session: &Session) -> Self {
        let medicines: Vec<ReportLineItem> = session
            .selected_records()
            .into_iter()
            .map(|record| {
                let cheaper_alternative = session
                    .substitute(&record.id)
                    .filter(|s| s.cheapest.id != record.id)
                    .map(|s| s.cheapest.name);

                ReportLineItem {
                    id: record.id.clone(),
                    name: record.name.clone(),
                    generic: record.generic.clone(),
                    class_name: record.class_name.clone(),
                    price_inr: record.price_inr,
                    cheaper_alternative,
                }
            })
            .collect();

        let total_price_inr = medicines.iter().map(|m| m.price_inr).sum();

        Self {
            metadata: ReportMetadata {
                session_id: session.id().to_string(),
                session_started_at: session.started_at().to_rfc3339(),
                generated_at: chrono::Utc::now().to_rfc3339(),
                total_price_inr,
            },
            profile: session.profile().clone(),
            medicines,
            warnings: session.warnings().to_vec(),
            risk: session.risk(),
        }
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Export selected medicines to CSV, one row per medicine.
    pub fn to_csv(&self) -> String {
        let mut csv = String::new();

        csv.push_str("session_id,id,name,generic,class,price_inr,cheaper_alternative\n");

        for item in &self.medicines {
            csv.push_str(&format!(
                "{},{},{},{},{},{:.2},{}\n",
                escape_csv(&self.metadata.session_id),
                escape_csv(&item.id),
                escape_csv(&item.name),
                escape_csv(&item.generic),
                escape_csv(&item.class_name),
                item.price_inr,
                escape_csv(item.cheaper_alternative.as_deref().unwrap_or("")),
            ));
        }

        csv
    }
}

/// Escape a value for CSV output.
fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

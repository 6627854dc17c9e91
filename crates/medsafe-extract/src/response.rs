//! Parsing replies from the explanation backend.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::detection::detect_medicines;

/// Extraction errors.
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Invalid response format: {0}")]
    InvalidFormat(String),
}

pub type ExtractionResult<T> = Result<T, ExtractionError>;

/// Backend reply. Which fields are present depends on the endpoint:
/// explain (`simple`, `doctor`), prescription OCR (`summary`, `title`),
/// or chat (`answer`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BackendResponse {
    /// Plain-language explanation
    #[serde(default)]
    pub simple: Option<String>,
    /// Clinician-facing explanation
    #[serde(default)]
    pub doctor: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub answer: Option<String>,
    /// Names the backend already detected
    #[serde(default)]
    pub detected_medicines: Option<Vec<String>>,
}

impl BackendResponse {
    /// Text fields in a fixed order, skipping absent ones.
    pub fn text_fields(&self) -> impl Iterator<Item = &str> {
        [
            &self.simple,
            &self.doctor,
            &self.summary,
            &self.title,
            &self.answer,
        ]
        .into_iter()
        .filter_map(|field| field.as_deref())
    }

    /// Candidate medicine names for merging into the selection.
    ///
    /// Uses `detected_medicines` when the backend sent it, otherwise runs
    /// [`detect_medicines`] over the text fields.
    pub fn medicine_names(&self) -> Vec<String> {
        if let Some(names) = &self.detected_medicines {
            return names.clone();
        }

        let text = self.text_fields().collect::<Vec<_>>().join("\n");
        let names = detect_medicines(&text);
        debug!(count = names.len(), "detected medicine names from reply text");
        names
    }
}

/// Parse a backend reply, tolerating text around the JSON object.
pub fn parse_backend_response(raw: &str) -> ExtractionResult<BackendResponse> {
    let json_start = raw.find('{').ok_or_else(|| {
        ExtractionError::InvalidFormat("No JSON object found in response".into())
    })?;
    let json_end = raw.rfind('}').ok_or_else(|| {
        ExtractionError::InvalidFormat("No closing brace found in response".into())
    })?;
    if json_end < json_start {
        return Err(ExtractionError::InvalidFormat(
            "Closing brace precedes opening brace".into(),
        ));
    }

    let response: BackendResponse = serde_json::from_str(&raw[json_start..=json_end])?;
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_explain_reply() {
        let raw = r#"{"simple":"Take with food.","doctor":"NSAID with GI risk.","detected_medicines":["Brufen","Augmentin"]}"#;

        let response = parse_backend_response(raw).unwrap();
        assert_eq!(response.simple.as_deref(), Some("Take with food."));
        assert_eq!(response.medicine_names(), vec!["Brufen", "Augmentin"]);
    }

    #[test]
    fn test_parse_with_surrounding_text() {
        let raw = "Here is the result:\n{\"answer\":\"Crocin is paracetamol.\"}\nThanks";

        let response = parse_backend_response(raw).unwrap();
        assert_eq!(response.answer.as_deref(), Some("Crocin is paracetamol."));
        assert!(response.detected_medicines.is_none());
    }

    #[test]
    fn test_names_fall_back_to_text_detection() {
        let response = BackendResponse {
            title: Some("Prescription".into()),
            summary: Some("Dolo-650 twice daily".into()),
            ..Default::default()
        };

        // summary comes before title
        assert_eq!(
            response.medicine_names(),
            vec!["Dolo-650", "twice", "daily", "Prescription"]
        );
    }

    #[test]
    fn test_empty_detected_list_is_respected() {
        let response = BackendResponse {
            answer: Some("Ibuprofen".into()),
            detected_medicines: Some(vec![]),
            ..Default::default()
        };
        assert!(response.medicine_names().is_empty());
    }

    #[test]
    fn test_no_json_object() {
        assert!(matches!(
            parse_backend_response("server busy"),
            Err(ExtractionError::InvalidFormat(_))
        ));
        assert!(matches!(
            parse_backend_response("} oops {"),
            Err(ExtractionError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            parse_backend_response("{\"simple\": }"),
            Err(ExtractionError::JsonParse(_))
        ));
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let response = parse_backend_response(r#"{"answer":"ok","latency_ms":12}"#).unwrap();
        assert_eq!(response.answer.as_deref(), Some("ok"));
    }
}

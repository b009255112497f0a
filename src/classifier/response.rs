// SPDX-License-Identifier: GPL-3.0-only

//! Classifier response model
//!
//! The service answers with a loosely typed JSON object whose fields are
//! mostly optional. [`ClassifyPayload`] mirrors that shape; the closed
//! [`ClassificationOutcome`] is built from it in exactly one place,
//! [`ClassificationOutcome::from_payload`], and rendering only ever matches on
//! the outcome.

use super::RequestKind;
use serde::Deserialize;

/// `warning` is sent either as a flag or as an explanatory message
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum WarningField {
    Flag(bool),
    Message(String),
}

impl WarningField {
    /// Whether the field counts as set (`true` or a non-empty message)
    pub fn is_set(&self) -> bool {
        match self {
            WarningField::Flag(flag) => *flag,
            WarningField::Message(msg) => !msg.is_empty(),
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            WarningField::Message(msg) if !msg.is_empty() => Some(msg),
            _ => None,
        }
    }
}

/// `id` values are numeric strings in practice but numbers are accepted too
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(u64),
    Text(String),
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordId::Number(n) => write!(f, "{}", n),
            RecordId::Text(s) => f.write_str(s),
        }
    }
}

/// Descriptive record of a flower species
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FlowerMetadata {
    #[serde(default)]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub scientific_name: Option<String>,
    /// Confidence-dependent description written by the service
    #[serde(default)]
    pub dynamic_description: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub physical_characteristics: Option<String>,
    #[serde(default)]
    pub habitat: Option<String>,
    #[serde(default)]
    pub benefits_or_meaning: Option<String>,
}

impl FlowerMetadata {
    /// Description to display, preferring the confidence-dependent one
    pub fn display_description(&self) -> Option<&str> {
        self.dynamic_description
            .as_deref()
            .or(self.description.as_deref())
            .filter(|s| !s.is_empty())
    }
}

/// Server-computed image quality metrics
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct QualityInfo {
    #[serde(default)]
    pub is_valid: Option<bool>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub brightness: Option<f64>,
    /// Focus score (Laplacian variance)
    #[serde(default)]
    pub blur_score: Option<f64>,
}

impl QualityInfo {
    /// Metric value if present and non-zero
    fn truthy(value: Option<f64>) -> Option<f64> {
        value.filter(|v| *v != 0.0 && !v.is_nan())
    }

    pub fn brightness_value(&self) -> Option<f64> {
        Self::truthy(self.brightness)
    }

    pub fn blur_value(&self) -> Option<f64> {
        Self::truthy(self.blur_score)
    }

    /// Both metrics present and non-zero
    pub fn is_complete(&self) -> bool {
        self.brightness_value().is_some() && self.blur_value().is_some()
    }
}

/// Raw `/upload` and `/capture` response
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ClassifyPayload {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub is_flower: Option<bool>,
    #[serde(default)]
    pub warning: Option<WarningField>,
    #[serde(default)]
    pub predicted_name: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
    /// Preformatted percentage such as "40.00%"
    #[serde(default)]
    pub confidence_percent: Option<String>,
    #[serde(default)]
    pub metadata: Option<FlowerMetadata>,
    #[serde(default)]
    pub quality_info: Option<QualityInfo>,
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub image_data: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ClassifyPayload {
    /// Request kind reported by the server, falling back to the one sent
    pub fn mode_or(&self, fallback: RequestKind) -> RequestKind {
        self.mode
            .as_deref()
            .and_then(RequestKind::from_mode)
            .unwrap_or(fallback)
    }

    /// Server-supplied error text, `error` first
    pub fn server_message(&self) -> Option<&str> {
        self.error
            .as_deref()
            .or(self.message.as_deref())
            .filter(|s| !s.is_empty())
    }

    fn warning_set(&self) -> bool {
        self.warning.as_ref().is_some_and(WarningField::is_set)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SuccessOutcome {
    pub metadata: FlowerMetadata,
    pub confidence: f64,
    pub quality: Option<QualityInfo>,
    pub mode: RequestKind,
    pub image_data: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LowConfidenceOutcome {
    pub predicted_name: Option<String>,
    pub confidence: Option<f64>,
    pub confidence_text: Option<String>,
    pub quality: Option<QualityInfo>,
    /// Explanation sent by the server, if it sent one
    pub warning: Option<String>,
    pub mode: RequestKind,
    pub image_data: Option<String>,
}

impl LowConfidenceOutcome {
    /// "40.00%" as sent, or computed from the raw confidence
    pub fn confidence_label(&self) -> Option<String> {
        self.confidence_text
            .clone()
            .or_else(|| self.confidence.map(|c| format!("{:.2}%", c * 100.0)))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FailureOutcome {
    /// Server text; `None` means the generic processing-failure message
    pub error: Option<String>,
    pub image_data: Option<String>,
}

/// Classified response
#[derive(Debug, Clone, PartialEq)]
pub enum ClassificationOutcome {
    Success(SuccessOutcome),
    LowConfidence(LowConfidenceOutcome),
    Failure(FailureOutcome),
}

impl ClassificationOutcome {
    /// Classify a raw payload
    ///
    /// A set `warning`, or `success` with `is_flower` false, is low
    /// confidence. `success` with `is_flower` true and metadata is a success.
    /// Everything else, including `success=false`, is a failure.
    pub fn from_payload(payload: ClassifyPayload, sent_as: RequestKind) -> Self {
        let mode = payload.mode_or(sent_as);
        let is_flower = payload.is_flower.unwrap_or(false);

        if payload.warning_set() || (payload.success && !is_flower) {
            let warning = payload
                .warning
                .as_ref()
                .and_then(WarningField::message)
                .map(str::to_string);
            return ClassificationOutcome::LowConfidence(LowConfidenceOutcome {
                predicted_name: payload.predicted_name.filter(|s| !s.is_empty()),
                confidence: payload.confidence,
                confidence_text: payload.confidence_percent,
                quality: payload.quality_info,
                warning,
                mode,
                image_data: payload.image_data,
            });
        }

        if payload.success && is_flower {
            if let Some(metadata) = payload.metadata {
                return ClassificationOutcome::Success(SuccessOutcome {
                    metadata,
                    confidence: payload.confidence.unwrap_or(0.0),
                    quality: payload.quality_info,
                    mode,
                    image_data: payload.image_data,
                });
            }
        }

        let error = payload.server_message().map(str::to_string);
        ClassificationOutcome::Failure(FailureOutcome {
            error,
            image_data: payload.image_data,
        })
    }

    /// Short name for logs
    pub fn label(&self) -> &'static str {
        match self {
            ClassificationOutcome::Success(_) => "success",
            ClassificationOutcome::LowConfidence(_) => "low_confidence",
            ClassificationOutcome::Failure(_) => "failure",
        }
    }

    pub fn image_data(&self) -> Option<&str> {
        match self {
            ClassificationOutcome::Success(s) => s.image_data.as_deref(),
            ClassificationOutcome::LowConfidence(l) => l.image_data.as_deref(),
            ClassificationOutcome::Failure(f) => f.image_data.as_deref(),
        }
    }
}

/// One `/api/search` hit
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SearchResult {
    #[serde(default)]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub scientific_name: Option<String>,
    #[serde(default)]
    pub physical_characteristics: Option<String>,
    #[serde(default)]
    pub habitat: Option<String>,
    #[serde(default)]
    pub benefits_or_meaning: Option<String>,
}

/// Raw `/api/search` response
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SearchPayload {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub count: Option<usize>,
    #[serde(default)]
    pub results: Vec<SearchResult>,
    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn outcome(value: serde_json::Value, kind: RequestKind) -> ClassificationOutcome {
        let payload: ClassifyPayload = serde_json::from_value(value).unwrap();
        ClassificationOutcome::from_payload(payload, kind)
    }

    #[test]
    fn test_success_requires_metadata() {
        let ok = outcome(
            json!({"success": true, "is_flower": true, "metadata": {"name": "Mawar"}, "confidence": 0.92, "mode": "upload"}),
            RequestKind::Upload,
        );
        match ok {
            ClassificationOutcome::Success(s) => {
                assert_eq!(s.metadata.name, "Mawar");
                assert_eq!(s.mode, RequestKind::Upload);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }

        let missing = outcome(json!({"success": true, "is_flower": true}), RequestKind::Upload);
        assert!(matches!(missing, ClassificationOutcome::Failure(_)));
    }

    #[test]
    fn test_warning_string_wins_over_success() {
        let low = outcome(
            json!({
                "success": true,
                "is_flower": true,
                "warning": "Kualitas gambar tidak memadai: Gambar terlalu gelap",
                "metadata": {"name": "Mawar"},
                "mode": "camera"
            }),
            RequestKind::Upload,
        );
        match low {
            ClassificationOutcome::LowConfidence(l) => {
                assert_eq!(l.mode, RequestKind::Capture);
                assert!(l.warning.unwrap().contains("gelap"));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_false_warning_flag_is_ignored() {
        let ok = outcome(
            json!({"success": true, "is_flower": true, "warning": false, "metadata": {"name": "Tulip"}}),
            RequestKind::Capture,
        );
        assert!(matches!(ok, ClassificationOutcome::Success(_)));
    }

    #[test]
    fn test_not_a_flower_is_low_confidence() {
        let low = outcome(
            json!({"success": true, "is_flower": false, "predicted_name": "Melati", "confidence": 0.4}),
            RequestKind::Upload,
        );
        match low {
            ClassificationOutcome::LowConfidence(l) => {
                assert_eq!(l.predicted_name.as_deref(), Some("Melati"));
                assert_eq!(l.confidence_label().as_deref(), Some("40.00%"));
                assert_eq!(l.mode, RequestKind::Upload);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_rejection_carries_server_error() {
        let failed = outcome(
            json!({"success": false, "error": "Invalid file"}),
            RequestKind::Upload,
        );
        assert_eq!(
            failed,
            ClassificationOutcome::Failure(FailureOutcome {
                error: Some("Invalid file".to_string()),
                image_data: None,
            })
        );
    }

    #[test]
    fn test_quality_truthiness() {
        let q = QualityInfo {
            brightness: Some(120.0),
            blur_score: Some(0.0),
            ..Default::default()
        };
        assert!(!q.is_complete());
        assert_eq!(q.blur_value(), None);
    }

    #[test]
    fn test_description_fallback() {
        let meta = FlowerMetadata {
            description: Some("Bunga harum".to_string()),
            ..Default::default()
        };
        assert_eq!(meta.display_description(), Some("Bunga harum"));
    }

    #[test]
    fn test_search_payload_ids() {
        let payload: SearchPayload = serde_json::from_value(json!({
            "success": true,
            "count": 2,
            "results": [{"id": "12", "name": "Mawar"}, {"id": 3, "name": "Mawar Putih"}]
        }))
        .unwrap();
        assert_eq!(payload.results.len(), 2);
        assert_eq!(payload.results[1].id.as_ref().unwrap().to_string(), "3");
    }
}

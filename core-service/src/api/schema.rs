//! Response Schemas - the JSON shapes callers see
//!
//! Rounding to display precision happens here and nowhere else.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::constants::{DISCLAIMER, DISPLAY_PRECISION, ITEM_COUNT, MAX_ANSWER, MIN_ANSWER};
use crate::logic::config::{ClassInfo, ClassTable};
use crate::logic::mapping::{round_display, PredictionResult, ProbabilityMap};
use crate::logic::model::{ArtifactMetadata, StatsSnapshot};
use crate::logic::questionnaire::{Item, ITEMS, RESPONSE_SCALE};
use crate::logic::service::{ServiceState, ServiceStatus};

// ============================================================================
// PREDICTION
// ============================================================================

/// Prediction response body
#[derive(Debug, Clone, Serialize)]
pub struct PredictionResponse {
    /// Human-readable class label
    pub prediction: String,
    /// Numeric class id (0-3)
    pub severity_level: i64,
    pub confidence: f64,
    /// Lowercased label -> probability, in class-id order
    pub probabilities: ProbabilityMap,
    pub description: String,
    pub disclaimer: &'static str,
}

impl From<&PredictionResult> for PredictionResponse {
    fn from(result: &PredictionResult) -> Self {
        Self {
            prediction: result.label.clone(),
            severity_level: result.class_id,
            confidence: round_display(result.confidence, DISPLAY_PRECISION),
            probabilities: result
                .probabilities
                .map_values(|p| round_display(p, DISPLAY_PRECISION)),
            description: result.description.clone(),
            disclaimer: DISCLAIMER,
        }
    }
}

impl From<PredictionResult> for PredictionResponse {
    fn from(result: PredictionResult) -> Self {
        Self::from(&result)
    }
}

// ============================================================================
// HEALTH
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthResponse {
    /// "healthy" when a model is loaded, "degraded" otherwise
    pub status: String,
    pub model_loaded: bool,
    pub version: String,
}

impl HealthResponse {
    pub fn new(model_loaded: bool, version: &str) -> Self {
        Self {
            status: if model_loaded { "healthy" } else { "degraded" }.to_string(),
            model_loaded,
            version: version.to_string(),
        }
    }
}

// ============================================================================
// QUESTIONNAIRE
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct QuestionInfo {
    pub id: &'static str,
    pub source_column: &'static str,
    pub text: &'static str,
}

impl From<&Item> for QuestionInfo {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id,
            source_column: item.source_column,
            text: item.text,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionsResponse {
    pub count: usize,
    pub min_answer: u8,
    pub max_answer: u8,
    /// Answer value -> meaning
    pub scale: BTreeMap<u8, &'static str>,
    pub questions: Vec<QuestionInfo>,
    pub classes: Vec<ClassInfo>,
}

impl QuestionsResponse {
    pub fn new(classes: &ClassTable) -> Self {
        Self {
            count: ITEM_COUNT,
            min_answer: MIN_ANSWER,
            max_answer: MAX_ANSWER,
            scale: RESPONSE_SCALE.iter().copied().collect(),
            questions: ITEMS.iter().map(QuestionInfo::from).collect(),
            classes: classes.iter().cloned().collect(),
        }
    }
}

// ============================================================================
// MODEL STATUS
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct ModelInfoResponse {
    pub state: ServiceState,
    pub model_loaded: bool,
    pub version: String,
    pub generation: u64,
    pub last_error: Option<String>,
    pub artifact: Option<ArtifactMetadata>,
    /// Shared config file the class table came from, if any
    pub class_config: Option<String>,
    pub stats: StatsSnapshot,
}

impl ModelInfoResponse {
    pub fn new(
        status: ServiceStatus,
        artifact: Option<ArtifactMetadata>,
        class_config: Option<String>,
    ) -> Self {
        Self {
            state: status.state,
            model_loaded: status.model_loaded,
            version: status.version,
            generation: status.generation,
            last_error: status.last_error,
            artifact,
            class_config,
            stats: status.stats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::mapping::map_result;
    use crate::logic::model::RawPrediction;

    #[test]
    fn test_prediction_response_rounds_for_display() {
        let raw = RawPrediction {
            class_id: 1,
            probabilities: Some(vec![0.123456, 0.654321, 0.2, 0.022223]),
        };
        let result = map_result(&raw, &ClassTable::defaults());
        let response = PredictionResponse::from(&result);

        assert_eq!(response.prediction, "Mild");
        assert_eq!(response.severity_level, 1);
        assert_eq!(response.confidence, 0.6543);
        assert_eq!(response.probabilities.get("none"), Some(0.1235));
        // Result itself keeps full precision
        assert_eq!(result.confidence, 0.654321);

        let json = serde_json::to_value(&response).unwrap();
        let keys: Vec<&String> = json["probabilities"].as_object().unwrap().keys().collect();
        assert_eq!(keys.len(), 4);
        assert_eq!(json["disclaimer"], DISCLAIMER);
    }

    #[test]
    fn test_health_status_strings() {
        assert_eq!(HealthResponse::new(true, "1.0.0").status, "healthy");
        assert_eq!(HealthResponse::new(false, "1.0.0").status, "degraded");
    }

    #[test]
    fn test_questions_catalogue() {
        let response = QuestionsResponse::new(&ClassTable::defaults());
        assert_eq!(response.questions.len(), ITEM_COUNT);
        assert_eq!(response.questions[0].id, "q1");
        assert_eq!(response.scale.len(), (MAX_ANSWER - MIN_ANSWER + 1) as usize);
        assert_eq!(response.classes.len(), 4);
    }
}

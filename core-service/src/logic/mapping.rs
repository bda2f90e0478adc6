//! Result Mapper - bind class ids to labels and build the final result
//!
//! Values stay unrounded here. Rounding to display precision happens only
//! when a result is turned into an API response.

use serde::ser::{Serialize, Serializer};

use super::config::ClassTable;
use super::model::RawPrediction;

pub const UNKNOWN_DESCRIPTION: &str = "No description available.";

// ============================================================================
// PROBABILITY MAP
// ============================================================================

/// Lowercased class label -> probability, kept in class-id order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProbabilityMap(Vec<(String, f64)>);

impl ProbabilityMap {
    pub fn get(&self, key: &str) -> Option<f64> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| *v)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.0.iter().map(|(_, v)| *v)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn max(&self) -> f64 {
        self.values().fold(0.0, f64::max)
    }

    pub fn sum(&self) -> f64 {
        self.values().sum()
    }

    /// Same keys, every value passed through `f`
    pub fn map_values(&self, f: impl Fn(f64) -> f64) -> Self {
        Self(self.0.iter().map(|(k, v)| (k.clone(), f(*v))).collect())
    }
}

impl Serialize for ProbabilityMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(k, v)| (k, v)))
    }
}

// ============================================================================
// PREDICTION RESULT
// ============================================================================

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct PredictionResult {
    pub class_id: i64,
    pub label: String,
    pub description: String,
    /// Largest class probability
    pub confidence: f64,
    pub probabilities: ProbabilityMap,
    /// True when the distribution was synthesized one-hot
    pub one_hot: bool,
}

// ============================================================================
// MAPPING
// ============================================================================

pub fn map_result(raw: &RawPrediction, classes: &ClassTable) -> PredictionResult {
    let (label, description) = match classes.get(raw.class_id) {
        Some(info) => (info.label.clone(), info.description.clone()),
        None => (
            format!("Unknown ({})", raw.class_id),
            UNKNOWN_DESCRIPTION.to_string(),
        ),
    };

    let (probabilities, confidence, one_hot) = match &raw.probabilities {
        Some(values) => {
            let map = ProbabilityMap(
                classes
                    .iter()
                    .zip(values.iter())
                    .map(|(info, &p)| (info.key(), p))
                    .collect(),
            );
            let confidence = map.max();
            (map, confidence, false)
        }
        None => {
            let map = ProbabilityMap(
                classes
                    .iter()
                    .map(|info| {
                        let p = if info.id as i64 == raw.class_id { 1.0 } else { 0.0 };
                        (info.key(), p)
                    })
                    .collect(),
            );
            (map, 1.0, true)
        }
    };

    PredictionResult {
        class_id: raw.class_id,
        label,
        description,
        confidence,
        probabilities,
        one_hot,
    }
}

/// Round for presentation only
pub fn round_display(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

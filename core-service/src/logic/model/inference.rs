//! Inference Engine - run the classifier and check what comes back
//!
//! A probability vector that does not fit the class table means the
//! artifact is broken, not the request: that is a `ModelIntegrity` error.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::constants::{CLASS_COUNT, PROBABILITY_SUM_TOLERANCE};
use crate::error::{ScreeningError, ScreeningResult};
use crate::logic::features::FeatureVector;

use super::artifact::ModelArtifact;

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Raw classifier output
#[derive(Debug, Clone, PartialEq)]
pub struct RawPrediction {
    pub class_id: i64,
    /// Indexed by class id `0..CLASS_COUNT`; `None` when unsupported
    pub probabilities: Option<Vec<f64>>,
}

// ============================================================================
// INFERENCE
// ============================================================================

pub fn infer(features: &FeatureVector, artifact: &ModelArtifact) -> ScreeningResult<RawPrediction> {
    let (class_id, probabilities) = artifact
        .classifier()
        .infer(features)
        .map_err(|e| ScreeningError::Inference(e.0))?;

    let probabilities = match probabilities {
        Some(raw) => Some(check_probabilities(raw, artifact.class_order())?),
        None => None,
    };

    Ok(RawPrediction {
        class_id,
        probabilities,
    })
}

/// Enforce length, range and mass, then put columns in class-id order
fn check_probabilities(raw: Vec<f64>, class_order: Option<&[i64]>) -> ScreeningResult<Vec<f64>> {
    if raw.len() != CLASS_COUNT {
        return Err(ScreeningError::ModelIntegrity(format!(
            "model returned {} probabilities, class table has {} classes",
            raw.len(),
            CLASS_COUNT
        )));
    }
    if raw.iter().any(|p| !p.is_finite() || *p < 0.0) {
        return Err(ScreeningError::ModelIntegrity(format!(
            "probabilities out of range: {:?}",
            raw
        )));
    }
    let total: f64 = raw.iter().sum();
    if (total - 1.0).abs() > PROBABILITY_SUM_TOLERANCE {
        return Err(ScreeningError::ModelIntegrity(format!(
            "probabilities sum to {}, expected 1",
            total
        )));
    }

    match class_order {
        None => Ok(raw),
        Some(order) => align(raw, order),
    }
}

fn align(raw: Vec<f64>, order: &[i64]) -> ScreeningResult<Vec<f64>> {
    if order.len() != CLASS_COUNT {
        return Err(ScreeningError::ModelIntegrity(format!(
            "class order lists {} classes, expected {}",
            order.len(),
            CLASS_COUNT
        )));
    }

    let mut aligned = vec![f64::NAN; CLASS_COUNT];
    for (&class_id, p) in order.iter().zip(raw) {
        let slot = usize::try_from(class_id)
            .ok()
            .filter(|&i| i < CLASS_COUNT)
            .ok_or_else(|| {
                ScreeningError::ModelIntegrity(format!("class order has unknown class {}", class_id))
            })?;
        if !aligned[slot].is_nan() {
            return Err(ScreeningError::ModelIntegrity(format!(
                "class order repeats class {}",
                class_id
            )));
        }
        aligned[slot] = p;
    }
    Ok(aligned)
}

// ============================================================================
// STATS
// ============================================================================

/// Latency and outcome counters for one service instance
#[derive(Debug, Default)]
pub struct InferenceStats {
    latency_sum_us: AtomicU64,
    inference_count: AtomicU64,
    failure_count: AtomicU64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub inference_count: u64,
    pub failure_count: u64,
    pub avg_latency_ms: f32,
}

impl InferenceStats {
    pub fn record_success(&self, elapsed_us: u64) {
        self.latency_sum_us.fetch_add(elapsed_us, Ordering::Relaxed);
        self.inference_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.failure_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        let sum = self.latency_sum_us.load(Ordering::Relaxed);
        let count = self.inference_count.load(Ordering::Relaxed);
        let avg = if count > 0 { (sum as f32 / count as f32) / 1000.0 } else { 0.0 };

        StatsSnapshot {
            inference_count: count,
            failure_count: self.failure_count.load(Ordering::Relaxed),
            avg_latency_ms: avg,
        }
    }
}

// ============================================================================
// UNIT TESTS
// ============================================================================

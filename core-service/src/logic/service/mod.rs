//! Model Service - the single entry point callers use
//!
//! Owns the currently published generation (artifact + class table) and
//! runs the validate -> encode -> infer -> map pipeline against it.
//!
//! # Lifecycle
//!
//! ```text
//! Unloaded --load ok--> Loaded --reload ok--> Loaded (new generation)
//!    |                    |
//!    +--load err--> Failed +--reload err--> Loaded (previous generation kept)
//! ```
//!
//! A generation is published with a single pointer swap, so a concurrent
//! `predict` sees either the old bundle or the new one, never a mix.

#[cfg(test)]
mod tests;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ArtifactLoadError, ScreeningError, ScreeningResult};
use crate::logic::answers::{validate_json, AnswerVector};
use crate::logic::config::ClassTable;
use crate::logic::features::encode;
use crate::logic::loader::{load_bundle, ArtifactSettings, LoadReport, LoadedBundle};
use crate::logic::mapping::{map_result, PredictionResult};
use crate::logic::model::{infer, ArtifactMetadata, InferenceStats, ModelArtifact, StatsSnapshot};

// ============================================================================
// STATE
// ============================================================================

/// One immutable, published artifact bundle
#[derive(Debug)]
struct Generation {
    artifact: ModelArtifact,
    classes: ClassTable,
    number: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceState {
    Unloaded,
    Loaded,
    /// Last load failed and nothing was ever published
    Failed,
}

#[derive(Debug, Clone, Serialize)]
pub struct ServiceStatus {
    pub state: ServiceState,
    pub model_loaded: bool,
    pub version: String,
    /// Number of generations published so far
    pub generation: u64,
    pub last_error: Option<String>,
    pub stats: StatsSnapshot,
}

// ============================================================================
// SERVICE
// ============================================================================

pub struct ModelService {
    settings: ArtifactSettings,
    version: String,
    current: RwLock<Option<Arc<Generation>>>,
    last_error: RwLock<Option<String>>,
    stats: InferenceStats,
}

impl ModelService {
    pub fn new(settings: ArtifactSettings, version: impl Into<String>) -> Self {
        Self {
            settings,
            version: version.into(),
            current: RwLock::new(None),
            last_error: RwLock::new(None),
            stats: InferenceStats::default(),
        }
    }

    pub fn settings(&self) -> &ArtifactSettings {
        &self.settings
    }

    /// Load from `root`, or from the configured artifact directory.
    ///
    /// On failure the previously published generation (if any) stays live.
    pub fn load(&self, root: Option<&Path>) -> Result<LoadReport, ArtifactLoadError> {
        let settings = match root {
            Some(dir) => self.settings.rooted_at(dir),
            None => self.settings.clone(),
        };

        log::info!("Loading artifacts from {}", settings.artifact_dir.display());
        match load_bundle(&settings) {
            Ok(bundle) => {
                let report = bundle.report();
                let number = self.publish(bundle);
                log::info!(
                    "Model generation {} published ({}, {})",
                    number,
                    report.metadata.model_format,
                    report.metadata.checksum.as_deref().unwrap_or("no checksum")
                );
                Ok(report)
            }
            Err(e) => {
                if self.is_loaded() {
                    log::error!("Reload failed, keeping current model: {}", e);
                } else {
                    log::error!("Error loading model: {}", e);
                }
                *self.last_error.write() = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Re-run `load` against the configured artifact directory
    pub fn reload(&self) -> Result<LoadReport, ArtifactLoadError> {
        self.load(None)
    }

    /// Publish an in-memory artifact
    pub fn install(&self, artifact: ModelArtifact, classes: ClassTable) -> u64 {
        self.publish(LoadedBundle { artifact, classes })
    }

    fn publish(&self, bundle: LoadedBundle) -> u64 {
        let mut current = self.current.write();
        let number = current.as_ref().map_or(1, |g| g.number + 1);
        *current = Some(Arc::new(Generation {
            artifact: bundle.artifact,
            classes: bundle.classes,
            number,
        }));
        *self.last_error.write() = None;
        number
    }

    fn generation(&self) -> Option<Arc<Generation>> {
        self.current.read().clone()
    }

    // ------------------------------------------------------------------------
    // Prediction
    // ------------------------------------------------------------------------

    /// Predict from an already validated answer vector
    pub fn predict(&self, answers: &AnswerVector) -> ScreeningResult<PredictionResult> {
        let generation = self.generation().ok_or(ScreeningError::NotLoaded);
        let result = generation.and_then(|g| self.run(&g, answers));
        self.observe(result)
    }

    /// Validate a raw JSON request body, then predict.
    ///
    /// An unloaded service reports `NotLoaded` before looking at the input.
    pub fn predict_json(&self, raw: &Value) -> ScreeningResult<PredictionResult> {
        let result = self.generation().ok_or(ScreeningError::NotLoaded).and_then(|g| {
            let answers = validate_json(raw)?;
            self.run(&g, &answers)
        });
        self.observe(result)
    }

    fn run(&self, generation: &Generation, answers: &AnswerVector) -> ScreeningResult<PredictionResult> {
        let start = Instant::now();
        let features = encode(answers, &generation.artifact);
        let raw = infer(&features, &generation.artifact)?;
        let result = map_result(&raw, &generation.classes);
        self.stats.record_success(start.elapsed().as_micros() as u64);
        Ok(result)
    }

    fn observe(&self, result: ScreeningResult<PredictionResult>) -> ScreeningResult<PredictionResult> {
        match &result {
            Ok(prediction) => log::debug!(
                "Prediction: {} ({:.4})",
                prediction.label,
                prediction.confidence
            ),
            Err(e) => {
                self.stats.record_failure();
                if e.is_expected() {
                    log::warn!("Prediction rejected: {}", e);
                } else {
                    log::error!("Prediction failed: {}", e);
                }
            }
        }
        result
    }

    // ------------------------------------------------------------------------
    // Introspection
    // ------------------------------------------------------------------------

    pub fn is_loaded(&self) -> bool {
        self.current.read().is_some()
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn state(&self) -> ServiceState {
        if self.is_loaded() {
            ServiceState::Loaded
        } else if self.last_error.read().is_some() {
            ServiceState::Failed
        } else {
            ServiceState::Unloaded
        }
    }

    pub fn status(&self) -> ServiceStatus {
        let generation = self.generation();
        ServiceStatus {
            state: self.state(),
            model_loaded: generation.is_some(),
            version: self.version.clone(),
            generation: generation.map_or(0, |g| g.number),
            last_error: self.last_error.read().clone(),
            stats: self.stats.snapshot(),
        }
    }

    pub fn metadata(&self) -> Option<ArtifactMetadata> {
        self.generation().map(|g| g.artifact.metadata())
    }

    /// Class table of the live generation, or the built-in one
    pub fn class_table(&self) -> ClassTable {
        self.generation()
            .map(|g| g.classes.clone())
            .unwrap_or_else(ClassTable::defaults)
    }

    /// Where the live class table came from
    pub fn class_source(&self) -> Option<PathBuf> {
        self.generation()
            .and_then(|g| g.classes.source().map(Path::to_path_buf))
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }
}

impl std::fmt::Debug for ModelService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelService")
            .field("artifact_dir", &self.settings.artifact_dir)
            .field("version", &self.version)
            .field("state", &self.state())
            .finish()
    }
}

//! Artifact Loader
//!
//! Assembles a [`ModelArtifact`] and its [`ClassTable`] from an artifact
//! directory. The classifier is the only mandatory file; feature names,
//! scaler and class order are optional and fall back to the canonical
//! layout, raw features and positional columns respectively.
//!
//! Loading is all-or-nothing: any present-but-broken file aborts the load
//! and nothing is published.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::constants::{
    CLASSIFIER_FILES, CLASS_COUNT, CLASS_ORDER_FILE, DEFAULT_ARTIFACT_DIR, FEATURE_NAMES_FILE,
    ITEM_COUNT, SCALER_FILE,
};
use crate::error::ArtifactLoadError;
use crate::logic::config::{candidate_config_paths, resolve_class_table, ClassTable};
use crate::logic::features::{FeatureLayout, StandardScaler};
use crate::logic::model::{ArtifactMetadata, Classifier, ClassifierFormat, LinearClassifier, ModelArtifact};

// ============================================================================
// SETTINGS
// ============================================================================

/// Where the loader looks for each piece of the bundle
#[derive(Debug, Clone)]
pub struct ArtifactSettings {
    pub artifact_dir: PathBuf,
    /// Classifier file names, first existing wins
    pub classifier_files: Vec<String>,
    pub scaler_file: String,
    pub feature_names_file: String,
    pub class_order_file: String,
    /// Tried before the default search
    pub config_override: Option<PathBuf>,
    /// Replaces the default search when set
    pub config_paths: Option<Vec<PathBuf>>,
}

impl ArtifactSettings {
    pub fn new(artifact_dir: impl Into<PathBuf>) -> Self {
        Self {
            artifact_dir: artifact_dir.into(),
            classifier_files: CLASSIFIER_FILES.iter().map(|s| s.to_string()).collect(),
            scaler_file: SCALER_FILE.to_string(),
            feature_names_file: FEATURE_NAMES_FILE.to_string(),
            class_order_file: CLASS_ORDER_FILE.to_string(),
            config_override: None,
            config_paths: None,
        }
    }

    pub fn with_config_override(mut self, path: Option<PathBuf>) -> Self {
        self.config_override = path;
        self
    }

    pub fn with_config_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.config_paths = Some(paths);
        self
    }

    /// Same settings rooted at another directory
    pub fn rooted_at(&self, artifact_dir: &Path) -> Self {
        Self {
            artifact_dir: artifact_dir.to_path_buf(),
            ..self.clone()
        }
    }

    /// Shared config candidates in priority order
    pub fn config_candidates(&self) -> Vec<PathBuf> {
        let mut candidates: Vec<PathBuf> = self.config_override.iter().cloned().collect();
        match &self.config_paths {
            Some(paths) => candidates.extend(paths.iter().cloned()),
            None => candidates.extend(candidate_config_paths(&self.artifact_dir)),
        }
        candidates
    }

    fn classifier_candidates(&self) -> Vec<PathBuf> {
        self.classifier_files
            .iter()
            .map(|name| self.artifact_dir.join(name))
            .collect()
    }
}

impl Default for ArtifactSettings {
    fn default() -> Self {
        Self::new(DEFAULT_ARTIFACT_DIR)
    }
}

// ============================================================================
// RESULT
// ============================================================================

/// A fully assembled bundle, ready to publish
#[derive(Debug)]
pub struct LoadedBundle {
    pub artifact: ModelArtifact,
    pub classes: ClassTable,
}

/// Summary returned to callers of `load`
#[derive(Debug, Clone, Serialize)]
pub struct LoadReport {
    pub metadata: ArtifactMetadata,
    /// `None` when the built-in class table is in use
    pub class_config: Option<PathBuf>,
}

impl LoadedBundle {
    pub fn report(&self) -> LoadReport {
        LoadReport {
            metadata: self.artifact.metadata(),
            class_config: self.classes.source().map(Path::to_path_buf),
        }
    }
}

// ============================================================================
// LOADING
// ============================================================================

/// Load the class table and the artifact described by `settings`
pub fn load_bundle(settings: &ArtifactSettings) -> Result<LoadedBundle, ArtifactLoadError> {
    let classes = resolve_class_table(&settings.config_candidates());
    let artifact = load_artifact(settings)?;
    Ok(LoadedBundle { artifact, classes })
}

/// Load the artifact described by `settings`
pub fn load_artifact(settings: &ArtifactSettings) -> Result<ModelArtifact, ArtifactLoadError> {
    let candidates = settings.classifier_candidates();
    let model_path = candidates
        .iter()
        .find(|path| path.is_file())
        .cloned()
        .ok_or_else(|| ArtifactLoadError::ClassifierMissing {
            searched: candidates.clone(),
        })?;

    log::info!("Loading model from: {}", model_path.display());
    let checksum = file_checksum(&model_path)?;
    let class_order = load_class_order(&settings.artifact_dir.join(&settings.class_order_file))?;
    let classifier = open_classifier(&model_path, class_order.as_deref())?;

    if let Some(classes) = classifier.classes() {
        check_class_ids(&model_path, classes)?;
        if let Some(order) = class_order.as_deref() {
            if order != classes {
                return Err(ArtifactLoadError::Incompatible {
                    path: model_path,
                    reason: format!("class order {:?} conflicts with model classes {:?}", order, classes),
                });
            }
        }
    }

    let layout = load_layout(&settings.artifact_dir.join(&settings.feature_names_file))?;
    if let Some(expected) = classifier.expected_features() {
        if expected != layout.len() {
            return Err(ArtifactLoadError::Incompatible {
                path: model_path,
                reason: format!(
                    "model expects {} features, layout has {}",
                    expected,
                    layout.len()
                ),
            });
        }
    }

    let scaler = load_scaler(&settings.artifact_dir.join(&settings.scaler_file), layout.len())?;

    let artifact = ModelArtifact::new(classifier)
        .with_layout(layout)
        .with_scaler(scaler)
        .with_class_order(class_order)
        .with_source(model_path.display().to_string(), Some(checksum));

    log::info!(
        "Model loaded from {} ({})",
        model_path.display(),
        artifact.classifier().kind()
    );
    Ok(artifact)
}

/// Open the classifier file. A linear model labels its columns with
/// `class_order` when one is given.
fn open_classifier(
    path: &Path,
    class_order: Option<&[i64]>,
) -> Result<Box<dyn Classifier>, ArtifactLoadError> {
    let format = ClassifierFormat::from_path(path).ok_or_else(|| ArtifactLoadError::Incompatible {
        path: path.to_path_buf(),
        reason: "unrecognised classifier file extension".to_string(),
    })?;

    match format {
        ClassifierFormat::Linear => {
            let model = LinearClassifier::from_file(path)?;
            let model = match class_order {
                Some(order) => model.with_class_order(order).map_err(|reason| {
                    ArtifactLoadError::Incompatible {
                        path: path.to_path_buf(),
                        reason,
                    }
                })?,
                None => model,
            };
            Ok(Box::new(model))
        }
        #[cfg(feature = "onnx")]
        ClassifierFormat::Onnx => Ok(Box::new(crate::logic::model::OnnxClassifier::from_file(path)?)),
        #[cfg(not(feature = "onnx"))]
        ClassifierFormat::Onnx => Err(ArtifactLoadError::Incompatible {
            path: path.to_path_buf(),
            reason: "built without ONNX runtime support".to_string(),
        }),
    }
}

fn load_layout(path: &Path) -> Result<FeatureLayout, ArtifactLoadError> {
    if !path.exists() {
        log::warn!("No feature names found - using canonical q1..q{} order", ITEM_COUNT);
        return Ok(FeatureLayout::canonical());
    }

    let names: Vec<String> = read_json(path)?;
    let layout = FeatureLayout::from_names(names).map_err(|e| ArtifactLoadError::Incompatible {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    log::info!(
        "Loaded {} feature names (layout {:08x})",
        layout.len(),
        layout.hash()
    );
    Ok(layout)
}

fn load_scaler(path: &Path, features: usize) -> Result<Option<StandardScaler>, ArtifactLoadError> {
    if !path.exists() {
        log::info!("No scaler found - using raw features");
        return Ok(None);
    }

    let scaler: StandardScaler = read_json(path)?;
    scaler
        .check(features)
        .map_err(|reason| ArtifactLoadError::Incompatible {
            path: path.to_path_buf(),
            reason,
        })?;
    log::info!("Scaler loaded from {}", path.display());
    Ok(Some(scaler))
}

fn load_class_order(path: &Path) -> Result<Option<Vec<i64>>, ArtifactLoadError> {
    if !path.exists() {
        return Ok(None);
    }

    let order: Vec<i64> = read_json(path)?;
    check_class_ids(path, &order)?;
    log::info!("Class order loaded: {:?}", order);
    Ok(Some(order))
}

/// Class ids must be a permutation of the class table ids
fn check_class_ids(path: &Path, ids: &[i64]) -> Result<(), ArtifactLoadError> {
    let mut sorted = ids.to_vec();
    sorted.sort_unstable();
    if !sorted.iter().copied().eq(0..CLASS_COUNT as i64) {
        return Err(ArtifactLoadError::Incompatible {
            path: path.to_path_buf(),
            reason: format!("class ids {:?} are not a permutation of 0..{}", ids, CLASS_COUNT),
        });
    }
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactLoadError> {
    let content = std::fs::read_to_string(path).map_err(|source| ArtifactLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| ArtifactLoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// `sha256:<hex>` of a file's bytes
pub fn file_checksum(path: &Path) -> Result<String, ArtifactLoadError> {
    let bytes = std::fs::read(path).map_err(|source| ArtifactLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(format!("sha256:{}", hex::encode(hasher.finalize())))
}

// ============================================================================
// TESTS
// ============================================================================

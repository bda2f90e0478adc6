//! Model Artifact - everything needed to run one prediction
//!
//! Built once by the loader (or directly in tests), then shared read-only
//! behind an `Arc` by every request.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::logic::features::{FeatureLayout, LayoutInfo, StandardScaler};

use super::classifier::Classifier;

/// Model metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactMetadata {
    pub model_path: String,
    pub model_format: String,
    /// `sha256:<hex>` of the classifier file
    pub checksum: Option<String>,
    pub layout: LayoutInfo,
    pub scaler: bool,
    pub probabilities: bool,
    pub class_order: Option<Vec<i64>>,
    pub loaded_at: DateTime<Utc>,
}

pub struct ModelArtifact {
    classifier: Box<dyn Classifier>,
    scaler: Option<StandardScaler>,
    layout: FeatureLayout,
    /// Class id of each probability column
    class_order: Option<Vec<i64>>,
    model_path: String,
    checksum: Option<String>,
    loaded_at: DateTime<Utc>,
}

impl ModelArtifact {
    /// In-memory artifact with canonical layout and no scaler
    pub fn new(classifier: Box<dyn Classifier>) -> Self {
        let class_order = classifier.classes().map(|c| c.to_vec());
        Self {
            classifier,
            scaler: None,
            layout: FeatureLayout::canonical(),
            class_order,
            model_path: "<memory>".to_string(),
            checksum: None,
            loaded_at: Utc::now(),
        }
    }

    pub fn with_layout(mut self, layout: FeatureLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_scaler(mut self, scaler: Option<StandardScaler>) -> Self {
        self.scaler = scaler;
        self
    }

    /// An explicit order overrides whatever the classifier reports
    pub fn with_class_order(mut self, class_order: Option<Vec<i64>>) -> Self {
        if class_order.is_some() {
            self.class_order = class_order;
        }
        self
    }

    pub fn with_source(mut self, model_path: String, checksum: Option<String>) -> Self {
        self.model_path = model_path;
        self.checksum = checksum;
        self
    }

    pub fn classifier(&self) -> &dyn Classifier {
        self.classifier.as_ref()
    }

    pub fn scaler(&self) -> Option<&StandardScaler> {
        self.scaler.as_ref()
    }

    pub fn layout(&self) -> &FeatureLayout {
        &self.layout
    }

    pub fn class_order(&self) -> Option<&[i64]> {
        self.class_order.as_deref()
    }

    pub fn metadata(&self) -> ArtifactMetadata {
        ArtifactMetadata {
            model_path: self.model_path.clone(),
            model_format: self.classifier.kind().to_string(),
            checksum: self.checksum.clone(),
            layout: self.layout.info(),
            scaler: self.scaler.is_some(),
            probabilities: self.classifier.supports_probabilities(),
            class_order: self.class_order.clone(),
            loaded_at: self.loaded_at,
        }
    }
}

impl std::fmt::Debug for ModelArtifact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelArtifact")
            .field("classifier", &self.classifier.kind())
            .field("model_path", &self.model_path)
            .field("scaler", &self.scaler.is_some())
            .field("layout_hash", &self.layout.hash())
            .field("class_order", &self.class_order)
            .finish()
    }
}

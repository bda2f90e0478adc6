//! Class Table Configuration
//!
//! Labels and descriptions for the four severity classes. Resolved once per
//! load from the first readable `shared_config.json` candidate, falling back
//! to the built-in table. Never consulted per request.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::{CLASS_COUNT, CONTAINER_CONFIG_PATH, SHARED_CONFIG_FILE, USER_CONFIG_DIR};
use crate::error::ArtifactLoadError;

// ============================================================================
// DEFAULTS
// ============================================================================

const DEFAULT_LABELS: [&str; CLASS_COUNT] = ["None", "Mild", "Moderate", "Severe"];

const DEFAULT_DESCRIPTIONS: [&str; CLASS_COUNT] = [
    "No significant indicators of psychiatric distress detected.",
    "Mild indicators detected. Consider self-care practices and monitoring.",
    "Moderate indicators detected. We recommend consulting with a mental health professional.",
    "Severe indicators detected. We strongly recommend seeking professional help immediately.",
];

// ============================================================================
// CLASS TABLE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassInfo {
    pub id: usize,
    pub label: String,
    pub description: String,
}

impl ClassInfo {
    /// Key used in the probability map
    pub fn key(&self) -> String {
        self.label.to_lowercase()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassTable {
    classes: Vec<ClassInfo>,
    /// `None` when the built-in table is in use
    source: Option<PathBuf>,
}

impl ClassTable {
    pub fn defaults() -> Self {
        let classes = DEFAULT_LABELS
            .iter()
            .zip(DEFAULT_DESCRIPTIONS.iter())
            .enumerate()
            .map(|(id, (label, description))| ClassInfo {
                id,
                label: label.to_string(),
                description: description.to_string(),
            })
            .collect();
        Self { classes, source: None }
    }

    pub fn get(&self, class_id: i64) -> Option<&ClassInfo> {
        usize::try_from(class_id).ok().and_then(|i| self.classes.get(i))
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClassInfo> {
        self.classes.iter()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    fn from_file(file: SharedConfigFile, path: &Path) -> Result<Self, String> {
        let labels = index_by_class(&file.class_labels, "class_labels")?;
        let descriptions = index_by_class(&file.class_descriptions, "class_descriptions")?;

        let mut classes = Vec::with_capacity(CLASS_COUNT);
        let mut keys = HashSet::new();
        for id in 0..CLASS_COUNT {
            let label = labels
                .get(&id)
                .map(|l| l.trim().to_string())
                .filter(|l| !l.is_empty())
                .ok_or_else(|| format!("class_labels has no label for class {}", id))?;
            if !keys.insert(label.to_lowercase()) {
                return Err(format!("label {:?} is used twice", label));
            }
            let description = descriptions
                .get(&id)
                .cloned()
                .unwrap_or_else(|| DEFAULT_DESCRIPTIONS[id].to_string());
            classes.push(ClassInfo { id, label, description });
        }

        Ok(Self {
            classes,
            source: Some(path.to_path_buf()),
        })
    }
}

impl Default for ClassTable {
    fn default() -> Self {
        Self::defaults()
    }
}

// ============================================================================
// CONFIG FILE
// ============================================================================

/// `shared_config.json`; ids are JSON object keys ("0".."3")
#[derive(Debug, Deserialize)]
struct SharedConfigFile {
    class_labels: BTreeMap<String, String>,
    #[serde(default)]
    class_descriptions: BTreeMap<String, String>,
}

fn index_by_class(
    map: &BTreeMap<String, String>,
    field: &str,
) -> Result<BTreeMap<usize, String>, String> {
    map.iter()
        .map(|(key, value)| {
            key.trim()
                .parse::<usize>()
                .ok()
                .filter(|&id| id < CLASS_COUNT)
                .map(|id| (id, value.clone()))
                .ok_or_else(|| format!("{} has unknown class id {:?}", field, key))
        })
        .collect()
}

/// Read and check one candidate
pub fn load_class_table(path: &Path) -> Result<ClassTable, ArtifactLoadError> {
    let content = std::fs::read_to_string(path).map_err(|source| ArtifactLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let file: SharedConfigFile =
        serde_json::from_str(&content).map_err(|source| ArtifactLoadError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    ClassTable::from_file(file, path).map_err(|reason| ArtifactLoadError::Incompatible {
        path: path.to_path_buf(),
        reason,
    })
}

// ============================================================================
// RESOLUTION
// ============================================================================

/// Candidate locations in priority order for an artifact directory
pub fn candidate_config_paths(artifact_dir: &Path) -> Vec<PathBuf> {
    let mut paths = vec![artifact_dir.join(SHARED_CONFIG_FILE)];
    if let Some(parent) = artifact_dir.parent() {
        paths.push(parent.join(SHARED_CONFIG_FILE));
    }
    paths.push(PathBuf::from(CONTAINER_CONFIG_PATH));
    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join(USER_CONFIG_DIR).join(SHARED_CONFIG_FILE));
    }
    paths
}

/// First existing, parseable candidate wins; this never fails
pub fn resolve_class_table(candidates: &[PathBuf]) -> ClassTable {
    for path in candidates {
        if !path.exists() {
            continue;
        }
        match load_class_table(path) {
            Ok(table) => {
                log::info!("Loaded configuration from {}", path.display());
                return table;
            }
            Err(e) => log::warn!("Failed to load config from {}: {}", path.display(), e),
        }
    }

    log::info!("Using default class labels and descriptions");
    ClassTable::defaults()
}

// ============================================================================
// TESTS
// ============================================================================

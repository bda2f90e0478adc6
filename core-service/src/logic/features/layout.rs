//! Feature Layout - column order the classifier was trained on
//!
//! **A wrong layout is a silent correctness bug, not a crash.**
//!
//! The layout is resolved once, when the artifact is loaded: every feature
//! name is mapped to the answer position it reads. Encoding then becomes a
//! plain gather through `columns`.

use crc32fast::Hasher;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::ITEM_COUNT;
use crate::logic::questionnaire::{default_feature_names, resolve_feature_name};

// ============================================================================
// LAYOUT VERSION
// ============================================================================

/// Bump when the hashing scheme changes
pub const LAYOUT_VERSION: u8 = 1;

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("expected {expected} feature names, got {actual}")]
    WrongLength { expected: usize, actual: usize },

    #[error("feature name {0:?} does not match any questionnaire item")]
    Unknown(String),

    #[error("feature name {0:?} maps to an item that is already used")]
    Duplicate(String),
}

// ============================================================================
// FEATURE LAYOUT
// ============================================================================

static CANONICAL_LAYOUT: Lazy<FeatureLayout> = Lazy::new(|| {
    let names = default_feature_names();
    let hash = compute_layout_hash(&names);
    FeatureLayout {
        names,
        columns: (0..ITEM_COUNT).collect(),
        hash,
    }
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureLayout {
    names: Vec<String>,
    /// `columns[f]` is the answer index feeding feature `f`
    columns: Vec<usize>,
    hash: u32,
}

impl FeatureLayout {
    /// `q1..q30` in positional order
    pub fn canonical() -> Self {
        CANONICAL_LAYOUT.clone()
    }

    /// Resolve names shipped with an artifact
    pub fn from_names(names: Vec<String>) -> Result<Self, LayoutError> {
        if names.len() != ITEM_COUNT {
            return Err(LayoutError::WrongLength {
                expected: ITEM_COUNT,
                actual: names.len(),
            });
        }

        let mut used = [false; ITEM_COUNT];
        let mut columns = Vec::with_capacity(ITEM_COUNT);

        for name in &names {
            let index = resolve_feature_name(name)
                .ok_or_else(|| LayoutError::Unknown(name.clone()))?;
            if used[index] {
                return Err(LayoutError::Duplicate(name.clone()));
            }
            used[index] = true;
            columns.push(index);
        }

        let hash = compute_layout_hash(&names);
        Ok(Self { names, columns, hash })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn columns(&self) -> &[usize] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn hash(&self) -> u32 {
        self.hash
    }

    /// True when features are read in the same order as the answers
    pub fn is_identity(&self) -> bool {
        self.columns.iter().enumerate().all(|(f, &c)| f == c)
    }

    pub fn info(&self) -> LayoutInfo {
        LayoutInfo {
            version: LAYOUT_VERSION,
            hash: self.hash,
            feature_count: self.len(),
            feature_names: self.names.clone(),
            identity: self.is_identity(),
        }
    }
}

impl Default for FeatureLayout {
    fn default() -> Self {
        Self::canonical()
    }
}

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// CRC32 over the version byte and the NUL-separated names
pub fn compute_layout_hash(names: &[String]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(&[LAYOUT_VERSION]);
    for name in names {
        hasher.update(name.as_bytes());
        hasher.update(&[0]);
    }
    hasher.finalize()
}

/// Serializable layout summary for status and logging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutInfo {
    pub version: u8,
    pub hash: u32,
    pub feature_count: usize,
    pub feature_names: Vec<String>,
    pub identity: bool,
}

// ============================================================================
// TESTS
// ============================================================================

//! Answer Vector - validated questionnaire input
//!
//! An `AnswerVector` can only be obtained through the validator, so holding
//! one proves the shape and domain checks already passed.

pub mod validate;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::constants::ITEM_COUNT;
use crate::logic::questionnaire::ITEMS;

pub use validate::{validate_integers, validate_json, validate_numbers};

/// Exactly `ITEM_COUNT` ordinal answers in canonical item order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerVector {
    values: [u8; ITEM_COUNT],
}

impl AnswerVector {
    /// Caller guarantees every value is within the response scale
    pub(crate) fn from_checked(values: [u8; ITEM_COUNT]) -> Self {
        Self { values }
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.values
    }

    /// Answer at a zero-based canonical position
    pub fn get(&self, index: usize) -> Option<u8> {
        self.values.get(index).copied()
    }

    /// Answer for a request key such as `q12`
    pub fn get_by_id(&self, id: &str) -> Option<u8> {
        crate::logic::questionnaire::item_index(id).and_then(|i| self.get(i))
    }

    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.values.iter().copied()
    }

    /// Sum of all answers (30..=120)
    pub fn total(&self) -> u32 {
        self.values.iter().map(|&v| v as u32).sum()
    }
}

impl TryFrom<&[i64]> for AnswerVector {
    type Error = crate::error::ValidationError;

    fn try_from(values: &[i64]) -> Result<Self, Self::Error> {
        validate_integers(values)
    }
}

/// Serializes back to the request shape `{"q1": .., "q30": ..}`
impl Serialize for AnswerVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(ITEM_COUNT))?;
        for (item, value) in ITEMS.iter().zip(self.values.iter()) {
            map.serialize_entry(item.id, value)?;
        }
        map.end()
    }
}

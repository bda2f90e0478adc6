//! Answer Vector Validator
//!
//! Sole gate between raw caller input and the feature encoder. Checks run
//! in a fixed order: shape first, then each value in canonical item order,
//! so the first offending item is the one reported.

use serde_json::{Map, Value};

use crate::constants::{ITEM_COUNT, MAX_ANSWER, MIN_ANSWER};
use crate::error::{DomainError, ShapeError, ValidationError};
use crate::logic::questionnaire::{item_index, ITEMS};

use super::AnswerVector;

// ============================================================================
// ENTRY POINTS
// ============================================================================

/// Validate an arbitrary JSON document.
///
/// Accepts an object keyed `q1..q30` or an array of 30 answers.
pub fn validate_json(raw: &Value) -> Result<AnswerVector, ValidationError> {
    match raw {
        Value::Object(map) => validate_object(map),
        Value::Array(items) => {
            check_shape(items.len())?;
            collect(items.iter().enumerate().map(|(i, v)| json_ordinal(i, v)))
        }
        Value::Null => Err(ShapeError { expected: ITEM_COUNT, actual: 0 }.into()),
        _ => Err(ShapeError { expected: ITEM_COUNT, actual: 1 }.into()),
    }
}

/// Validate integer answers in canonical order
pub fn validate_integers(values: &[i64]) -> Result<AnswerVector, ValidationError> {
    check_shape(values.len())?;
    collect(values.iter().enumerate().map(|(i, &v)| integer_ordinal(i, v)))
}

/// Validate numeric answers; integral floats are accepted, `2.5` is not
pub fn validate_numbers(values: &[f64]) -> Result<AnswerVector, ValidationError> {
    check_shape(values.len())?;
    collect(values.iter().enumerate().map(|(i, &v)| float_ordinal(i, v)))
}

// ============================================================================
// SHAPE
// ============================================================================

fn check_shape(actual: usize) -> Result<(), ShapeError> {
    if actual != ITEM_COUNT {
        return Err(ShapeError { expected: ITEM_COUNT, actual });
    }
    Ok(())
}

fn validate_object(map: &Map<String, Value>) -> Result<AnswerVector, ValidationError> {
    let recognised = map.keys().filter(|k| item_index(k).is_some()).count();

    // Unknown keys next to a complete set still break the contract
    if recognised != ITEM_COUNT {
        return Err(ShapeError { expected: ITEM_COUNT, actual: recognised }.into());
    }
    if map.len() != ITEM_COUNT {
        return Err(ShapeError { expected: ITEM_COUNT, actual: map.len() }.into());
    }

    collect(ITEMS.iter().enumerate().map(|(i, item)| match map.get(item.id) {
        Some(value) => json_ordinal(i, value),
        None => Err(DomainError { index: i, value: "missing".to_string() }),
    }))
}

// ============================================================================
// DOMAIN
// ============================================================================

fn collect<I>(answers: I) -> Result<AnswerVector, ValidationError>
where
    I: Iterator<Item = Result<u8, DomainError>>,
{
    let mut values = [0u8; ITEM_COUNT];
    for (slot, answer) in values.iter_mut().zip(answers) {
        *slot = answer?;
    }
    Ok(AnswerVector::from_checked(values))
}

fn integer_ordinal(index: usize, value: i64) -> Result<u8, DomainError> {
    if (MIN_ANSWER as i64..=MAX_ANSWER as i64).contains(&value) {
        Ok(value as u8)
    } else {
        Err(DomainError { index, value: value.to_string() })
    }
}

fn float_ordinal(index: usize, value: f64) -> Result<u8, DomainError> {
    let in_range = value >= MIN_ANSWER as f64 && value <= MAX_ANSWER as f64;
    if value.is_finite() && value.fract() == 0.0 && in_range {
        Ok(value as u8)
    } else {
        Err(DomainError { index, value: value.to_string() })
    }
}

fn json_ordinal(index: usize, value: &Value) -> Result<u8, DomainError> {
    match value {
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => integer_ordinal(index, i),
            (None, Some(f)) => float_ordinal(index, f),
            (None, None) => Err(DomainError { index, value: n.to_string() }),
        },
        other => Err(DomainError { index, value: other.to_string() }),
    }
}

// ============================================================================
// TESTS
// ============================================================================

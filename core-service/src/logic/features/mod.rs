//! Features Module - Feature Encoding Engine
//!
//! Turns a validated answer vector into the exact numeric vector the
//! classifier was trained on.

pub mod layout;
pub mod scaler;
pub mod vector;

#[cfg(test)]
mod tests;

// Re-export common types
pub use layout::{FeatureLayout, LayoutError, LayoutInfo};
pub use scaler::StandardScaler;
pub use vector::{encode, encode_with, FeatureVector};

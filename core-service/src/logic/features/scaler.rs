//! Standard Scaler - fitted per-feature normalization
//!
//! Parameters come from the training run: `x' = (x - mean) / scale`.
//! Either vector may be absent when the scaler was fitted without centering
//! or without scaling.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    #[serde(default, alias = "mean_")]
    pub mean: Option<Vec<f64>>,
    #[serde(default, alias = "scale_")]
    pub scale: Option<Vec<f64>>,
}

impl StandardScaler {
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Self {
        Self {
            mean: Some(mean),
            scale: Some(scale),
        }
    }

    /// Check the parameters fit a layout of `features` columns
    pub fn check(&self, features: usize) -> Result<(), String> {
        if let Some(mean) = &self.mean {
            if mean.len() != features {
                return Err(format!("mean has {} entries, expected {}", mean.len(), features));
            }
            if mean.iter().any(|m| !m.is_finite()) {
                return Err("mean contains non-finite values".to_string());
            }
        }
        if let Some(scale) = &self.scale {
            if scale.len() != features {
                return Err(format!("scale has {} entries, expected {}", scale.len(), features));
            }
            if scale.iter().any(|s| !s.is_finite() || *s == 0.0) {
                return Err("scale must be finite and non-zero".to_string());
            }
        }
        Ok(())
    }

    /// Normalize in place; the fitted parameters are never touched
    pub fn apply(&self, values: &mut [f64]) {
        for (i, x) in values.iter_mut().enumerate() {
            let mean = self.mean.as_ref().and_then(|m| m.get(i)).copied().unwrap_or(0.0);
            let scale = self.scale.as_ref().and_then(|s| s.get(i)).copied().unwrap_or(1.0);
            *x = (*x - mean) / scale;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply() {
        let scaler = StandardScaler::new(vec![2.0, 1.0, 3.0], vec![0.5, 2.0, 1.0]);
        let mut values = [3.0, 1.0, 1.0];
        scaler.apply(&mut values);
        assert_eq!(values, [2.0, 0.0, -2.0]);
    }

    #[test]
    fn test_apply_without_mean() {
        let scaler = StandardScaler {
            mean: None,
            scale: Some(vec![2.0, 4.0]),
        };
        let mut values = [3.0, 2.0];
        scaler.apply(&mut values);
        assert_eq!(values, [1.5, 0.5]);
    }

    #[test]
    fn test_check() {
        let scaler = StandardScaler::new(vec![0.0; 3], vec![1.0; 3]);
        assert!(scaler.check(3).is_ok());
        assert!(scaler.check(30).is_err());

        let zero = StandardScaler::new(vec![0.0; 2], vec![1.0, 0.0]);
        assert!(zero.check(2).is_err());
    }

    #[test]
    fn test_sklearn_field_names() {
        let scaler: StandardScaler =
            serde_json::from_str(r#"{"mean_": [1.0], "scale_": [2.0]}"#).unwrap();
        assert_eq!(scaler, StandardScaler::new(vec![1.0], vec![2.0]));
    }
}

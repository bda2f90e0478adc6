//! Encoder tests: layout order and scaling together

#[cfg(test)]
mod encoder_tests {
    use crate::constants::ITEM_COUNT;
    use crate::logic::answers::validate_integers;
    use crate::logic::features::{encode_with, FeatureLayout, StandardScaler};
    use crate::logic::questionnaire::default_feature_names;

    fn ascending() -> Vec<i64> {
        (0..ITEM_COUNT as i64).map(|i| (i % 4) + 1).collect()
    }

    /// Canonical names must keep answers exactly where they are
    #[test]
    fn test_identity_order_without_scaler() {
        let raw = ascending();
        let answers = validate_integers(&raw).unwrap();
        let layout = FeatureLayout::canonical();

        let features = encode_with(&answers, &layout, None);

        assert_eq!(features.len(), layout.len());
        assert!(!features.scaled);
        let expected: Vec<f64> = raw.iter().map(|&v| v as f64).collect();
        assert_eq!(features.values, expected);
    }

    /// A reordered artifact reads answers through its own column order
    #[test]
    fn test_permuted_layout_gathers_by_name() {
        let raw = ascending();
        let answers = validate_integers(&raw).unwrap();
        let mut names = default_feature_names();
        names.reverse();
        let layout = FeatureLayout::from_names(names).unwrap();

        let features = encode_with(&answers, &layout, None);

        for (f, value) in features.values.iter().enumerate() {
            assert_eq!(*value, raw[ITEM_COUNT - 1 - f] as f64);
        }
    }

    /// Scaled output equals (raw - mean) / scale, exactly
    #[test]
    fn test_scaler_fixture() {
        let raw = ascending();
        let answers = validate_integers(&raw).unwrap();
        let mean: Vec<f64> = (0..ITEM_COUNT).map(|i| 2.0 + i as f64 * 0.05).collect();
        let scale: Vec<f64> = (0..ITEM_COUNT).map(|i| 0.5 + i as f64 * 0.25).collect();
        let scaler = StandardScaler::new(mean.clone(), scale.clone());
        let before = scaler.clone();

        let features = encode_with(&answers, &FeatureLayout::canonical(), Some(&scaler));

        assert!(features.scaled);
        for i in 0..ITEM_COUNT {
            assert_eq!(features.values[i], (raw[i] as f64 - mean[i]) / scale[i]);
        }
        assert_eq!(scaler, before, "scaler parameters must not change");
    }

    #[test]
    fn test_layout_hash_carried() {
        let answers = validate_integers(&[2i64; ITEM_COUNT]).unwrap();
        let layout = FeatureLayout::canonical();
        let features = encode_with(&answers, &layout, None);
        assert_eq!(features.layout_hash, layout.hash());
        assert_eq!(features.to_f32(), vec![2.0f32; ITEM_COUNT]);
    }
}

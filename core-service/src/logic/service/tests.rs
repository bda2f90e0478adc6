//! Service tests - full pipeline against stub and linear classifiers

#[cfg(test)]
mod service_tests {
    use std::path::Path;
    use std::sync::Arc;

    use serde_json::json;

    use crate::constants::{CLASS_COUNT, ITEM_COUNT};
    use crate::error::{ErrorKind, ScreeningError, ValidationError};
    use crate::logic::answers::validate_integers;
    use crate::logic::config::ClassTable;
    use crate::logic::features::FeatureVector;
    use crate::logic::loader::ArtifactSettings;
    use crate::logic::model::{Classifier, InferenceError, ModelArtifact};
    use crate::logic::service::{ModelService, ServiceState};

    struct Stub {
        class_id: i64,
        probabilities: Option<Vec<f64>>,
    }

    impl Classifier for Stub {
        fn kind(&self) -> &'static str {
            "stub"
        }

        fn predict(&self, _: &FeatureVector) -> Result<i64, InferenceError> {
            Ok(self.class_id)
        }

        fn supports_probabilities(&self) -> bool {
            self.probabilities.is_some()
        }

        fn predict_proba(&self, _: &FeatureVector) -> Result<Vec<f64>, InferenceError> {
            self.probabilities
                .clone()
                .ok_or_else(|| InferenceError("no probabilities".to_string()))
        }
    }

    fn service() -> ModelService {
        let dir = std::env::temp_dir().join("screening-service-tests-missing");
        ModelService::new(
            ArtifactSettings::new(&dir).with_config_paths(Vec::new()),
            "1.0.0",
        )
    }

    fn loaded(class_id: i64, probabilities: Option<Vec<f64>>) -> ModelService {
        let service = service();
        service.install(
            ModelArtifact::new(Box::new(Stub { class_id, probabilities })),
            ClassTable::defaults(),
        );
        service
    }

    fn all_twos() -> serde_json::Value {
        let body: serde_json::Map<String, serde_json::Value> =
            (1..=ITEM_COUNT).map(|i| (format!("q{}", i), json!(2))).collect();
        serde_json::Value::Object(body)
    }

    #[test]
    fn test_stub_prediction() {
        let service = loaded(1, Some(vec![0.1, 0.7, 0.15, 0.05]));
        let result = service.predict_json(&all_twos()).unwrap();

        assert_eq!(result.class_id, 1);
        assert_eq!(result.label, "Mild");
        assert!((result.confidence - 0.7).abs() < 1e-12);
        let keys: Vec<&str> = result.probabilities.keys().collect();
        assert_eq!(keys, ["none", "mild", "moderate", "severe"]);
        let values: Vec<f64> = result.probabilities.values().collect();
        assert_eq!(values, [0.1, 0.7, 0.15, 0.05]);
        assert!(!result.one_hot);
    }

    #[test]
    fn test_no_probability_support_gives_one_hot() {
        let service = loaded(3, None);
        let answers = validate_integers(&[4i64; ITEM_COUNT]).unwrap();
        let result = service.predict(&answers).unwrap();

        assert_eq!(result.label, "Severe");
        assert_eq!(result.confidence, 1.0);
        assert!(result.one_hot);
        assert_eq!(result.probabilities.get("severe"), Some(1.0));
        assert_eq!(result.probabilities.get("none"), Some(0.0));
        assert_eq!(result.probabilities.sum(), 1.0);
    }

    #[test]
    fn test_unloaded_reports_not_loaded_before_validation() {
        let service = service();
        assert_eq!(service.state(), ServiceState::Unloaded);

        let err = service.predict_json(&json!({ "q1": 9 })).unwrap_err();
        assert!(matches!(err, ScreeningError::NotLoaded));
        assert_eq!(err.kind(), ErrorKind::NotLoaded);

        let answers = validate_integers(&[1i64; ITEM_COUNT]).unwrap();
        assert!(matches!(service.predict(&answers), Err(ScreeningError::NotLoaded)));
    }

    #[test]
    fn test_validation_errors_surface_once_loaded() {
        let service = loaded(0, Some(vec![0.25; CLASS_COUNT]));

        let mut body = all_twos();
        body["q7"] = json!(5);
        match service.predict_json(&body).unwrap_err() {
            ScreeningError::Validation(ValidationError::Domain(e)) => assert_eq!(e.index, 6),
            other => panic!("unexpected error: {:?}", other),
        }

        let err = service.predict_json(&json!([1, 2, 3])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_wrong_probability_length_is_integrity_error() {
        let service = loaded(0, Some(vec![0.5, 0.5]));
        let err = service.predict_json(&all_twos()).unwrap_err();
        assert!(matches!(err, ScreeningError::ModelIntegrity(_)));
        assert!(!err.is_expected());
        assert_eq!(service.stats().failure_count, 1);
    }

    #[test]
    fn test_status_follows_lifecycle() {
        let service = service();
        let before = service.status();
        assert!(!before.model_loaded);
        assert_eq!(before.version, "1.0.0");
        assert_eq!(before.generation, 0);

        service.install(
            ModelArtifact::new(Box::new(Stub { class_id: 0, probabilities: None })),
            ClassTable::defaults(),
        );
        assert!(service.status().model_loaded);

        for _ in 0..3 {
            service.predict_json(&all_twos()).unwrap();
        }
        assert!(service.predict_json(&json!({})).is_err());
        assert!(service.status().model_loaded);

        // A failed reload keeps the published generation
        assert!(service.reload().is_err());
        let after = service.status();
        assert!(after.model_loaded);
        assert_eq!(after.state, ServiceState::Loaded);
        assert_eq!(after.generation, 1);
        assert!(after.last_error.is_some());
    }

    #[test]
    fn test_failed_first_load() {
        let service = service();
        assert!(service.load(None).is_err());
        assert_eq!(service.state(), ServiceState::Failed);
        assert!(service.metadata().is_none());
        assert_eq!(service.class_table(), ClassTable::defaults());
    }

    fn write_bundle(dir: &Path) {
        // Class k scores the mean answer times k, so high answers favour Severe
        let coef: Vec<Vec<f64>> = (0..CLASS_COUNT)
            .map(|k| vec![k as f64 / ITEM_COUNT as f64; ITEM_COUNT])
            .collect();
        let intercept: Vec<f64> = (0..CLASS_COUNT).map(|k| -2.5 * k as f64).collect();
        let model = json!({ "coef": coef, "intercept": intercept });
        std::fs::write(dir.join("psychiatric_model.json"), model.to_string()).unwrap();
    }

    #[test]
    fn test_load_from_directory_and_predict() {
        let dir = tempfile::tempdir().unwrap();
        write_bundle(dir.path());

        let service = service();
        let report = service.load(Some(dir.path())).unwrap();
        assert_eq!(report.metadata.model_format, "linear");
        assert!(service.is_loaded());
        assert_eq!(service.metadata().unwrap().checksum, report.metadata.checksum);

        let low = service
            .predict(&validate_integers(&[1i64; ITEM_COUNT]).unwrap())
            .unwrap();
        let high = service
            .predict(&validate_integers(&[4i64; ITEM_COUNT]).unwrap())
            .unwrap();
        assert_eq!(low.label, "None");
        assert_eq!(high.label, "Severe");
        assert!((low.probabilities.sum() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_reload_publishes_new_generation() {
        let dir = tempfile::tempdir().unwrap();
        write_bundle(dir.path());
        let service = ModelService::new(
            ArtifactSettings::new(dir.path()).with_config_paths(Vec::new()),
            "1.0.0",
        );

        service.load(None).unwrap();
        service.reload().unwrap();
        assert_eq!(service.status().generation, 2);
        assert!(service.status().last_error.is_none());
    }

    #[test]
    fn test_concurrent_predictions() {
        let service = Arc::new(loaded(2, Some(vec![0.1, 0.2, 0.6, 0.1])));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let service = Arc::clone(&service);
                std::thread::spawn(move || {
                    for _ in 0..50 {
                        let result = service.predict_json(&all_twos()).unwrap();
                        assert_eq!(result.label, "Moderate");
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(service.stats().inference_count, 400);
    }
}

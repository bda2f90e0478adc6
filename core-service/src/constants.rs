//! Central Configuration Constants
//!
//! Single source of truth for the questionnaire shape, the artifact bundle
//! layout and the presentation defaults shared by core and server.

/// Number of questionnaire items in one answer vector
pub const ITEM_COUNT: usize = 30;

/// Lowest allowed answer on the response scale
pub const MIN_ANSWER: u8 = 1;

/// Highest allowed answer on the response scale
pub const MAX_ANSWER: u8 = 4;

/// Number of severity classes the classifier must emit
pub const CLASS_COUNT: usize = 4;

/// Decimal places kept when presenting floats to callers
pub const DISPLAY_PRECISION: i32 = 4;

/// Tolerance for the probability mass check
pub const PROBABILITY_SUM_TOLERANCE: f64 = 1e-3;

/// Service version reported on health checks
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Fixed disclaimer attached to every prediction response
pub const DISCLAIMER: &str = "\u{26a0}\u{fe0f} This tool is for educational and informational purposes only. \
It is NOT a medical diagnosis. If you are experiencing mental health concerns, \
please consult a qualified mental health professional.";

// ============================================
// Artifact bundle layout
// ============================================

/// Default artifact directory (relative to the working directory)
pub const DEFAULT_ARTIFACT_DIR: &str = "models";

/// Classifier file candidates, tried in order
pub const CLASSIFIER_FILES: &[&str] = &["psychiatric_model.onnx", "psychiatric_model.json"];

/// Optional standard scaler parameters
pub const SCALER_FILE: &str = "scaler.json";

/// Optional feature names in training order
pub const FEATURE_NAMES_FILE: &str = "feature_names.json";

/// Optional class id of every probability column
pub const CLASS_ORDER_FILE: &str = "class_order.json";

/// Shared label/description configuration
pub const SHARED_CONFIG_FILE: &str = "shared_config.json";

/// Container deployment location of the shared configuration
pub const CONTAINER_CONFIG_PATH: &str = "/app/shared_config.json";

/// Sub-directory of the user config dir searched last
pub const USER_CONFIG_DIR: &str = "dass-screening";

//! Logic Module - Screening Pipeline & Engines
//!
//! ## Pipeline
//! - `answers/` - Answer validation (shape + domain)
//! - `features/` - Feature encoding (layout, scaler)
//! - `model/` - Classifier runtimes and inference
//! - `mapping` - Class id -> label/description/probability map
//! - `service/` - Lifecycle façade tying it all together
//!
//! ## Supporting
//! - `questionnaire` - Item catalogue
//! - `config` - Class table resolution
//! - `loader` - Artifact bundle loading

// Pipeline stages
pub mod answers;
pub mod features;
pub mod model;
pub mod mapping;
pub mod service;

// Supporting modules
pub mod questionnaire;
pub mod config;
pub mod loader;

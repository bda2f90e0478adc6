//! API Module
//!
//! Organized with versioning for backward compatibility.
//!
//! Structure:
//! - commands.rs: Current stable commands over `ModelService`
//! - schema.rs: Response bodies
//! - v1/mod.rs: Re-exports commands as v1 API
//!
//! Usage:
//! - `api::commands::predict(&service, &body)` - Direct access
//! - `api::v1::predict(&service, &body)` - Version 1 API

pub mod commands;
pub mod schema;
pub mod v1;

// Re-export current version as default
pub use commands::*;
pub use schema::{HealthResponse, ModelInfoResponse, PredictionResponse, QuestionInfo, QuestionsResponse};

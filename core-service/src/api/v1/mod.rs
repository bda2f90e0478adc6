//! API v1 Module
//!
//! Re-exports the current stable commands so later versions can coexist.

pub use super::commands::*;

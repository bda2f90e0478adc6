//! HTTP handlers

pub mod admin;
pub mod health;
pub mod model;
pub mod predict;
pub mod questions;
